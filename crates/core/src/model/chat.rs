use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// Which retrieval tool produced a grounding citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingSource {
    Map,
    Web,
}

/// A citation attached to a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingLink {
    pub title: String,
    pub uri: String,
    pub source: GroundingSource,
}

impl GroundingLink {
    #[must_use]
    pub fn map(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
            source: GroundingSource::Map,
        }
    }

    #[must_use]
    pub fn web(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
            source: GroundingSource::Web,
        }
    }
}

/// One entry of a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub grounding: Vec<GroundingLink>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            text: text.into(),
            timestamp,
            grounding: Vec::new(),
        }
    }

    #[must_use]
    pub fn model(
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        grounding: Vec<GroundingLink>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Model,
            text: text.into(),
            timestamp,
            grounding,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}
