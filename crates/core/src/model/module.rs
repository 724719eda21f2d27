use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::ModuleId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module title cannot be empty")]
    EmptyTitle,

    #[error("module content cannot be empty")]
    EmptyContent,

    #[error("video module content must be a valid URL: {0}")]
    InvalidVideoUrl(String),

    #[error("unknown module kind: {0}")]
    UnknownKind(String),
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// How a module's content payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Content is a URL to the lesson video.
    Video,
    /// Content is markdown text.
    Text,
    /// Content is the quiz question prompt.
    Quiz,
}

impl ModuleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Video => "video",
            ModuleKind::Text => "text",
            ModuleKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "text" => Ok(Self::Text),
            "quiz" => Ok(Self::Quiz),
            other => Err(ModuleError::UnknownKind(other.to_owned())),
        }
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// A single lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    kind: ModuleKind,
    content: String,
    duration_minutes: u32,
}

impl Module {
    /// Creates a new Module.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError` if the title or content is blank, or if a video
    /// module's content does not parse as a URL.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        kind: ModuleKind,
        content: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<Self, ModuleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModuleError::EmptyTitle);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ModuleError::EmptyContent);
        }
        if kind == ModuleKind::Video && Url::parse(content.trim()).is_err() {
            return Err(ModuleError::InvalidVideoUrl(content));
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            kind,
            content,
            duration_minutes,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// URL for video modules, markdown for text modules, the prompt for quizzes.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
