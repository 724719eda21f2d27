use aim_core::model::ChatMessage;
use chrono::{DateTime, Utc};

/// Opening line the tutor shows for a learning context.
#[must_use]
pub fn greeting(context: &str) -> String {
    format!("Hi! I'm Aim AI. I see you're studying \"{context}\". How can I help?")
}

/// In-memory chat state for one tutor overlay.
///
/// At most one request is in flight. Switching context discards the
/// transcript and starts over with a fresh greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorConversation {
    context: String,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl TutorConversation {
    #[must_use]
    pub fn new(context: impl Into<String>, now: DateTime<Utc>) -> Self {
        let context = context.into();
        let messages = vec![ChatMessage::model(greeting(&context), now, Vec::new())];
        Self {
            context,
            messages,
            pending: false,
        }
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Reset to a single greeting for `context`. Returns `false` and keeps
    /// the transcript when the context is unchanged.
    pub fn set_context(&mut self, context: &str, now: DateTime<Utc>) -> bool {
        if self.context == context {
            return false;
        }
        *self = Self::new(context, now);
        true
    }

    /// Append the user's message and return the history to send with it.
    ///
    /// Returns `None` for blank input or while a reply is still pending.
    pub fn begin_user_turn(&mut self, text: &str, now: DateTime<Utc>) -> Option<UserTurn> {
        let text = text.trim();
        if text.is_empty() || self.pending {
            return None;
        }
        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(text, now));
        self.pending = true;
        Some(UserTurn {
            history,
            message: text.to_owned(),
            context: self.context.clone(),
        })
    }

    /// Append the model's reply and accept new input again.
    ///
    /// A reply that lands after a context switch is still appended to the
    /// current transcript.
    pub fn finish_turn(&mut self, reply: ChatMessage) {
        self.messages.push(reply);
        self.pending = false;
    }
}

/// Snapshot handed to the tutor service for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTurn {
    /// Messages preceding the new one.
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub context: String,
}
