//! AI tutor: prompt assembly, provider transport, citation extraction and
//! per-overlay conversation state.

mod citations;
mod conversation;
mod gemini;
mod service;

use aim_core::model::ChatRole;
use async_trait::async_trait;

use crate::error::TutorError;

pub use citations::extract_citations;
pub use conversation::{TutorConversation, UserTurn, greeting};
pub use gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiConfig, GeminiTransport};
pub use service::{
    EMPTY_REPLY_TEXT, ERROR_REPLY_TEXT, TEMPERATURE, TutorReply, TutorService, system_instruction,
};

/// One prior message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Everything a transport needs for one generate call.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    pub system_instruction: String,
    pub temperature: f32,
    pub history: Vec<TutorTurn>,
    pub message: String,
}

/// A retrieval reference attached to a provider reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkRef {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// One grounding chunk; the provider fills at most one of the two kinds in
/// practice, but both may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub maps: Option<ChunkRef>,
    pub web: Option<ChunkRef>,
}

/// Raw provider output before fallbacks are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorResponse {
    pub text: Option<String>,
    pub chunks: Vec<GroundingChunk>,
}

#[async_trait]
pub trait TutorTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `TutorError` when the provider cannot be reached or rejects
    /// the request.
    async fn generate(&self, request: &TutorRequest) -> Result<TutorResponse, TutorError>;
}
