use std::sync::Arc;

use aim_core::model::{ChatMessage, GroundingLink};
use tracing::{debug, warn};

use super::{TutorRequest, TutorTransport, TutorTurn, extract_citations};
use crate::Clock;
use crate::error::TutorError;

pub const TEMPERATURE: f32 = 0.7;
pub const EMPTY_REPLY_TEXT: &str = "I'm having trouble thinking right now. Try again?";
pub const ERROR_REPLY_TEXT: &str =
    "Sorry, I encountered an error connecting to the AI tutor service.";

/// Text and citations for one tutor answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorReply {
    pub text: String,
    pub grounding: Vec<GroundingLink>,
}

impl TutorReply {
    fn apology() -> Self {
        Self {
            text: ERROR_REPLY_TEXT.to_owned(),
            grounding: Vec::new(),
        }
    }
}

/// System prompt for a student looking at `context`.
#[must_use]
pub fn system_instruction(context: &str) -> String {
    format!(
        "You are Aim AI, a friendly and encouraging AI tutor for a digital learning platform.\n\
         The student is currently viewing the following content: \"{context}\".\n\
         \n\
         Guidelines:\n\
         - Keep answers concise and relevant to the current learning module.\n\
         - Use Markdown for code snippets or formatting.\n\
         - Be encouraging and supportive.\n\
         - If the user asks for a quiz, generate a short multiple-choice question based on the context.\n\
         - You have access to **Google Maps** and **Google Search**.\n\
         - If the user asks about locations, geography, or real-world places, use the googleMaps tool.\n\
         - If the user asks for recent news, facts not in the course, or broader internet knowledge, use the googleSearch tool.\n"
    )
}

/// Answers tutor questions. Never fails: errors become an apology reply.
#[derive(Clone)]
pub struct TutorService {
    clock: Clock,
    transport: Option<Arc<dyn TutorTransport>>,
}

impl TutorService {
    #[must_use]
    pub fn new(clock: Clock, transport: Option<Arc<dyn TutorTransport>>) -> Self {
        Self { clock, transport }
    }

    /// A service with no provider; every answer is the apology.
    #[must_use]
    pub fn disabled(clock: Clock) -> Self {
        Self::new(clock, None)
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Ask the provider about `message`, given prior `history` and the
    /// current learning context.
    pub async fn respond(
        &self,
        history: &[ChatMessage],
        context: &str,
        message: &str,
    ) -> TutorReply {
        match self.try_respond(history, context, message).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "AI tutor request failed");
                TutorReply::apology()
            }
        }
    }

    /// Like `respond`, but wraps the reply in a model chat message.
    pub async fn respond_message(
        &self,
        history: &[ChatMessage],
        context: &str,
        message: &str,
    ) -> ChatMessage {
        let reply = self.respond(history, context, message).await;
        ChatMessage::model(reply.text, self.clock.now(), reply.grounding)
    }

    async fn try_respond(
        &self,
        history: &[ChatMessage],
        context: &str,
        message: &str,
    ) -> Result<TutorReply, TutorError> {
        let transport = self.transport.as_ref().ok_or(TutorError::Disabled)?;

        let request = TutorRequest {
            system_instruction: system_instruction(context),
            temperature: TEMPERATURE,
            history: history
                .iter()
                .map(|entry| TutorTurn {
                    role: entry.role,
                    text: entry.text.clone(),
                })
                .collect(),
            message: message.to_owned(),
        };

        let response = transport.generate(&request).await?;
        let grounding = extract_citations(&response.chunks);
        debug!(citations = grounding.len(), "AI tutor replied");

        Ok(TutorReply {
            text: response
                .text
                .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_owned()),
            grounding,
        })
    }
}
