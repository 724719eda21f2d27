use aim_core::model::{ChatMessage, GroundingLink, GroundingSource};

use crate::vm::time_fmt::format_message_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationVm {
    pub title: String,
    pub uri: String,
    pub is_map: bool,
    pub action: &'static str,
}

impl From<&GroundingLink> for CitationVm {
    fn from(link: &GroundingLink) -> Self {
        let is_map = link.source == GroundingSource::Map;
        Self {
            title: link.title.clone(),
            uri: link.uri.clone(),
            is_map,
            action: if is_map {
                "Open in Google Maps"
            } else {
                "Visit Website"
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageVm {
    pub id: String,
    pub is_user: bool,
    pub text: String,
    pub time: String,
    pub citations: Vec<CitationVm>,
}

impl From<&ChatMessage> for ChatMessageVm {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            is_user: message.is_user(),
            text: message.text.clone(),
            time: format_message_time(message.timestamp),
            citations: message.grounding.iter().map(CitationVm::from).collect(),
        }
    }
}

#[must_use]
pub fn map_chat_messages(messages: &[ChatMessage]) -> Vec<ChatMessageVm> {
    messages.iter().map(ChatMessageVm::from).collect()
}
