use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use aim_core::model::ChatRole;

use super::{ChunkRef, GroundingChunk, TutorRequest, TutorResponse, TutorTransport};
use crate::error::TutorError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_owned(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// `generateContent` over HTTPS with web search and maps grounding enabled.
#[derive(Clone)]
pub struct GeminiTransport {
    client: Client,
    config: GeminiConfig,
}

impl GeminiTransport {
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TutorTransport for GeminiTransport {
    async fn generate(&self, request: &TutorRequest) -> Result<TutorResponse, TutorError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateRequest::from_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.into_tutor_response())
    }
}

//
// ─── WIRE FORMAT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    tools: [Tool; 2],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Tool {
    GoogleSearch {},
    GoogleMaps {},
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

impl<'a> GenerateRequest<'a> {
    fn from_request(request: &'a TutorRequest) -> Self {
        let turn = |role: ChatRole, text: &'a str| Content {
            role: Some(role.as_str()),
            parts: [Part { text }],
        };

        let mut contents: Vec<Content<'a>> = request
            .history
            .iter()
            .map(|entry| turn(entry.role, &entry.text))
            .collect();
        contents.push(turn(ChatRole::User, &request.message));

        Self {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &request.system_instruction,
                }],
            },
            contents,
            tools: [Tool::GoogleSearch {}, Tool::GoogleMaps {}],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireChunk>,
}

#[derive(Debug, Deserialize)]
struct WireChunk {
    #[serde(default)]
    maps: Option<WireChunkRef>,
    #[serde(default)]
    web: Option<WireChunkRef>,
}

#[derive(Debug, Deserialize)]
struct WireChunkRef {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl From<WireChunkRef> for ChunkRef {
    fn from(value: WireChunkRef) -> Self {
        Self {
            uri: value.uri,
            title: value.title,
        }
    }
}

impl GenerateResponse {
    /// A reply without candidates (for example a blocked prompt) is treated
    /// like an empty one.
    fn into_tutor_response(self) -> TutorResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return TutorResponse::default();
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let chunks = candidate
            .grounding_metadata
            .map(|meta| meta.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .map(|chunk| GroundingChunk {
                maps: chunk.maps.map(ChunkRef::from),
                web: chunk.web.map(ChunkRef::from),
            })
            .collect();

        TutorResponse {
            text: Some(text).filter(|text| !text.trim().is_empty()),
            chunks,
        }
    }
}
