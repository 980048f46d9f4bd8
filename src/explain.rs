//! Explanation requests against the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::intake::UploadedFile;

pub const DEFAULT_PROMPT: &str = "Jelaskan file yang saya kirimkan";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct ExplainRequest {
    pub prompt: String,
    pub file: UploadedFile,
}

impl ExplainRequest {
    pub fn new(prompt: impl Into<String>, file: UploadedFile) -> Self {
        Self {
            prompt: prompt.into(),
            file,
        }
    }

    /// The prompt actually sent, with empty input replaced by the default.
    pub fn effective_prompt(&self) -> &str {
        if self.prompt.is_empty() {
            DEFAULT_PROMPT
        } else {
            &self.prompt
        }
    }
}

#[async_trait]
pub trait Explainer: Send + Sync {
    /// Sends the prompt and file to the model and returns the first answer text.
    async fn explain(&self, request: ExplainRequest) -> Result<String>;

    fn model(&self) -> &str;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

#[derive(Clone)]
pub struct GeminiExplainer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiExplainer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Explainer for GeminiExplainer {
    async fn explain(&self, request: ExplainRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: request.effective_prompt(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &request.file.media_type,
                            data: general_purpose::STANDARD.encode(&request.file.bytes),
                        },
                    },
                ],
            }],
        };

        tracing::info!(
            model = %self.model,
            file = %request.file.name,
            media_type = %request.file.media_type,
            bytes = request.file.bytes.len(),
            "sending explanation request"
        );

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body_len = body.len(), "generation API responded");

        if !status.is_success() {
            return Err(ExplainError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = parsed.first_text().ok_or(ExplainError::EmptyResponse)?;

        tracing::info!(chars = text.len(), "explanation received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
