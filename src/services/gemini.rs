//! Gemini `generateContent` client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GenerationRequest, GenerationService, ServiceError};
use crate::types::{AppConfig, SamplingConfig};

const SERVICE: &str = "Gemini";

/// Client for the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    sampling: SamplingConfig,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: SamplingConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part {
    InlineData { mime_type: String, data: String },
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, `None` if it has no non-blank text.
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
            api_key: api_key.to_string(),
            sampling: SamplingConfig::default(),
        }
    }

    /// Build a client from configuration, `None` if no API key is set.
    pub fn from_config(client: Client, config: &AppConfig) -> Option<Self> {
        let api_key = config.gemini_api_key.as_deref().filter(|k| !k.is_empty())?;
        Some(
            Self::new(client, &config.gemini_base_url, &config.gemini_model, api_key)
                .with_sampling(config.sampling()),
        )
    }

    /// Set the sampling configuration.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_body(&self, request: GenerationRequest) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(media) = request.media {
            parts.push(Part::InlineData {
                mime_type: media.mime_type,
                data: BASE64.encode(&media.data),
            });
        }
        parts.push(Part::Text(request.instruction));

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: self.sampling,
        }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, ServiceError> {
        let has_media = request.media.is_some();
        let body = self.build_body(request);

        debug!(model = %self.model, has_media, "Sending generation request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text();

        info!(
            model = %self.model,
            chars = text.as_ref().map_or(0, |t| t.chars().count()),
            "Generation complete"
        );

        Ok(text)
    }
}
