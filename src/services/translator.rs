//! Translation client and chunked document translation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::{ServiceError, TranslationService};
use crate::chunkers::BoundarySplitter;
use crate::types::Language;

const SERVICE: &str = "Google Translate";

/// Client for the public Google Translate endpoint.
pub struct GoogleTranslator {
    client: Client,
    url: String,
}

impl GoogleTranslator {
    /// Create a new translator client.
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["translated", "source", ...], ...], null, "en", ...]`.
fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    Some(text)
}

#[async_trait]
impl TranslationService for GoogleTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.code()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let body: Value = response.json().await?;
        parse_translation(&body).ok_or_else(|| ServiceError::InvalidResponse {
            service: SERVICE,
            message: "missing translation segments".to_string(),
        })
    }
}

/// Result of translating a whole document.
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// Number of requests the document was split into
    pub chunks: usize,
    pub text: String,
}

/// Translates documents longer than the service's per-request limit.
///
/// The document is split at whitespace, each piece is translated in order,
/// and the translations are joined with newlines.
pub struct DocumentTranslator {
    service: Arc<dyn TranslationService>,
    splitter: BoundarySplitter,
}

impl DocumentTranslator {
    /// Create a document translator with the given per-request limit.
    pub fn new(service: Arc<dyn TranslationService>, max_chars: usize) -> Self {
        Self {
            service,
            splitter: BoundarySplitter::new(max_chars),
        }
    }

    /// Translate `text` into `target`.
    pub async fn translate(
        &self,
        text: &str,
        target: Language,
    ) -> Result<TranslatedDocument, ServiceError> {
        let pieces = self.splitter.split(text);
        let mut translated = Vec::with_capacity(pieces.len());

        info!(
            language = %target,
            chunks = pieces.len(),
            "Translating document"
        );

        for (i, piece) in pieces.iter().enumerate() {
            if piece.trim().is_empty() {
                translated.push(piece.to_string());
                continue;
            }
            debug!(chunk = i + 1, chars = piece.chars().count(), "Translating chunk");
            translated.push(self.service.translate(piece, target).await?);
        }

        Ok(TranslatedDocument {
            chunks: pieces.len(),
            text: translated.join("\n"),
        })
    }
}
