//! Speech synthesis and transcription clients.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ServiceError, SpeechRecognizer, SpeechSynthesizer};
use crate::chunkers::BoundarySplitter;

/// File the latest dictation audio is written to.
pub const AUDIO_FILE_NAME: &str = "output.mp3";

/// Google Translate text-to-speech client (MP3 output).
///
/// The endpoint only accepts short texts, so longer input is split at
/// whitespace and the MP3 segments are concatenated.
pub struct GoogleTts {
    client: Client,
    url: String,
    language: String,
    splitter: BoundarySplitter,
}

impl GoogleTts {
    /// Create a new client speaking English.
    pub fn new(client: Client, url: &str, max_chars: usize) -> Self {
        Self {
            client,
            url: url.to_string(),
            language: "en".to_string(),
            splitter: BoundarySplitter::new(max_chars),
        }
    }

    async fn fetch_segment(&self, text: &str, idx: usize, total: usize) -> Result<Vec<u8>, ServiceError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = text.chars().count().to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response("Google TTS", response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let segments: Vec<&str> = self
            .splitter
            .split(text)
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut audio = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            debug!(segment = idx + 1, total = segments.len(), "Synthesizing speech segment");
            audio.extend(self.fetch_segment(segment, idx, segments.len()).await?);
        }

        info!(segments = segments.len(), bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}

/// Write dictation audio to the fixed output file in `dir`.
pub async fn save_audio(dir: &Path, audio: &[u8]) -> Result<PathBuf, ServiceError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(AUDIO_FILE_NAME);
    tokio::fs::write(&path, audio).await?;
    Ok(path)
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    text: String,
}

/// Client for a Whisper-compatible `/v1/audio/transcriptions` endpoint.
pub struct WhisperClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperClient {
    /// Create a new transcription client.
    pub fn new(client: Client, base_url: &str, api_key: Option<&str>, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(String::from),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ServiceError> {
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", Part::bytes(audio).file_name(file_name.to_string()));

        let mut request = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ServiceError::from_response("Whisper", response).await);
        }

        let body: TranscriptionBody = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}
