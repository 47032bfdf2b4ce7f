//! External services reached over HTTP, behind small capability traits.
//!
//! The analysis pipeline only sees the traits, so it can run against
//! in-memory fakes in tests.

mod gemini;
mod geocoder;
mod hospital;
mod location;
mod speech;
mod translator;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AppConfig, Language};

pub use gemini::GeminiClient;
pub use geocoder::{OpenCageGeocoder, Place};
pub use hospital::HospitalLocator;
pub use location::{city_or_unknown, IpInfoLocator, Location};
pub use speech::{save_audio, GoogleTts, WhisperClient, AUDIO_FILE_NAME};
pub use translator::{DocumentTranslator, GoogleTranslator, TranslatedDocument};

/// Errors raised by downstream service clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The service answered with a body we could not interpret
    #[error("unexpected response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    /// The service has no credentials or endpoint configured
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Build a status error from a failed response, consuming its body.
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ServiceError::Status {
            service,
            status,
            body,
        }
    }
}

/// Binary media attached to a generation request.
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A single request to the generation service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Instruction text (prompt plus any inline document text)
    pub instruction: String,

    /// Optional image to analyze
    pub media: Option<MediaPart>,
}

impl GenerationRequest {
    /// A text-only request.
    pub fn text(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            media: None,
        }
    }

    /// A request carrying an image.
    pub fn with_media(instruction: impl Into<String>, media: MediaPart) -> Self {
        Self {
            instruction: instruction.into(),
            media: Some(media),
        }
    }
}

/// Hosted model that turns a prompt (and optional image) into analysis text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text. `Ok(None)` means the service answered without any text.
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, ServiceError>;
}

/// Translates text from an auto-detected language into a target language.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError>;
}

/// Turns coordinates into a place name.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<Place>, ServiceError>;
}

/// Coarse location of the caller's network origin.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Location, ServiceError>;
}

/// Text to MP3 audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Audio to text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ServiceError>;
}

/// Build the shared HTTP client used by every downstream service.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!("aarogyam/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
