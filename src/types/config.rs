//! Service configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SECTION_LIMIT, DEFAULT_SPEECH_LIMIT, DEFAULT_TRANSLATION_LIMIT,
};

/// Global service configuration.
///
/// Loaded from `AAROGYAM_*` environment variables (after `.env`), with the
/// API keys also accepted under their usual names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,

    /// Gemini API key; analysis endpoints are disabled without it
    pub gemini_api_key: Option<String>,

    /// Base URL of the Gemini REST API
    pub gemini_base_url: String,

    /// Gemini model used for every generation call
    pub gemini_model: String,

    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,

    /// Maximum characters per report section sent for analysis
    pub section_limit: usize,

    /// Maximum characters per translation request
    pub translation_limit: usize,

    /// Maximum characters per speech synthesis request
    pub speech_limit: usize,

    /// Whether section analyses are merged by a final summary call
    pub summarize_sections: bool,

    /// OpenCage API key; hospital lookup is disabled without it
    pub opencage_api_key: Option<String>,

    pub opencage_base_url: String,
    pub ipinfo_url: String,
    pub translate_url: String,
    pub tts_url: String,

    /// Base URL of a Whisper-compatible transcription API
    pub whisper_base_url: Option<String>,
    pub whisper_api_key: Option<String>,
    pub whisper_model: String,

    /// Directory the synthesized dictation audio is written to
    pub audio_dir: PathBuf,

    /// Timeout for each downstream request
    pub request_timeout_secs: u64,

    /// Largest accepted request body (uploads)
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let sampling = SamplingConfig::default();
        Self {
            port: 3017,
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
            max_output_tokens: sampling.max_output_tokens,
            section_limit: DEFAULT_SECTION_LIMIT,
            translation_limit: DEFAULT_TRANSLATION_LIMIT,
            speech_limit: DEFAULT_SPEECH_LIMIT,
            summarize_sections: true,
            opencage_api_key: None,
            opencage_base_url: "https://api.opencagedata.com".to_string(),
            ipinfo_url: "https://ipinfo.io/json".to_string(),
            translate_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            tts_url: "https://translate.google.com/translate_tts".to_string(),
            whisper_base_url: None,
            whisper_api_key: None,
            whisper_model: "whisper-1".to_string(),
            audio_dir: std::env::temp_dir().join("aarogyam"),
            request_timeout_secs: 120,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AAROGYAM")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .set_override_option("gemini_api_key", std::env::var("GEMINI_API_KEY").ok())?
            .set_override_option("opencage_api_key", std::env::var("OPENCAGE_API_KEY").ok())?
            .set_override_option("port", std::env::var("PORT").ok())?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Sampling parameters for generation calls.
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Downstream request timeout.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Sampling configuration sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 1.0,
            top_k: 32,
            max_output_tokens: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = AppConfig::default();
        assert_eq!(config.section_limit, 6000);
        assert_eq!(config.translation_limit, 5000);
        assert_eq!(config.speech_limit, 100);
        assert!(config.summarize_sections);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_sampling_serializes_camel_case() {
        let json = serde_json::to_value(AppConfig::default().sampling()).unwrap();
        assert_eq!(json["topK"], 32);
        assert_eq!(json["maxOutputTokens"], 4096);
        assert_eq!(json["topP"], 1.0);
    }
}
