//! Analysis results and request/response definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Language;

/// What kind of upload an analysis was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// A single medical image (PNG/JPEG)
    Image,
    /// A text health report (PDF/DOCX)
    Report,
}

impl AnalysisKind {
    /// Urgency announced in the speech dictation for this kind of analysis.
    pub fn urgency(&self) -> Urgency {
        match self {
            AnalysisKind::Image => Urgency::High,
            AnalysisKind::Report => Urgency::Medium,
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisKind::Image => write!(f, "image"),
            AnalysisKind::Report => write!(f, "report"),
        }
    }
}

/// Urgency of treatment announced with the detected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::High => write!(f, "High"),
            Urgency::Medium => write!(f, "Medium"),
        }
    }
}

/// Nearest hospital returned by the hospital lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,

    /// Area (city or county) the caller was geocoded to
    pub area: String,

    pub phone: String,

    /// Name and phone are fixed stand-in values, not a real directory lookup
    pub placeholder: bool,
}

/// Spoken summary of the detected condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictation {
    /// The sentence that was spoken
    pub message: String,

    /// MP3 audio of the message, base64-encoded; absent if synthesis failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
}

/// The explicit result of one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,

    pub kind: AnalysisKind,

    /// Final analysis text (or a warning marker if nothing came back)
    pub text: String,

    /// Condition heading extracted from the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// First characters of the extracted report text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    /// Number of sections the report was split into
    pub sections: usize,

    /// Sections that produced no output
    pub failed_sections: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<Hospital>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictation: Option<Dictation>,

    pub created_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Create a report for the given kind and text.
    pub fn new(kind: AnalysisKind, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text,
            condition: None,
            preview: None,
            sections: 1,
            failed_sections: 0,
            hospital: None,
            dictation: None,
            created_at: Utc::now(),
        }
    }
}

/// Request to translate analysis text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,

    /// Target language by name ("Tamil") or code ("ta")
    pub language: String,
}

/// Translated analysis text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub language: Language,
    pub code: String,
    pub chunks: usize,
    pub text: String,
}

/// Request to synthesize speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// Caller location and the language selected by default for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleResponse {
    pub city: String,
    pub default_language: Language,
}

/// Transcribed audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}
