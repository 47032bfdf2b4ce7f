//! Core types for the analysis service.

mod config;
mod language;
mod report;

pub use config::{AppConfig, SamplingConfig};
pub use language::{Language, LanguageInfo};
pub use report::{
    AnalysisKind, AnalysisReport, Dictation, Hospital, LocaleResponse, SpeechRequest,
    TranscriptionResponse, TranslateRequest, TranslateResponse, Urgency,
};
