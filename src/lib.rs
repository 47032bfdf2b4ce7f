//! Aarogyam Service Library
//!
//! Analyzes medical images and health reports through a hosted generation
//! model, then translates, locates and speaks the result. Long texts are
//! split at whitespace to stay under each downstream service's limits.

pub mod analysis;
pub mod api;
pub mod chunkers;
pub mod processing;
pub mod services;
pub mod types;

pub use analysis::{Analyzer, AnalysisError};
pub use chunkers::{split_text, BoundarySplitter, TextChunk};
pub use types::{AnalysisReport, AppConfig, Language};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::*;
    pub use crate::chunkers::*;
    pub use crate::services::*;
    pub use crate::types::*;
}

/// Default characters per report section sent for analysis
pub const DEFAULT_SECTION_LIMIT: usize = 6000;

/// Default characters per translation request
pub const DEFAULT_TRANSLATION_LIMIT: usize = 5000;

/// Default characters per text-to-speech request
pub const DEFAULT_SPEECH_LIMIT: usize = 100;

/// Default maximum upload size (50MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
