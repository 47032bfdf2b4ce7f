//! Medical image and report analysis.

pub mod heading;
pub mod pipeline;
pub mod prompts;
pub mod sections;

pub use heading::{condition_or_unknown, extract_condition, UNKNOWN_CONDITION};
pub use pipeline::{AnalysisError, Analyzer};
pub use prompts::{is_warning, WARNING_MARKER};
pub use sections::{analyze_sections, SectionOutcome};
