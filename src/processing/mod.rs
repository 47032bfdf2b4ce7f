//! Upload validation and report preprocessing.

pub mod extraction;
pub mod upload;

pub use extraction::{extract_report_text, normalize_whitespace, preview, report_text, PREVIEW_CHARS};
pub use upload::{classify, ImageFormat, ReportFormat, Submission, UploadError, UploadedFile};
