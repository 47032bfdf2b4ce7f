//! End-to-end analysis of an uploaded image or report.

use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use tracing::{info, warn};

use super::heading::condition_or_unknown;
use super::prompts::{
    is_warning, summary_prompt, IMAGE_PROMPT, NO_IMAGE_RESULT, NO_SUMMARY_RESULT,
};
use super::sections::analyze_sections;
use crate::processing::{self, Submission, UploadError};
use crate::services::{
    save_audio, GenerationRequest, GenerationService, HospitalLocator, MediaPart, ServiceError,
    SpeechSynthesizer,
};
use crate::types::{AnalysisKind, AnalysisReport, Dictation, Urgency};
use crate::DEFAULT_SECTION_LIMIT;

/// Errors that stop an analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("generation service failed: {0}")]
    Generation(#[from] ServiceError),
}

/// Runs analyses against the generation service and enriches the result
/// with the detected condition, nearest hospital and a spoken summary.
pub struct Analyzer {
    generator: Arc<dyn GenerationService>,
    hospitals: Arc<HospitalLocator>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    audio_dir: Option<PathBuf>,
    section_limit: usize,
    summarize_sections: bool,
}

impl Analyzer {
    /// Create an analyzer without speech output.
    pub fn new(generator: Arc<dyn GenerationService>, hospitals: Arc<HospitalLocator>) -> Self {
        Self {
            generator,
            hospitals,
            speech: None,
            audio_dir: None,
            section_limit: DEFAULT_SECTION_LIMIT,
            summarize_sections: true,
        }
    }

    /// Speak dictations with `speech`, keeping the latest audio in `audio_dir`.
    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>, audio_dir: Option<PathBuf>) -> Self {
        self.speech = Some(speech);
        self.audio_dir = audio_dir;
        self
    }

    /// Set the maximum characters per report section.
    pub fn with_section_limit(mut self, limit: usize) -> Self {
        self.section_limit = limit;
        self
    }

    /// Enable or disable the final summary call for multi-section reports.
    pub fn with_summary(mut self, enabled: bool) -> Self {
        self.summarize_sections = enabled;
        self
    }

    /// Analyze a validated upload.
    pub async fn analyze(&self, submission: Submission) -> Result<AnalysisReport, AnalysisError> {
        match submission {
            Submission::Image { file, format } => {
                let media = MediaPart {
                    mime_type: format.mime_type().to_string(),
                    data: file.data,
                };
                self.analyze_image(media).await
            }
            Submission::Report { file, format } => {
                let text = processing::extract_report_text(file.data, format).await?;
                self.analyze_report(&text).await
            }
        }
    }

    /// Analyze a single medical image.
    pub async fn analyze_image(&self, image: MediaPart) -> Result<AnalysisReport, AnalysisError> {
        info!(mime_type = %image.mime_type, bytes = image.data.len(), "Analyzing image");

        let text = self
            .generator
            .generate(GenerationRequest::with_media(IMAGE_PROMPT, image))
            .await?
            .unwrap_or_else(|| NO_IMAGE_RESULT.to_string());

        let report = AnalysisReport::new(AnalysisKind::Image, text);
        Ok(self.enrich(report).await)
    }

    /// Analyze the extracted text of a health report, section by section.
    pub async fn analyze_report(&self, report_text: &str) -> Result<AnalysisReport, AnalysisError> {
        info!(chars = report_text.chars().count(), "Analyzing report");

        let outcome = analyze_sections(self.generator.as_ref(), report_text, self.section_limit).await;

        let text = if self.summarize_sections {
            self.generator
                .generate(GenerationRequest::text(summary_prompt(&outcome.combined)))
                .await?
                .unwrap_or_else(|| NO_SUMMARY_RESULT.to_string())
        } else {
            outcome.combined
        };

        let mut report = AnalysisReport::new(AnalysisKind::Report, text);
        report.preview = Some(processing::preview(report_text));
        report.sections = outcome.sections;
        report.failed_sections = outcome.failed;
        Ok(self.enrich(report).await)
    }

    /// Attach condition, hospital and dictation unless the text is a warning.
    async fn enrich(&self, mut report: AnalysisReport) -> AnalysisReport {
        if is_warning(&report.text) {
            warn!(id = %report.id, "Analysis carries a warning, skipping dictation");
            return report;
        }

        let condition = condition_or_unknown(&report.text);
        report.hospital = self.hospitals.nearest().await;

        if report.hospital.is_some() {
            report.dictation = Some(self.dictate(&condition, report.kind.urgency()).await);
        }
        report.condition = Some(condition);

        info!(
            id = %report.id,
            kind = %report.kind,
            condition = report.condition.as_deref().unwrap_or_default(),
            hospital = report.hospital.is_some(),
            "Analysis complete"
        );
        report
    }

    /// Speak the condition and urgency. Synthesis failures drop the audio only.
    pub async fn dictate(&self, condition: &str, urgency: Urgency) -> Dictation {
        let message = format!("Disease: {condition}, Urgency of treatment: {urgency}.");

        let audio = match &self.speech {
            Some(speech) => match speech.synthesize(&message).await {
                Ok(audio) => {
                    if let Some(dir) = &self.audio_dir {
                        if let Err(e) = save_audio(dir, &audio).await {
                            warn!(error = %e, "Failed to persist dictation audio");
                        }
                    }
                    Some(BASE64.encode(&audio))
                }
                Err(e) => {
                    warn!(error = %e, "Speech synthesis failed");
                    None
                }
            },
            None => None,
        };

        Dictation {
            message,
            audio_base64: audio,
        }
    }
}
