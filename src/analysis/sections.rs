//! Multi-section report submission.

use tracing::{info, warn};

use super::prompts::{section_placeholder, section_prompt};
use crate::chunkers::BoundarySplitter;
use crate::services::{GenerationRequest, GenerationService};

/// Per-section analyses joined in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    /// Section outputs (or placeholders) separated by blank lines
    pub combined: String,

    /// Number of sections submitted
    pub sections: usize,

    /// Sections replaced by a placeholder
    pub failed: usize,
}

/// Split `report` into sections and analyze each one in turn.
///
/// Every request names its position ("Section i of N"). A section that
/// errors or returns no text is replaced by a placeholder and the rest of
/// the batch still runs.
pub async fn analyze_sections(
    generator: &dyn GenerationService,
    report: &str,
    section_limit: usize,
) -> SectionOutcome {
    let sections = BoundarySplitter::new(section_limit).split(report);
    let total = sections.len();
    let mut outputs = Vec::with_capacity(total);
    let mut failed = 0;

    for (i, section) in sections.iter().enumerate() {
        let index = i + 1;
        info!(section = index, total, "Processing report section");

        let request = GenerationRequest::text(section_prompt(section, index, total));
        match generator.generate(request).await {
            Ok(Some(text)) => outputs.push(text),
            Ok(None) => {
                warn!(section = index, "Section returned no text");
                failed += 1;
                outputs.push(section_placeholder(index));
            }
            Err(e) => {
                warn!(section = index, error = %e, "Section analysis failed");
                failed += 1;
                outputs.push(section_placeholder(index));
            }
        }
    }

    SectionOutcome {
        combined: outputs.join("\n\n"),
        sections: total,
        failed,
    }
}
