//! Instruction templates and fallback texts for the generation service.

/// Marks text that stands in for a missing generation result.
pub const WARNING_MARKER: &str = "⚠️";

pub const NO_IMAGE_RESULT: &str = "⚠️ No analysis result returned by Gemini.";
pub const NO_SUMMARY_RESULT: &str = "⚠️ No final summary returned by Gemini.";

pub const IMAGE_PROMPT: &str = r#"
As a highly skilled medical practitioner specializing in image analysis, analyze this medical image.

Responsibilities:
1. **Give the disease name as a bold heading.**
2. **Detailed Analysis:** Explain visual indicators or abnormalities.
3. **Findings Report:** Summarize significant observations.
4. **Recommendations and Next Steps:** Suggest further tests or referrals.
5. **Treatment Suggestions:** Mention possible interventions.
Add disclaimer: "Consult with a doctor before making any decisions."
"#;

pub const REPORT_PROMPT: &str = r#"
You are a highly experienced medical doctor analyzing a patient's health report.

Responsibilities:
1. **Give the condition/disease as a bold heading.**
2. **Detailed Analysis:** Explain test values and implications.
3. **Findings Report:** Highlight abnormal or critical findings.
4. **Recommendations and Next Steps:** Suggest follow-ups or tests.
5. **Treatment Suggestions:** Mention therapies or lifestyle advice.
End with: "Consult with a doctor before making any decisions."
"#;

/// Instruction for one section of a long report.
pub fn section_prompt(section: &str, index: usize, total: usize) -> String {
    format!("{REPORT_PROMPT}\n\n---\nSection {index} of {total}:\n{section}")
}

/// Stand-in text for a section that produced no output.
pub fn section_placeholder(index: usize) -> String {
    format!("{WARNING_MARKER} No output for section {index}")
}

/// Instruction merging per-section analyses into one report.
pub fn summary_prompt(combined: &str) -> String {
    format!(
        "Combine and summarize the following medical analyses into one structured report.\n\
         Use headings: **Detailed Analysis**, **Findings Report**, **Recommendations and Next Steps**, **Treatment Suggestions**.\n\
         Stay under 4000 tokens.\n\n\
         Analyses:\n{combined}"
    )
}

/// Whether `text` is (or contains) a fallback instead of real analysis.
pub fn is_warning(text: &str) -> bool {
    text.contains(WARNING_MARKER)
}
