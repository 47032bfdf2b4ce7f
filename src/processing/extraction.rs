//! Report text extraction from PDF and DOCX documents.

use std::io::{Cursor, Read};

use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

use super::upload::{ReportFormat, UploadError};

/// Characters of extracted text shown as a preview.
pub const PREVIEW_CHARS: usize = 1500;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Extract, normalize and validate the text of a report.
///
/// Fails with [`UploadError::NoReadableText`] when nothing but whitespace
/// remains.
pub fn report_text(data: &[u8], format: ReportFormat) -> Result<String, UploadError> {
    let raw = match format {
        ReportFormat::Pdf => extract_pdf(data)?,
        ReportFormat::Docx => extract_docx(data)?,
    };

    let text = normalize_whitespace(&raw);
    debug!(?format, raw_chars = raw.len(), chars = text.chars().count(), "Extracted report text");

    if text.is_empty() {
        return Err(UploadError::NoReadableText);
    }
    Ok(text)
}

/// [`report_text`] on the blocking thread pool.
pub async fn extract_report_text(data: Vec<u8>, format: ReportFormat) -> Result<String, UploadError> {
    tokio::task::spawn_blocking(move || report_text(&data, format))
        .await
        .map_err(|e| UploadError::Unreadable(format!("extraction task failed: {e}")))?
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// The first [`PREVIEW_CHARS`] characters of `text`.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

fn extract_pdf(data: &[u8]) -> Result<String, UploadError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| UploadError::Unreadable(e.to_string()))
}

/// Paragraph texts of `word/document.xml`, one per line.
fn extract_docx(data: &[u8]) -> Result<String, UploadError> {
    let unreadable = |e: &dyn std::fmt::Display| UploadError::Unreadable(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| unreadable(&e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| unreadable(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| unreadable(&e))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                current.push_str(&t.unescape().map_err(|e| unreadable(&e))?);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(unreadable(&e)),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Hb \n\n 10.2\t g/dL \r\n"), "Hb 10.2 g/dL");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_preview_is_char_bounded() {
        let text = "é".repeat(2000);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_docx_paragraphs_are_extracted() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Patient: A &amp; B</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t xml:space=\"preserve\">Hemoglobin </w:t></w:r><w:r><w:t>10.2</w:t></w:r></w:p>",
        );
        assert_eq!(extract_docx(&data).unwrap(), "Patient: A & B\n\nHemoglobin 10.2");
        assert_eq!(
            report_text(&data, ReportFormat::Docx).unwrap(),
            "Patient: A & B Hemoglobin 10.2"
        );
    }

    #[test]
    fn test_empty_docx_has_no_readable_text() {
        let data = docx_with_body("<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p>");
        assert!(matches!(
            report_text(&data, ReportFormat::Docx),
            Err(UploadError::NoReadableText)
        ));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        assert!(matches!(
            report_text(b"not a zip", ReportFormat::Docx),
            Err(UploadError::Unreadable(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_report_text_off_the_runtime() {
        let data = docx_with_body("<w:p><w:r><w:t>Glucose   126 mg/dL</w:t></w:r></w:p>");
        assert_eq!(
            extract_report_text(data, ReportFormat::Docx).await.unwrap(),
            "Glucose 126 mg/dL"
        );
        assert!(matches!(
            extract_report_text(b"%PDF-1.4 truncated".to_vec(), ReportFormat::Pdf).await,
            Err(UploadError::Unreadable(_))
        ));
    }
}
