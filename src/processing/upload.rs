//! Upload classification.
//!
//! A request carries either one medical image or one health report. Both at
//! once is rejected before any processing happens.

use std::path::Path;

use thiserror::Error;

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    fn mime(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase())
    }
}

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type sent along with the image.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    fn detect(file: &UploadedFile) -> Option<Self> {
        match file.mime().as_deref() {
            Some("image/png") => return Some(ImageFormat::Png),
            Some("image/jpeg") | Some("image/jpg") => return Some(ImageFormat::Jpeg),
            _ => {}
        }
        match file.extension().as_deref() {
            Some("png") => Some(ImageFormat::Png),
            Some("jpg") | Some("jpeg") => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// Supported report document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Docx,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

impl ReportFormat {
    fn detect(file: &UploadedFile) -> Option<Self> {
        match file.mime().as_deref() {
            Some("application/pdf") => return Some(ReportFormat::Pdf),
            Some(DOCX_MIME) => return Some(ReportFormat::Docx),
            _ => {}
        }
        match file.extension().as_deref() {
            Some("pdf") => Some(ReportFormat::Pdf),
            Some("docx") => Some(ReportFormat::Docx),
            _ => None,
        }
    }
}

/// A validated upload, ready for analysis.
#[derive(Debug, Clone)]
pub enum Submission {
    Image {
        file: UploadedFile,
        format: ImageFormat,
    },
    Report {
        file: UploadedFile,
        format: ReportFormat,
    },
}

/// Problems with the uploaded files.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload either a medical image or a health report, not both.")]
    Exclusive,

    #[error("Please upload a medical image (PNG, JPG, JPEG) or a health report (PDF, DOCX).")]
    Missing,

    #[error("Unsupported image type for {0}; expected PNG, JPG or JPEG.")]
    UnsupportedImage(String),

    #[error("Unsupported report type for {0}; expected PDF or DOCX.")]
    UnsupportedReport(String),

    #[error("Could not read the uploaded report: {0}")]
    Unreadable(String),

    #[error("No readable text found in uploaded file.")]
    NoReadableText,
}

/// Decide what was uploaded, rejecting an image and a report together.
pub fn classify(
    image: Option<UploadedFile>,
    report: Option<UploadedFile>,
) -> Result<Submission, UploadError> {
    match (image, report) {
        (Some(_), Some(_)) => Err(UploadError::Exclusive),
        (None, None) => Err(UploadError::Missing),
        (Some(file), None) => match ImageFormat::detect(&file) {
            Some(format) => Ok(Submission::Image { file, format }),
            None => Err(UploadError::UnsupportedImage(file.file_name)),
        },
        (None, Some(file)) => match ReportFormat::detect(&file) {
            Some(format) => Ok(Submission::Report { file, format }),
            None => Err(UploadError::UnsupportedReport(file.file_name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: Option<&str>) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(String::from),
            data: vec![0u8; 4],
        }
    }

    #[test]
    fn test_both_uploads_are_rejected() {
        let result = classify(Some(file("xray.png", None)), Some(file("labs.pdf", None)));
        assert!(matches!(result, Err(UploadError::Exclusive)));
    }

    #[test]
    fn test_nothing_uploaded() {
        assert!(matches!(classify(None, None), Err(UploadError::Missing)));
    }

    #[test]
    fn test_image_detection() {
        let png = classify(Some(file("scan.PNG", None)), None).unwrap();
        assert!(matches!(png, Submission::Image { format: ImageFormat::Png, .. }));

        let jpeg = classify(Some(file("blob", Some("image/jpeg"))), None).unwrap();
        assert!(matches!(jpeg, Submission::Image { format: ImageFormat::Jpeg, .. }));

        let gif = classify(Some(file("anim.gif", Some("image/gif"))), None);
        assert!(matches!(gif, Err(UploadError::UnsupportedImage(_))));
    }

    #[test]
    fn test_report_detection() {
        let pdf = classify(None, Some(file("labs", Some("application/pdf")))).unwrap();
        assert!(matches!(pdf, Submission::Report { format: ReportFormat::Pdf, .. }));

        let docx = classify(None, Some(file("Report.docx", Some("application/octet-stream")))).unwrap();
        assert!(matches!(docx, Submission::Report { format: ReportFormat::Docx, .. }));

        let txt = classify(None, Some(file("notes.txt", Some("text/plain"))));
        assert!(matches!(txt, Err(UploadError::UnsupportedReport(_))));
    }
}
