//! Renders a text blob into a downloadable document container.
//!
//! Each format produces a complete file in memory with fixed headings. DOCX and PPTX
//! are minimal OOXML packages; PDF is a paginated Helvetica text document.

pub mod docx;
pub mod pdf;
pub mod pptx;

use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Heading written at the top of DOCX and PDF exports.
pub const DOCUMENT_HEADING: &str = "AI Generated Document";
/// Title of the single PPTX slide.
pub const SLIDE_TITLE: &str = "AI Generated Slide";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pptx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Docx, ExportFormat::Pptx, ExportFormat::Pdf];

    /// Registered media type of the container.
    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Docx => "generated_doc.docx",
            ExportFormat::Pptx => "generated_pres.pptx",
            ExportFormat::Pdf => "generated_doc.pdf",
        }
    }

    pub fn content_disposition(self) -> String {
        format!("attachment; filename={}", self.filename())
    }

    pub fn render(self, text: &str) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Docx => docx::render(text),
            ExportFormat::Pptx => pptx::render(text),
            ExportFormat::Pdf => pdf::render(text),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
    Pdf(lopdf::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Zip(e) => write!(f, "zip error: {}", e),
            ExportError::Pdf(e) => write!(f, "pdf error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(error: std::io::Error) -> Self {
        ExportError::Io(error)
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(error: zip::result::ZipError) -> Self {
        ExportError::Zip(error)
    }
}

impl From<lopdf::Error> for ExportError {
    fn from(error: lopdf::Error) -> Self {
        ExportError::Pdf(error)
    }
}

/// Escapes text for an XML text node, dropping characters XML 1.0 cannot carry.
pub(crate) fn xml_text(text: &str) -> String {
    let cleaned: Cow<str> = if text
        .chars()
        .any(|c| c < ' ' && c != '\t' && c != '\n' && c != '\r')
    {
        Cow::Owned(
            text.chars()
                .filter(|&c| c >= ' ' || c == '\t' || c == '\n' || c == '\r')
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    };
    quick_xml::escape::escape(cleaned.as_ref()).into_owned()
}

/// Writes `(path, xml)` parts into a deflated zip archive held in memory.
pub(crate) fn write_package(parts: &[(&str, String)]) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, xml) in parts {
        zip.start_file(*path, options)?;
        zip.write_all(xml.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}
