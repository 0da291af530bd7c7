//! Plain-text extraction for uploaded documents.
//!
//! Extraction is best effort: an upload is never rejected because its text could
//! not be read. Failures are logged and stored as empty content.

use std::io::{Cursor, Read};
use std::time::Duration;

use bytes::Bytes;
use quick_xml::events::Event;
use thiserror::Error;
use tracing::{info, warn};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const PARSE_TIMEOUT: Duration = Duration::from_secs(15);
/// Cap on the decompressed `word/document.xml` of a DOCX.
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("file too large for extraction: {0} bytes")]
    TooLarge(usize),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("extraction timed out after {}s", PARSE_TIMEOUT.as_secs())]
    Timeout,

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
}

impl FileKind {
    /// Classifies by extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "docx" => Ok(FileKind::Docx),
            "txt" | "md" | "csv" => Ok(FileKind::Text),
            other => Err(ExtractError::Unsupported(other.to_string())),
        }
    }
}

/// Extracts text synchronously. PDF and DOCX parsing is CPU-bound; call via `extract_text`.
pub fn extract_text_blocking(filename: &str, data: &[u8]) -> Result<String, ExtractError> {
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ExtractError::TooLarge(data.len()));
    }
    match FileKind::from_filename(filename)? {
        FileKind::Pdf => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        FileKind::Docx => extract_docx(data),
        FileKind::Text => Ok(String::from_utf8_lossy(data).into_owned()),
    }
}

/// Reads the `<w:t>` runs of `word/document.xml`, one line per paragraph.
fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::Docx("missing word/document.xml".to_string()))?;
    if entry.size() > MAX_DOCX_XML_BYTES {
        return Err(ExtractError::TooLarge(entry.size() as usize));
    }

    let mut xml = String::new();
    entry
        .take(MAX_DOCX_XML_BYTES)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if !paragraph.is_empty() {
                        paragraphs.push(std::mem::take(&mut paragraph));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Extracts text on the blocking pool under `PARSE_TIMEOUT`. Returns an empty
/// string when the file cannot be read.
pub async fn extract_text(filename: &str, data: Bytes) -> String {
    let name = filename.to_string();
    let task = tokio::task::spawn_blocking(move || extract_text_blocking(&name, &data));

    let result = match tokio::time::timeout(PARSE_TIMEOUT, task).await {
        Ok(joined) => joined.map_err(ExtractError::from).and_then(|r| r),
        Err(_) => Err(ExtractError::Timeout),
    };

    match result {
        Ok(text) => {
            info!("Extracted {} chars from {filename}", text.len());
            text
        }
        Err(ExtractError::Unsupported(ext)) => {
            info!("File type '{ext}' not supported for content extraction: {filename}");
            String::new()
        }
        Err(e) => {
            warn!("Could not extract text from {filename}: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_filename("Handbook.PDF").unwrap(), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("notes.md").unwrap(), FileKind::Text);
        assert_eq!(FileKind::from_filename("roster.csv").unwrap(), FileKind::Text);
        assert_eq!(FileKind::from_filename("Policy.DOCX").unwrap(), FileKind::Docx);
        assert!(matches!(
            FileKind::from_filename("legacy.doc"),
            Err(ExtractError::Unsupported(ext)) if ext == "doc"
        ));
        assert!(FileKind::from_filename("README").is_err());
    }

    #[test]
    fn test_text_files_are_read_lossily() {
        let text = extract_text_blocking("notes.txt", b"PTO: 20 days\xff").unwrap();
        assert!(text.starts_with("PTO: 20 days"));
    }

    #[test]
    fn test_oversized_files_are_rejected() {
        let data = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(
            extract_text_blocking("big.txt", &data),
            Err(ExtractError::TooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_yields_empty_text() {
        let text = extract_text("broken.pdf", Bytes::from_static(b"not a pdf")).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_unsupported_type_yields_empty_text() {
        let text = extract_text("scan.png", Bytes::from_static(b"\x89PNG")).await;
        assert_eq!(text, "");
    }

    fn docx_with_body(body: &str) -> Vec<u8> {
        use std::io::Write;

        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let data = docx_with_body(
            r#"<w:p><w:r><w:t>PTO: </w:t></w:r><w:r><w:t>20 days</w:t></w:r></w:p>
<w:p><w:r><w:t>Sick&amp;Safe</w:t><w:tab/><w:t>5 days</w:t></w:r></w:p>
<w:p></w:p>"#,
        );

        let text = extract_text_blocking("handbook.docx", &data).unwrap();

        assert_eq!(text, "PTO: 20 days\nSick&Safe\t5 days");
    }

    #[test]
    fn test_docx_without_document_xml_fails() {
        use std::io::Write;

        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("readme.txt", options).unwrap();
        writer.write_all(b"hello").unwrap();
        let data = writer.finish().unwrap().into_inner();

        assert!(matches!(
            extract_text_blocking("empty.docx", &data),
            Err(ExtractError::Docx(_))
        ));
    }

    #[tokio::test]
    async fn test_docx_upload_text_is_extracted() {
        let data = docx_with_body("<w:p><w:r><w:t>Remote work allowed</w:t></w:r></w:p>");
        let text = extract_text("policy.docx", Bytes::from(data)).await;
        assert_eq!(text, "Remote work allowed");
    }

    #[tokio::test]
    async fn test_corrupt_docx_yields_empty_text() {
        let text = extract_text("policy.docx", Bytes::from_static(b"PK\x03\x04")).await;
        assert_eq!(text, "");
    }
}
