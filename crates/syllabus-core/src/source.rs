//! Document text sources.
//!
//! Plain text and markdown files are read as-is. PDF files go through
//! `pdf-extract` when the `pdf` feature is enabled.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;

/// Extensions tried when a corpus id names a document without one.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
}

impl DocumentFormat {
    /// Format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" | "md" | "markdown" => Ok(DocumentFormat::Text),
            "pdf" => Ok(DocumentFormat::Pdf),
            "" => Err(SourceError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(SourceError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Extract text from raw document bytes.
pub fn text_from_bytes(format: DocumentFormat, data: &[u8]) -> Result<String, SourceError> {
    match format {
        DocumentFormat::Text => Ok(String::from_utf8_lossy(data).into_owned()),
        DocumentFormat::Pdf => pdf_text(data),
    }
}

#[cfg(feature = "pdf")]
fn pdf_text(data: &[u8]) -> Result<String, SourceError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

    // Scanned PDFs carry no text layer.
    if text.trim().is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_data: &[u8]) -> Result<String, SourceError> {
    Err(SourceError::UnsupportedFormat(
        "pdf (built without the `pdf` feature)".to_string(),
    ))
}

/// Read a document file and return its text.
pub fn read_document(path: &Path) -> crate::Result<String> {
    let format = DocumentFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(text_from_bytes(format, &data)?)
}

/// Locate the file for a corpus document id inside `dir`.
pub fn resolve_document(dir: &Path, document_id: &str) -> Option<PathBuf> {
    let direct = dir.join(document_id);
    if direct.is_file() {
        return Some(direct);
    }

    DOCUMENT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", document_id, ext)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyllabusError;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.TXT")).unwrap(), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_path(Path::new("a.md")).unwrap(), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_path(Path::new("a.pdf")).unwrap(), DocumentFormat::Pdf);
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.docx")),
            Err(SourceError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_read_text_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.txt");
        std::fs::write(&path, "Email: prof@school.edu\n").unwrap();

        assert_eq!(read_document(&path).unwrap(), "Email: prof@school.edu\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("gone.txt")).unwrap_err();
        assert!(matches!(err, SyllabusError::Io(_)));
    }

    #[test]
    fn test_resolve_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bio101.txt"), "text").unwrap();
        std::fs::write(dir.path().join("chem.pdf.txt"), "text").unwrap();

        assert_eq!(resolve_document(dir.path(), "bio101"), Some(dir.path().join("bio101.txt")));
        assert_eq!(resolve_document(dir.path(), "bio101.txt"), Some(dir.path().join("bio101.txt")));
        assert_eq!(resolve_document(dir.path(), "chem.pdf"), Some(dir.path().join("chem.pdf.txt")));
        assert_eq!(resolve_document(dir.path(), "missing"), None);
    }
}
