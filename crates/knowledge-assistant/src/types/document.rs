//! Uploaded document types

use serde::{Deserialize, Serialize};

/// Accepted upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
}

impl DocumentKind {
    /// Detect the kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Detect the kind from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Txt => "Text File",
        }
    }

    /// Accepted extensions, for error messages and API info
    pub fn accepted_extensions() -> &'static [&'static str] {
        &["pdf", "docx", "txt"]
    }
}

/// One uploaded file as received by the hosting layer
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original filename (the file's identifier within a session)
    pub filename: String,
    /// Raw file bytes
    pub data: bytes::Bytes,
    /// Declared format
    pub kind: DocumentKind,
}

impl Upload {
    /// Build an upload, detecting its kind from the filename
    pub fn new(filename: impl Into<String>, data: impl Into<bytes::Bytes>) -> Option<Self> {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename)?;
        Some(Self {
            filename,
            data: data.into(),
            kind,
        })
    }
}
