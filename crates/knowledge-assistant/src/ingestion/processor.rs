//! Ingestion pipeline orchestration

use std::sync::Arc;

use crate::types::response::{ExtractedFile, IngestError};
use crate::types::{DocumentKind, DocumentSet, Upload};

use super::parser::{default_extractor, TextExtractor};

/// Result of ingesting one upload batch
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Replacement document set (every uploaded name, text of the files that parsed)
    pub documents: DocumentSet,
    /// Files that produced text
    pub files: Vec<ExtractedFile>,
    /// Files that failed, in upload order
    pub errors: Vec<IngestError>,
}

/// Main ingestion pipeline: dispatches each upload to its format handler
/// and concatenates the results in upload order
pub struct IngestPipeline {
    pdf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
    txt: Arc<dyn TextExtractor>,
}

impl IngestPipeline {
    /// Create a pipeline with the built-in PDF, DOCX and text handlers
    pub fn new() -> Self {
        Self {
            pdf: Arc::from(default_extractor(DocumentKind::Pdf)),
            docx: Arc::from(default_extractor(DocumentKind::Docx)),
            txt: Arc::from(default_extractor(DocumentKind::Txt)),
        }
    }

    /// Replace the handler for one document kind
    pub fn with_extractor(mut self, kind: DocumentKind, extractor: Arc<dyn TextExtractor>) -> Self {
        *self.slot(kind) = extractor;
        self
    }

    fn slot(&mut self, kind: DocumentKind) -> &mut Arc<dyn TextExtractor> {
        match kind {
            DocumentKind::Pdf => &mut self.pdf,
            DocumentKind::Docx => &mut self.docx,
            DocumentKind::Txt => &mut self.txt,
        }
    }

    fn extractor(&self, kind: DocumentKind) -> &dyn TextExtractor {
        match kind {
            DocumentKind::Pdf => self.pdf.as_ref(),
            DocumentKind::Docx => self.docx.as_ref(),
            DocumentKind::Txt => self.txt.as_ref(),
        }
    }

    /// Extract and concatenate every upload.
    ///
    /// A failing file is reported and skipped; the others still contribute.
    pub fn ingest(&self, uploads: &[Upload]) -> IngestOutcome {
        let mut context = String::new();
        let mut names = Vec::with_capacity(uploads.len());
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for upload in uploads {
            names.push(upload.filename.clone());
            tracing::info!(
                "Processing file: {} ({}, {} bytes)",
                upload.filename,
                upload.kind.display_name(),
                upload.data.len()
            );

            match self.extractor(upload.kind).extract(&upload.filename, &upload.data) {
                Ok(extracted) => {
                    files.push(ExtractedFile {
                        filename: upload.filename.clone(),
                        kind: upload.kind,
                        characters: extracted.content.chars().count(),
                        pages: extracted.pages,
                    });
                    context.push_str(&extracted.content);
                    context.push('\n');
                }
                Err(e) => {
                    tracing::warn!("Failed to extract {}: {}", upload.filename, e);
                    errors.push(IngestError {
                        filename: upload.filename.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        IngestOutcome {
            documents: DocumentSet::new(names, context),
            files,
            errors,
        }
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new()
    }
}
