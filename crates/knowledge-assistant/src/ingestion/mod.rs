//! Document ingestion: typed per-format extraction and concatenation

mod parser;
mod processor;

pub use parser::{
    default_extractor, DocxExtractor, ExtractedText, PdfExtractor, PlainTextExtractor,
    TextExtractor,
};
pub use processor::{IngestOutcome, IngestPipeline};
