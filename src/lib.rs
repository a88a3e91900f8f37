//! PDF outline extraction using lopdf
//!
//! This crate provides:
//! - Positioned text run extraction from PDF content streams
//! - Line assembly, noise filtering and repetition collapsing
//! - Title detection and H1-H6 heading classification by font-size statistics
//! - A parallel batch driver writing one JSON outline per document

pub mod batch;
pub mod collapse;
pub mod extractor;
pub mod headings;
pub mod lines;
pub mod outline;
pub mod title;
pub mod validate;

pub use batch::{run_batch, BatchOptions, BatchSummary, DocumentReport, DocumentStatus};
pub use collapse::collapse_repetition;
pub use extractor::{extract_text_runs, extract_text_runs_mem, TextRun};
pub use headings::{classify_headings, Heading, HeadingLevel, H1_HEIGHT_TOLERANCE};
pub use lines::{assemble_lines, Line, LINE_Y_TOLERANCE};
pub use outline::{build_outline, outline_from_runs, OutlineOptions, OutlineResult};
pub use title::detect_title;
pub use validate::is_valid_line;

use std::path::Path;

/// Extract the outline of a PDF file with default options
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineResult, OutlineError> {
    extract_outline_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<OutlineResult, OutlineError> {
    let runs = extract_text_runs(&path)?;
    log::debug!("{}: {} text runs", path.as_ref().display(), runs.len());
    Ok(outline_from_runs(&runs, options))
}

/// Extract the outline of a PDF held in memory
pub fn extract_outline_mem(buffer: &[u8]) -> Result<OutlineResult, OutlineError> {
    let runs = extract_text_runs_mem(buffer)?;
    Ok(outline_from_runs(&runs, &OutlineOptions::default()))
}

#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for OutlineError {
    fn from(e: lopdf::Error) -> Self {
        OutlineError::Parse(e.to_string())
    }
}
