//! Outline construction
//!
//! Runs the engine over one document: lines -> title -> headings.

use crate::extractor::TextRun;
use crate::headings::{classify_headings, Heading, H1_HEIGHT_TOLERANCE};
use crate::lines::{assemble_lines, Line, LINE_Y_TOLERANCE};
use crate::title::detect_title;
use serde::{Deserialize, Serialize};

/// Tunable constants for outline extraction
///
/// Changing the defaults alters which runs merge into a line and which lines
/// reach H1.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Baseline difference above which a run starts a new line
    pub line_y_tolerance: f32,
    /// Distance below the tallest line that still counts as H1
    pub h1_height_tolerance: f32,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            line_y_tolerance: LINE_Y_TOLERANCE,
            h1_height_tolerance: H1_HEIGHT_TOLERANCE,
        }
    }
}

/// Title and headings of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineResult {
    pub title: Option<String>,
    pub outline: Vec<Heading>,
}

impl OutlineResult {
    /// True when neither a title nor any heading was found
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.outline.is_empty()
    }
}

/// Build the outline from already assembled lines
pub fn build_outline(lines: &[Line], options: &OutlineOptions) -> OutlineResult {
    let title = detect_title(lines);
    let outline = classify_headings(lines, title.as_deref(), options.h1_height_tolerance);

    log::debug!(
        "outline: title={:?}, {} headings from {} lines",
        title,
        outline.len(),
        lines.len()
    );

    OutlineResult { title, outline }
}

/// Build the outline from the raw text runs of a document
pub fn outline_from_runs(runs: &[TextRun], options: &OutlineOptions) -> OutlineResult {
    let lines = assemble_lines(runs, options.line_y_tolerance);
    build_outline(&lines, options)
}
