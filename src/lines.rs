//! Line assembly
//!
//! Groups positioned text runs into visual lines by baseline proximity.
//! Runs are consumed in PDF stream order; no sorting is applied within a page.

use crate::extractor::TextRun;

/// Maximum baseline difference (in points) for two consecutive runs to share a line
pub const LINE_Y_TOLERANCE: f32 = 2.0;

/// A visual line built from one or more text runs
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Run texts joined by single spaces, trimmed
    pub text: String,
    /// Tallest run height on the line
    pub height: f32,
    /// Sum of run widths
    pub width: f32,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Line {
    fn from_runs(runs: &[&TextRun], page: u32) -> Self {
        let text = runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let height = runs.iter().map(|r| r.height).fold(f32::NEG_INFINITY, f32::max);
        let width = runs.iter().map(|r| r.width).sum();

        Line {
            text,
            height,
            width,
            page,
        }
    }

    /// Length of the line text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Assemble the runs of a single page into lines
///
/// Whitespace-only runs are skipped and do not move the baseline cursor.
/// A new line starts whenever the baseline jumps by more than `y_tolerance`
/// relative to the previous kept run.
pub fn assemble_page_lines(runs: &[TextRun], page: u32, y_tolerance: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<&TextRun> = Vec::new();
    let mut last_y: Option<f32> = None;

    for run in runs {
        if run.text.trim().is_empty() {
            continue;
        }

        if let Some(prev_y) = last_y {
            if (prev_y - run.y).abs() > y_tolerance {
                lines.push(Line::from_runs(&current, page));
                current.clear();
            }
        }

        current.push(run);
        last_y = Some(run.y);
    }

    if !current.is_empty() {
        lines.push(Line::from_runs(&current, page));
    }

    lines
}

/// Assemble runs spanning a whole document into lines
///
/// Runs are split by page (ascending page number, stream order kept within a
/// page) and each page is assembled independently.
pub fn assemble_lines(runs: &[TextRun], y_tolerance: f32) -> Vec<Line> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut pages: Vec<u32> = runs.iter().map(|r| r.page).collect();
    pages.sort();
    pages.dedup();

    let mut all_lines = Vec::new();
    for page in pages {
        let page_runs: Vec<TextRun> = runs.iter().filter(|r| r.page == page).cloned().collect();
        let lines = assemble_page_lines(&page_runs, page, y_tolerance);
        log::debug!("page {}: {} runs -> {} lines", page, page_runs.len(), lines.len());
        all_lines.extend(lines);
    }

    all_lines
}
