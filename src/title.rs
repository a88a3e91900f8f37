//! Document title detection
//!
//! The title is picked from page-1 lines only: large, reasonably wide, and
//! short enough not to be a paragraph.

use crate::collapse::collapse_repetition;
use crate::lines::Line;
use crate::validate::is_valid_line;
use once_cell::sync::Lazy;
use regex::Regex;

/// Section labels that are never accepted as a document title
static GENERIC_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(introduction|abstract|contents|table of contents)$").unwrap());

const MIN_TITLE_HEIGHT: f32 = 10.0;
const MIN_TITLE_WIDTH: f32 = 40.0;
const MAX_TITLE_CHARS: usize = 120;

struct TitleCandidate<'a> {
    line: &'a Line,
    score: f32,
}

/// Title score: taller and shorter wins, width is a weaker signal
fn title_score(line: &Line) -> f32 {
    line.height * 2.0 + line.width * 0.5 - line.char_len() as f32 * 1.5
}

fn looks_like_title(line: &Line) -> bool {
    line.height > MIN_TITLE_HEIGHT
        && line.width > MIN_TITLE_WIDTH
        && line.char_len() < MAX_TITLE_CHARS
}

fn cleaned_text(line: &Line) -> String {
    collapse_repetition(line.text.trim()).trim().to_string()
}

/// Check whether text is a generic section label such as "Abstract"
pub fn is_generic_label(text: &str) -> bool {
    GENERIC_LABEL_RE.is_match(text)
}

/// Detect the document title from the lines of the whole document
///
/// Returns `None` when page 1 has no valid line or no line that looks like a
/// title. When the best candidate is a generic label, the runner-up is used
/// instead (and `None` if there is none).
pub fn detect_title(lines: &[Line]) -> Option<String> {
    let first_page: Vec<&Line> = lines
        .iter()
        .filter(|l| l.page == 1 && is_valid_line(l))
        .collect();

    if first_page.is_empty() {
        log::debug!("no valid lines on page 1");
        return None;
    }

    let mut candidates: Vec<TitleCandidate> = first_page
        .into_iter()
        .filter(|l| looks_like_title(l))
        .map(|line| TitleCandidate {
            line,
            score: title_score(line),
        })
        .collect();

    // Stable: equal scores keep stream order
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top = candidates.first()?;
    let cleaned = cleaned_text(top.line);

    if is_generic_label(&cleaned) {
        log::debug!("title candidate {:?} is a generic label, falling back", cleaned);
        return candidates.get(1).map(|c| cleaned_text(c.line));
    }

    log::debug!("title {:?} (score {:.1})", cleaned, top.score);
    Some(cleaned)
}
