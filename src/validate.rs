//! Noise filtering for assembled lines
//!
//! Page furniture (bare numbers, bullets, URLs, stray punctuation) never counts
//! as evidence for the title or for heading statistics.

use crate::lines::Line;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://|www\.|\.(com|org|net|in)\b)").unwrap()
});

/// Check whether a line is eligible for title or heading detection
pub fn is_valid_line(line: &Line) -> bool {
    is_valid_text(&line.text)
}

/// Text-level form of [`is_valid_line`]
pub fn is_valid_text(text: &str) -> bool {
    let trimmed = text.trim();

    let starts_with_letter = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());

    starts_with_letter
        && !URL_RE.is_match(trimmed)
        && trimmed.chars().count() > 2
        && trimmed.chars().any(|c| c.is_ascii_alphabetic())
}
