//! Heading classification
//!
//! Every valid line is ranked against document-wide height statistics using an
//! ordered rule table; the first rule that matches decides the level.
//!
//! When every valid line has the same height, `max == avg == min` and the H1
//! rule matches every line, so the whole outline is H1. That is the expected
//! result for uniformly typeset documents.

use crate::collapse::collapse_repetition;
use crate::lines::Line;
use crate::validate::is_valid_line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far below the tallest line a line may be and still count as H1
pub const H1_HEIGHT_TOLERANCE: f32 = 1.0;

/// Heading rank; a flat tag, not a nesting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Numeric rank (1-6)
    pub fn rank(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.rank())
    }
}

/// A classified heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Height statistics over the valid lines of a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStats {
    pub max: f32,
    pub min: f32,
    pub avg: f32,
}

impl HeightStats {
    /// Compute statistics, or `None` for an empty set
    pub fn from_lines<'a, I>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Line>,
    {
        let mut max = f32::NEG_INFINITY;
        let mut min = f32::INFINITY;
        let mut sum = 0.0f32;
        let mut count = 0usize;

        for line in lines {
            max = max.max(line.height);
            min = min.min(line.height);
            sum += line.height;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(HeightStats {
            max,
            min,
            avg: sum / count as f32,
        })
    }
}

/// Inputs a rule looks at: the line's own height and length, plus the
/// document-wide constants
#[derive(Debug, Clone, Copy)]
pub struct RuleInput {
    pub height: f32,
    pub char_len: usize,
    pub stats: HeightStats,
    pub h1_tolerance: f32,
}

type LevelRule = fn(&RuleInput) -> bool;

fn rule_h1(i: &RuleInput) -> bool {
    i.height >= i.stats.max - i.h1_tolerance
}

fn rule_h2(i: &RuleInput) -> bool {
    i.height >= i.stats.avg + (i.stats.max - i.stats.avg) * 0.5
}

fn rule_h3(i: &RuleInput) -> bool {
    i.height >= i.stats.avg + (i.stats.max - i.stats.avg) * 0.2
}

fn rule_h4(i: &RuleInput) -> bool {
    i.height > i.stats.avg * 0.95 && i.char_len < 60
}

fn rule_h5(i: &RuleInput) -> bool {
    i.height > i.stats.avg * 1.05 && i.char_len < 40
}

fn rule_h6(i: &RuleInput) -> bool {
    i.char_len < 25 && i.height > i.stats.min + 2.0
}

/// Ordered rule table, first match wins
pub const LEVEL_RULES: &[(HeadingLevel, LevelRule)] = &[
    (HeadingLevel::H1, rule_h1),
    (HeadingLevel::H2, rule_h2),
    (HeadingLevel::H3, rule_h3),
    (HeadingLevel::H4, rule_h4),
    (HeadingLevel::H5, rule_h5),
    (HeadingLevel::H6, rule_h6),
];

/// Level for a single line, or `None` when no rule matches
pub fn level_for(input: &RuleInput) -> Option<HeadingLevel> {
    LEVEL_RULES
        .iter()
        .find(|(_, rule)| rule(input))
        .map(|(level, _)| *level)
}

fn is_title_line(cleaned: &str, title: Option<&str>) -> bool {
    title.is_some_and(|t| cleaned.trim().to_lowercase() == t.trim().to_lowercase())
}

/// Classify the lines of a whole document into headings
///
/// Lines failing validation are ignored entirely (they do not feed the height
/// statistics either). A line whose cleaned text matches `title` is skipped.
/// Output keeps encounter order.
pub fn classify_headings(lines: &[Line], title: Option<&str>, h1_tolerance: f32) -> Vec<Heading> {
    let valid: Vec<&Line> = lines.iter().filter(|l| is_valid_line(l)).collect();

    let Some(stats) = HeightStats::from_lines(valid.iter().copied()) else {
        return Vec::new();
    };
    log::debug!(
        "height stats over {} lines: max={:.2} min={:.2} avg={:.2}",
        valid.len(),
        stats.max,
        stats.min,
        stats.avg
    );

    let mut headings = Vec::new();
    for line in valid {
        let cleaned = collapse_repetition(line.text.trim());
        if is_title_line(&cleaned, title) {
            continue;
        }

        let input = RuleInput {
            height: line.height,
            char_len: line.char_len(),
            stats,
            h1_tolerance,
        };

        if let Some(level) = level_for(&input) {
            headings.push(Heading {
                level,
                text: cleaned,
                page: line.page,
            });
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, height: f32, page: u32) -> Line {
        Line {
            text: text.into(),
            height,
            width: 100.0,
            page,
        }
    }

    fn input(height: f32, char_len: usize, max: f32, min: f32, avg: f32) -> RuleInput {
        RuleInput {
            height,
            char_len,
            stats: HeightStats { max, min, avg },
            h1_tolerance: H1_HEIGHT_TOLERANCE,
        }
    }

    #[test]
    fn test_rule_h1_tolerance() {
        assert_eq!(level_for(&input(23.0, 10, 24.0, 10.0, 12.0)), Some(HeadingLevel::H1));
        assert_ne!(level_for(&input(22.9, 10, 24.0, 10.0, 12.0)), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_rule_h2_h3() {
        // avg 12, max 24: H2 >= 18, H3 >= 14.4
        assert_eq!(level_for(&input(18.0, 10, 24.0, 10.0, 12.0)), Some(HeadingLevel::H2));
        assert_eq!(level_for(&input(15.0, 10, 24.0, 10.0, 12.0)), Some(HeadingLevel::H3));
    }

    #[test]
    fn test_rule_h4_length_limit() {
        // avg 12: H4 needs height > 11.4 and fewer than 60 characters
        assert_eq!(level_for(&input(12.0, 59, 24.0, 10.0, 12.0)), Some(HeadingLevel::H4));
        assert_eq!(level_for(&input(12.0, 60, 24.0, 10.0, 12.0)), None);
    }

    #[test]
    fn test_rule_h5_and_h6() {
        // With positive heights H4 shadows H5, so check the predicate directly
        let h5 = input(10.6, 61, 100.0, 1.0, 10.0);
        assert!(!rule_h4(&h5));
        assert!(rule_h5(&RuleInput { char_len: 30, ..h5 }));

        // Short line slightly taller than the smallest text
        assert_eq!(level_for(&input(9.0, 20, 24.0, 6.0, 12.0)), Some(HeadingLevel::H6));
        assert_eq!(level_for(&input(9.0, 25, 24.0, 6.0, 12.0)), None);
    }

    #[test]
    fn test_stats() {
        let lines = vec![line("Alpha", 24.0, 1), line("Beta", 10.0, 1), line("Gamma", 14.0, 1)];
        let stats = HeightStats::from_lines(&lines).unwrap();
        assert_eq!(stats.max, 24.0);
        assert_eq!(stats.min, 10.0);
        assert!((stats.avg - 16.0).abs() < 0.001);
        assert!(HeightStats::from_lines(Vec::<Line>::new().iter()).is_none());
    }

    #[test]
    fn test_uniform_heights_all_h1() {
        let lines: Vec<Line> = ["One line", "Two line", "Three line", "Four line", "Five line"]
            .iter()
            .map(|t| line(t, 12.0, 1))
            .collect();
        let headings = classify_headings(&lines, None, H1_HEIGHT_TOLERANCE);
        assert_eq!(headings.len(), 5);
        assert!(headings.iter().all(|h| h.level == HeadingLevel::H1));
    }

    #[test]
    fn test_title_excluded() {
        let lines = vec![line("My Report", 24.0, 1), line("Background", 24.0, 2)];
        let headings = classify_headings(&lines, Some("MY REPORT "), H1_HEIGHT_TOLERANCE);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Background");
    }

    #[test]
    fn test_invalid_lines_ignored() {
        let lines = vec![line("42", 40.0, 1), line("Scope", 12.0, 1)];
        let headings = classify_headings(&lines, None, H1_HEIGHT_TOLERANCE);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_empty() {
        assert!(classify_headings(&[], None, H1_HEIGHT_TOLERANCE).is_empty());
    }

    #[test]
    fn test_level_serializes_as_tag() {
        let h = Heading {
            level: HeadingLevel::H3,
            text: "Scope".into(),
            page: 2,
        };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"level":"H3","text":"Scope","page":2}"#);
        assert_eq!(HeadingLevel::H3.to_string(), "H3");
    }
}
