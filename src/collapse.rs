//! Repetition collapsing
//!
//! Some generators simulate bold text by painting the same run two or three
//! times with a small offset, which shows up as "Heading Heading Heading" or
//! as doubled letters ("HHeeaaddiinngg") once the runs are merged into a line.

/// Normalized comparison key for a token: ASCII letters only, lowercased,
/// with runs of identical letters squeezed to one
fn token_key(token: &str) -> String {
    let mut key = String::with_capacity(token.len());
    for c in token.chars().filter(|c| c.is_ascii_alphabetic()) {
        let c = c.to_ascii_lowercase();
        if !key.ends_with(c) {
            key.push(c);
        }
    }
    key
}

/// Drop tokens that repeat the previous kept token
///
/// Tokens are kept verbatim. A token is dropped when its key is empty
/// (no letters at all) or equal to the key of the previous kept token, so
/// only adjacent repeats are removed.
pub fn collapse_repetition(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut prev_key: Option<String> = None;

    for token in text.split_whitespace() {
        let key = token_key(token);
        if key.is_empty() || prev_key.as_deref() == Some(key.as_str()) {
            continue;
        }
        kept.push(token);
        prev_key = Some(key);
    }

    kept.join(" ")
}
