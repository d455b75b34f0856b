//! Pure value transforms referenced by the mapping tables.
//!
//! Each transform is `fn(&str) -> Option<String>` with no side effects,
//! so it can be unit-tested without the engine. Returning `None` tells
//! the engine the input didn't have the expected shape; the engine keeps
//! the raw value in that case.

use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.,#!$%^&*;:{}=\-_`~()]").expect("punctuation regex"))
}

fn multi_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("multi-space regex"))
}

/// Strip punctuation and collapse the resulting runs of spaces.
///
/// `"SMITH, JOHN Q"` becomes `"SMITH JOHN Q"`.
pub fn clean_string(s: &str) -> Option<String> {
    let no_punct = punctuation().replace_all(s, " ");
    let collapsed = multi_space().replace_all(&no_punct, " ");
    Some(collapsed.trim().to_string())
}

/// Strip a caption from the front of a composite field.
///
/// `"Owner Address: 812 GLAMORGAN AVE"` becomes `"812 GLAMORGAN AVE"`.
/// Fails on input with no colon.
pub fn text_after_colon(s: &str) -> Option<String> {
    s.split_once(':').map(|(_, rest)| rest.trim().to_string())
}

/// Colorado owner fields arrive as `"Owner: DOE JOHN /"`, caption and
/// trailing slash and all.
pub fn co_owner(s: &str) -> Option<String> {
    let after = text_after_colon(s)?;
    let trimmed = after.strip_suffix('/').unwrap_or(&after);
    clean_string(trimmed)
}

/// Render a street address as a URL path segment for map links.
pub fn street_link(s: &str) -> Option<String> {
    let cleaned = clean_string(s)?;
    Some(cleaned.split_whitespace().collect::<Vec<_>>().join("+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_string_strips_punctuation() {
        assert_eq!(clean_string("SMITH, JOHN Q").unwrap(), "SMITH JOHN Q");
        assert_eq!(clean_string("O=BRIEN; PAT (JR.)").unwrap(), "O BRIEN PAT JR");
    }

    #[test]
    fn test_clean_string_collapses_spaces() {
        assert_eq!(clean_string("A  B   C").unwrap(), "A B C");
    }

    #[test]
    fn test_text_after_colon() {
        assert_eq!(
            text_after_colon("Owner Address: 812 GLAMORGAN AVE").unwrap(),
            "812 GLAMORGAN AVE"
        );
        assert_eq!(text_after_colon("no caption here"), None);
    }

    #[test]
    fn test_co_owner() {
        assert_eq!(co_owner("Owner: DOE, JOHN /").unwrap(), "DOE JOHN");
        assert_eq!(co_owner("DOE JOHN"), None);
    }

    #[test]
    fn test_street_link() {
        assert_eq!(street_link("812 Glamorgan Ave.").unwrap(), "812+Glamorgan+Ave");
    }
}
