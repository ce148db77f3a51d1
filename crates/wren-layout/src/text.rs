//! Text preparation ahead of line breaking.

use std::borrow::Cow;

use wren_html::decode_entities;

/// Collapse every run of ASCII whitespace to a single space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_whitespace() && pair[1].is_ascii_whitespace())
        || text
            .bytes()
            .any(|b| b.is_ascii_whitespace() && b != b' ');
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

/// Whitespace-normalize, then decode character references.
///
/// The order matters: `&#10;` survives as a literal newline.
#[must_use]
pub fn prepare(text: &str) -> String {
    decode_entities(&normalize_whitespace(text)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs() {
        assert_eq!(normalize_whitespace("a \n\t b"), "a b");
        assert_eq!(normalize_whitespace("  lead"), " lead");
        assert_eq!(normalize_whitespace("a\nb"), "a b");
    }

    #[test]
    fn borrows_when_clean() {
        assert!(matches!(normalize_whitespace("a b c"), Cow::Borrowed(_)));
    }

    #[test]
    fn non_ascii_whitespace_is_kept() {
        assert_eq!(normalize_whitespace("a\u{00A0}\u{00A0}b"), "a\u{00A0}\u{00A0}b");
    }

    #[test]
    fn decodes_after_normalizing() {
        assert_eq!(prepare("x  &amp;  y"), "x & y");
        assert_eq!(prepare("a&#10;&#10;b"), "a\n\nb");
    }
}
