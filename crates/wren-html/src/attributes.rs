//! Attribute parsing for tag bodies.
//!
//! The tree builder hands us everything after the tag name, e.g.
//! `class='title' id="x" disabled /`, and we turn it into an
//! [`AttributesMap`].

use wren_dom::AttributesMap;

/// Parse the attribute part of a tag body.
///
/// - Tokens are separated by single spaces; empty tokens are skipped. A
///   quoted value containing a space is split like anything else.
/// - A trailing bare `/` (self-close marker) is dropped.
/// - `name=value` splits on the first `=`. A value longer than two
///   characters that starts and ends with the same quote (`'` or `"`) has
///   those quotes stripped.
/// - A bare `name` maps to the empty string.
/// - Names are case-insensitive; a later duplicate replaces an earlier one.
#[must_use]
pub fn parse_attributes(rest: &str) -> AttributesMap {
    let mut tokens: Vec<&str> = rest
        .split(' ')
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.last() == Some(&"/") {
        let _ = tokens.pop();
    }

    let mut attributes = AttributesMap::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => {
                let _ = attributes.insert(key, unquote(value));
            }
            None => {
                let _ = attributes.insert(token, "");
            }
        }
    }
    attributes
}

/// Strip one pair of matching quotes from a value longer than two characters.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open @ (b'"' | b'\'')), Some(&close)) if value.len() > 2 && open == close => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_values_are_unquoted() {
        let attrs = parse_attributes("class='title' id=\"x\"");
        assert_eq!(attrs.get("class"), Some("title"));
        assert_eq!(attrs.get("id"), Some("x"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn bare_token_has_empty_value() {
        let attrs = parse_attributes("disabled");
        assert_eq!(attrs.get("disabled"), Some(""));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let attrs = parse_attributes("src=x.png /");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("src"), Some("x.png"));
    }

    #[test]
    fn short_quoted_values_are_kept_verbatim() {
        let attrs = parse_attributes("a=\"\" b='x'");
        assert_eq!(attrs.get("a"), Some("\"\""));
        assert_eq!(attrs.get("b"), Some("x"));
    }

    #[test]
    fn value_splits_on_first_equals() {
        let attrs = parse_attributes("href=\"?a=1&b=2\"");
        assert_eq!(attrs.get("href"), Some("?a=1&b=2"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let attrs = parse_attributes("CLASS=big Class=small");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("class"), Some("small"));
    }

    #[test]
    fn space_inside_quotes_splits_the_value() {
        let attrs = parse_attributes("title=\"Big Title\" id=x");
        assert_eq!(attrs.get("title"), Some("\"Big"));
        assert_eq!(attrs.get("title\""), Some(""));
        assert_eq!(attrs.get("id"), Some("x"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn repeated_spaces_do_not_make_empty_attributes() {
        let attrs = parse_attributes("a=1   b=2 ");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("b"), Some("2"));
    }

    #[test]
    fn empty_rest() {
        assert!(parse_attributes("").is_empty());
        assert!(parse_attributes("   ").is_empty());
        assert!(parse_attributes("/").is_empty());
    }
}
