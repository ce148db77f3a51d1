//! Character reference decoding.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The tree builder keeps text raw; layout decodes references right before
//! measuring. The full spec defines 2,231 entities; we implement the most
//! common ones here.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character reference table.
/// Maps entity names (without the leading '&') to their replacement strings.
///
/// NOTE: The spec requires entities to be matched WITH the trailing semicolon
/// when present, but some legacy entities work without it (e.g., "&amp").
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Most common entities (required for basic HTML)
        ("amp;", "&"),
        ("amp", "&"), // Legacy (no semicolon)
        ("lt;", "<"),
        ("lt", "<"), // Legacy
        ("gt;", ">"),
        ("gt", ">"), // Legacy
        ("quot;", "\""),
        ("quot", "\""), // Legacy
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        ("nbsp", "\u{00A0}"), // Legacy
        ("shy;", "\u{00AD}"),
        // Common punctuation and symbols
        ("copy;", "\u{00A9}"),
        ("copy", "\u{00A9}"), // Legacy
        ("reg;", "\u{00AE}"),
        ("trade;", "\u{2122}"),
        ("mdash;", "\u{2014}"),
        ("ndash;", "\u{2013}"),
        ("hellip;", "\u{2026}"),
        ("bull;", "\u{2022}"),
        ("middot;", "\u{00B7}"),
        ("sect;", "\u{00A7}"),
        ("para;", "\u{00B6}"),
        ("dagger;", "\u{2020}"),
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("laquo;", "\u{00AB}"),
        ("raquo;", "\u{00BB}"),
        // Currency
        ("cent;", "\u{00A2}"),
        ("pound;", "\u{00A3}"),
        ("euro;", "\u{20AC}"),
        ("yen;", "\u{00A5}"),
        // Math symbols
        ("times;", "\u{00D7}"),
        ("divide;", "\u{00F7}"),
        ("plusmn;", "\u{00B1}"),
        ("minus;", "\u{2212}"),
        ("ne;", "\u{2260}"),
        ("le;", "\u{2264}"),
        ("ge;", "\u{2265}"),
        ("deg;", "\u{00B0}"),
        ("sup2;", "\u{00B2}"),
        ("sup3;", "\u{00B3}"),
        ("frac12;", "\u{00BD}"),
        ("frac14;", "\u{00BC}"),
        ("frac34;", "\u{00BE}"),
        ("infin;", "\u{221E}"),
        // Arrows
        ("larr;", "\u{2190}"),
        ("rarr;", "\u{2192}"),
        ("uarr;", "\u{2191}"),
        ("darr;", "\u{2193}"),
        // Greek letters (commonly used)
        ("alpha;", "\u{03B1}"),
        ("beta;", "\u{03B2}"),
        ("gamma;", "\u{03B3}"),
        ("delta;", "\u{03B4}"),
        ("lambda;", "\u{03BB}"),
        ("mu;", "\u{03BC}"),
        ("pi;", "\u{03C0}"),
        ("sigma;", "\u{03C3}"),
        ("omega;", "\u{03C9}"),
        // Accented characters (common)
        ("Agrave;", "\u{00C0}"),
        ("Aacute;", "\u{00C1}"),
        ("Auml;", "\u{00C4}"),
        ("agrave;", "\u{00E0}"),
        ("aacute;", "\u{00E1}"),
        ("acirc;", "\u{00E2}"),
        ("auml;", "\u{00E4}"),
        ("Eacute;", "\u{00C9}"),
        ("egrave;", "\u{00E8}"),
        ("eacute;", "\u{00E9}"),
        ("iacute;", "\u{00ED}"),
        ("oacute;", "\u{00F3}"),
        ("ouml;", "\u{00F6}"),
        ("Ouml;", "\u{00D6}"),
        ("uacute;", "\u{00FA}"),
        ("uuml;", "\u{00FC}"),
        ("Uuml;", "\u{00DC}"),
        ("szlig;", "\u{00DF}"),
        ("ntilde;", "\u{00F1}"),
        ("ccedil;", "\u{00E7}"),
    ])
});

/// Longest entity name we bother scanning for.
const MAX_NAME_LEN: usize = 32;

/// Look up a named character reference.
///
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Returns Some("&")
/// lookup_entity("amp")   // Returns Some("&") - legacy support
/// lookup_entity("xyz;")  // Returns None
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode named (`&amp;`), decimal (`&#38;`), and hexadecimal (`&#x26;`)
/// character references.
///
/// Unknown or malformed references are left in the output verbatim. Numeric
/// references to NUL, surrogates, or values past U+10FFFF decode to U+FFFD.
/// Returns the input unchanged (borrowed) when it holds no `&`.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the reference that starts right after an `&`.
///
/// Returns the replacement and the number of bytes consumed from `input`.
fn decode_reference(input: &str) -> Option<(Cow<'static, str>, usize)> {
    if let Some(numeric) = input.strip_prefix('#') {
        let (code, consumed) = decode_numeric(numeric)?;
        return Some((Cow::Owned(code.to_string()), consumed + 1));
    }

    let name_len = input
        .bytes()
        .take(MAX_NAME_LEN)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &input[..name_len];

    if input[name_len..].starts_with(';')
        && let Some(value) = lookup_entity(&input[..=name_len])
    {
        return Some((Cow::Borrowed(value), name_len + 1));
    }

    // Legacy references may appear without the semicolon; take the longest
    // prefix that names one.
    (1..=name_len)
        .rev()
        .find_map(|len| lookup_entity(&name[..len]).map(|value| (Cow::Borrowed(value), len)))
}

/// Decode the digits of a numeric reference (after `&#`).
fn decode_numeric(input: &str) -> Option<(char, usize)> {
    let (radix, prefix_len) = match input.as_bytes().first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };
    let digits = &input[prefix_len..];
    let digit_len = digits
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digit_len == 0 {
        return None;
    }

    let value = u32::from_str_radix(&digits[..digit_len], radix).unwrap_or(u32::MAX);
    let ch = match value {
        0 => char::REPLACEMENT_CHARACTER,
        v => char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER),
    };

    let mut consumed = prefix_len + digit_len;
    if digits[digit_len..].starts_with(';') {
        consumed += 1;
    }
    Some((ch, consumed))
}
