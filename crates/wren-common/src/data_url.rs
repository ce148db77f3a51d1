//! Inline `data:` URL decoding.
//!
//! [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)
//!
//! "dataurl := "data:" [ mediatype ] [ ";base64" ] "," data"

use base64::Engine;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Errors raised while parsing or decoding a `data:` URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    /// The string does not start with `data:`.
    #[error("not a data URL")]
    MissingScheme,
    /// No `,` separates the metadata from the payload.
    #[error("invalid data URL: missing comma")]
    MissingComma,
    /// The `;base64` payload is not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(String),
}

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type without parameters, lower-cased. Empty when omitted.
    pub media_type: String,
    /// Whether the payload is base64-encoded.
    pub base64: bool,
    payload: String,
}

impl DataUrl {
    /// Split a raw `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::MissingScheme`] or [`DataUrlError::MissingComma`]
    /// when the string is not shaped like a data URL.
    pub fn parse(raw: &str) -> Result<Self, DataUrlError> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (metadata, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

        let base64 = metadata.ends_with(";base64");
        let media_type = metadata
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Ok(Self {
            media_type,
            base64,
            payload: payload.to_string(),
        })
    }

    /// Decode the payload into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::Base64`] if a base64 payload is malformed.
    /// Percent escapes that are truncated or not hexadecimal are kept
    /// verbatim.
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        if self.base64 {
            base64::engine::general_purpose::STANDARD
                .decode(self.payload.as_bytes())
                .map_err(|e| DataUrlError::Base64(e.to_string()))
        } else {
            Ok(percent_decode_str(&self.payload).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_payload_is_percent_decoded() {
        let url = DataUrl::parse("data:text/html,%3Cb%3Ehi%3C/b%3E").unwrap();
        assert_eq!(url.media_type, "text/html");
        assert!(!url.base64);
        assert_eq!(url.decode().unwrap(), b"<b>hi</b>");
    }

    #[test]
    fn base64_payload() {
        let url = DataUrl::parse("data:text/html;base64,PGk+aGk8L2k+").unwrap();
        assert!(url.base64);
        assert_eq!(url.decode().unwrap(), b"<i>hi</i>");
    }

    #[test]
    fn parameters_are_stripped_from_media_type() {
        let url = DataUrl::parse("data:Text/HTML;charset=utf-8,x").unwrap();
        assert_eq!(url.media_type, "text/html");
    }

    #[test]
    fn malformed_urls() {
        assert_eq!(
            DataUrl::parse("text/html,x"),
            Err(DataUrlError::MissingScheme)
        );
        assert_eq!(
            DataUrl::parse("data:text/html"),
            Err(DataUrlError::MissingComma)
        );
        let bad = DataUrl::parse("data:text/html;base64,not base64!").unwrap();
        assert!(matches!(bad.decode(), Err(DataUrlError::Base64(_))));
    }

    #[test]
    fn broken_percent_escapes_pass_through() {
        let url = DataUrl::parse("data:,50%2").unwrap();
        assert_eq!(url.decode().unwrap(), b"50%2");
        let url = DataUrl::parse("data:,%zz%41").unwrap();
        assert_eq!(url.decode().unwrap(), b"%zzA");
    }
}
