//! Validated `data:<mime>;base64,<payload>` image URIs.

use crate::mime::detect_image_mime;
use crate::{Error, Result};
use base64::Engine as _;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// An image encoded inline as a base64 data URI.
///
/// Construction guarantees the `data:` scheme, a `type/subtype` media type, a
/// `;base64` marker (any case) and a non-empty payload made of standard base64
/// characters with correct padding. Line breaks and other ASCII whitespace in
/// the payload are allowed and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    raw: String,
    mime_type_end: usize,
    payload_start: usize,
}

impl DataUri {
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::MissingImage);
        }

        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUri("missing 'data:' scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUri("missing ',' before payload".to_string()))?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default();
        if !is_media_type(mime_type) {
            return Err(Error::InvalidDataUri(format!(
                "invalid media type '{}'",
                mime_type
            )));
        }
        if !params
            .last()
            .is_some_and(|marker| marker.eq_ignore_ascii_case("base64"))
        {
            return Err(Error::InvalidDataUri(
                "payload is not marked ';base64'".to_string(),
            ));
        }
        check_base64_payload(payload)?;

        let mime_type_end = "data:".len() + mime_type.len();
        let payload_start = input.len() - payload.len();

        Ok(Self {
            raw: input.to_string(),
            mime_type_end,
            payload_start,
        })
    }

    /// Encodes raw image bytes, sniffing the media type from the content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::MissingImage);
        }

        let mime_type = detect_image_mime(bytes);
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);

        Ok(Self {
            mime_type_end: "data:".len() + mime_type.len(),
            payload_start: "data:".len() + mime_type.len() + ";base64,".len(),
            raw: format!("data:{};base64,{}", mime_type, payload),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn mime_type(&self) -> &str {
        &self.raw["data:".len()..self.mime_type_end]
    }

    pub fn payload(&self) -> &str {
        &self.raw[self.payload_start..]
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let compact: String = self
            .payload()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| Error::InvalidDataUri(format!("payload is not base64: {}", e)))
    }
}

impl FromStr for DataUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_media_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !subtype.is_empty()
                && !subtype.contains('/')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Checks the payload's alphabet and padding without decoding it.
fn check_base64_payload(payload: &str) -> Result<()> {
    let mut length = 0usize;
    let mut padding = 0usize;

    for byte in payload.bytes().filter(|b| !b.is_ascii_whitespace()) {
        match byte {
            b'=' => padding += 1,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' if padding == 0 => {}
            _ => {
                return Err(Error::InvalidDataUri(format!(
                    "payload is not base64: unexpected byte 0x{:02x} at symbol {}",
                    byte, length
                )))
            }
        }
        length += 1;
    }

    if length == 0 {
        return Err(Error::InvalidDataUri("empty payload".to_string()));
    }
    if padding > 2 || length % 4 != 0 {
        return Err(Error::InvalidDataUri(format!(
            "payload is not base64: {} symbols with {} padding",
            length, padding
        )));
    }
    Ok(())
}
