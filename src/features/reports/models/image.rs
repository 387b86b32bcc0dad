use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Serialize, Serializer};

use crate::shared::constants::{DATA_URI_BASE64_MARKER, DEFAULT_IMAGE_EXTENSION, NO_IMAGE};

/// Standard alphabet, padding optional
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Image attached to a report submission, still in its encoded form
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// Base64 content, optionally prefixed with `data:<type>;base64,`
    pub encoded: String,
    /// Declared MIME type (e.g. `image/png`)
    pub media_type: String,
}

impl ImageAttachment {
    pub fn new(encoded: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
            media_type: media_type.into(),
        }
    }

    /// Encoded payload with any data-URI prefix removed
    pub fn payload(&self) -> &str {
        match self.encoded.find(DATA_URI_BASE64_MARKER) {
            Some(idx) => &self.encoded[idx + DATA_URI_BASE64_MARKER.len()..],
            None => &self.encoded,
        }
    }

    /// Decode the payload into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let compact: String = self
            .payload()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        LENIENT_BASE64.decode(compact)
    }

    /// File extension derived from the media type's subtype
    ///
    /// `image/png` gives `png`, `image/svg+xml` gives `svg`. Anything without a
    /// usable subtype falls back to a generic extension.
    pub fn extension(&self) -> String {
        let subtype = self
            .media_type
            .split(';')
            .next()
            .and_then(|essence| essence.split_once('/'))
            .map(|(_, subtype)| subtype.split('+').next().unwrap_or_default())
            .unwrap_or_default();

        let extension: String = subtype
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if extension.is_empty() {
            DEFAULT_IMAGE_EXTENSION.to_string()
        } else {
            extension
        }
    }
}

/// Image reference stamped onto a stored report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// No image came with the report
    NotProvided,
    /// Public URL of the stored image
    Stored(String),
    /// The image could not be stored; the report was kept anyway
    UploadFailed(String),
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::NotProvided => f.write_str(NO_IMAGE),
            ImageReference::Stored(url) => f.write_str(url),
            ImageReference::UploadFailed(reason) => write!(f, "Image upload failed: {}", reason),
        }
    }
}

impl Serialize for ImageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
