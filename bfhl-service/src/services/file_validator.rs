//! Validation of the optional base64 attachment.
//!
//! The payload is decoded, its type is sniffed from the leading bytes and
//! checked against [`ALLOWED_MIME_TYPES`]. Failures never reach the caller:
//! they collapse into [`FileVerdict::Invalid`].

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "image/png",
    "image/jpeg",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/zip",
];

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to decode base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// What sniffing learned about a decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedFile {
    pub mime_type: Option<&'static str>,
    pub size_bytes: usize,
}

impl SniffedFile {
    /// Size in KiB, rounded half up.
    pub fn size_kb(&self) -> u64 {
        (self.size_bytes as f64 / 1024.0).round() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    Valid { mime_type: String, size_kb: u64 },
    Invalid,
}

impl FileVerdict {
    /// Decodes, sniffs and checks `encoded` against the allow-list.
    pub fn evaluate(encoded: &str) -> Self {
        match sniff(encoded) {
            Ok(file) => Self::from_sniffed(&file),
            Err(e) => {
                tracing::warn!(error = %e, "Error processing file");
                FileVerdict::Invalid
            }
        }
    }

    fn from_sniffed(file: &SniffedFile) -> Self {
        match file.mime_type {
            Some(mime) if ALLOWED_MIME_TYPES.contains(&mime) => FileVerdict::Valid {
                mime_type: mime.to_string(),
                size_kb: file.size_kb(),
            },
            Some(mime) => {
                tracing::info!(mime_type = %mime, "Rejecting file with disallowed type");
                FileVerdict::Invalid
            }
            None => {
                tracing::info!(size_bytes = file.size_bytes, "Rejecting file of unknown type");
                FileVerdict::Invalid
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FileVerdict::Valid { .. })
    }
}

/// True iff `s` is non-empty and drawn from `A-Z a-z 0-9 + / =`.
///
/// Purely syntactic: padding placement is not checked.
pub fn is_base64(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Decodes everything before the first `=` and sniffs the result.
pub fn sniff(encoded: &str) -> Result<SniffedFile, FileError> {
    let payload = encoded.split_once('=').map_or(encoded, |(head, _)| head);
    let bytes = LENIENT.decode(whole_bytes(payload))?;

    Ok(SniffedFile {
        mime_type: infer::get(&bytes).map(|kind| kind.mime_type()),
        size_bytes: bytes.len(),
    })
}

/// Drops a dangling final char: alone it carries fewer than 8 bits.
fn whole_bytes(payload: &str) -> &str {
    if payload.len() % 4 == 1 {
        payload.get(..payload.len() - 1).unwrap_or(payload)
    } else {
        payload
    }
}
