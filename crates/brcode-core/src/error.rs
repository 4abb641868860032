//! Error types for the payment-code generator.
//!
//! Every fallible operation in this crate returns [`BrCodeError`]. Contract
//! violations (an over-long field after truncation) and caller errors (a zero
//! amount, a payload too large for any symbol) share one enum so the facade
//! can surface them uniformly; the generator never returns a partial payload.

use crate::qr::EcLevel;

/// Primary error type for payload assembly, decoding and symbol encoding.
#[derive(Debug, thiserror::Error)]
pub enum BrCodeError {
    /// A field value does not fit the two-digit length prefix.
    #[error("field {tag} value is {len} bytes long (maximum {max})")]
    FieldTooLong {
        /// Tag of the offending field.
        tag: String,
        /// Byte length of the value.
        len: usize,
        /// Largest encodable length.
        max: usize,
    },

    /// A field tag is not exactly two ASCII digits.
    #[error("invalid field tag {0:?}: expected two ASCII digits")]
    InvalidTag(String),

    /// The amount is zero, negative, non-finite or too large to encode.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The payee key is empty, too long or not ASCII.
    #[error("invalid payee key: {0}")]
    InvalidPayeeKey(String),

    /// A textual field cannot be represented in the payload.
    #[error("invalid {field}: {reason}")]
    InvalidText {
        /// Name of the request field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// The text does not fit the largest symbol at the requested level.
    #[error("payload needs {bits} data bits, more than any symbol holds at level {level}")]
    PayloadTooLarge {
        /// Encoded bit length of the input (mode + count + data).
        bits: usize,
        /// Minimum error-correction level that was requested.
        level: EcLevel,
    },

    /// A payload could not be walked as a TLV structure.
    #[error("malformed payload at offset {offset}: {reason}")]
    Malformed {
        /// Byte offset where parsing stopped.
        offset: usize,
        /// Human-readable explanation.
        reason: String,
    },

    /// The trailing CRC does not match the payload contents.
    #[error("checksum mismatch: payload carries {found}, computed {expected}")]
    ChecksumMismatch {
        /// CRC computed over the payload prefix.
        expected: String,
        /// CRC found at the end of the payload.
        found: String,
    },

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or request document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BrCodeError>;
