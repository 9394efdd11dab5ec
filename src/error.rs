//! Error types for the descramble library.

use thiserror::Error;

/// Main error type for the descramble library.
#[derive(Error, Debug)]
pub enum DescrambleError {
    /// Token contains a character outside the radix alphabet, or does not
    /// fit in a machine word
    #[error("token {token:?} is not a valid base-{radix} number")]
    InvalidDigit { token: String, radix: u32 },

    /// Radix outside the 2..=95 range the packer ever emits
    #[error("unsupported radix: {0}")]
    UnsupportedRadix(u32),

    /// Packed-script call site found but its arguments are inconsistent
    #[error("unparseable packed script: {0}")]
    UnparseableScript(String),

    /// Key-index table points outside the jumbled payload
    #[error("key extraction failed: {0}")]
    ExtractionFailed(String),

    /// Ciphertext blob is structurally wrong (missing salt header, too short)
    #[error("malformed cipher payload: {0}")]
    MalformedCipher(String),

    /// Wrong key/IV, or corrupted ciphertext (invalid padding after decrypt)
    #[error("decryption failed: wrong key/IV or corrupt ciphertext")]
    DecryptionFailed,

    /// AES key must be 16 or 32 bytes
    #[error("unsupported key length: {0} bytes (expected 16 or 32)")]
    InvalidKeyLength(usize),

    /// CBC IV must be exactly one block
    #[error("invalid IV length: {0} bytes (expected 16)")]
    InvalidIvLength(usize),

    /// Base64 decoding error
    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decrypted payload is not text
    #[error("decrypted payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for descramble operations.
pub type Result<T> = std::result::Result<T, DescrambleError>;
