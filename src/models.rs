//! Data models shared across the recovery pipeline.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// AES key size for the CBC codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// AES-128 (16-byte key)
    Aes128,
    /// AES-256 (32-byte key)
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes256 => 32,
        }
    }
}

/// One entry of a remote key-index table.
///
/// Sites publish these as JSON pairs `[[start, length], ...]`; the order of
/// entries is significant, since each `start` is expressed relative to the
/// payload as already shrunk by the previous extractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(usize, usize)")]
pub struct KeyIndexEntry {
    pub start: usize,
    pub len: usize,
}

impl From<(usize, usize)> for KeyIndexEntry {
    fn from((start, len): (usize, usize)) -> Self {
        Self { start, len }
    }
}

/// Ordered key-index table, as fetched from a site-maintained URL.
pub type KeyIndexTable = Vec<KeyIndexEntry>;

/// One playable source from the decrypted JSON.
///
/// Sites disagree on whether the quality string is called `type` or `label`,
/// so both are carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub file: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Parse the recovered JSON into a list of playable sources.
pub fn parse_sources(json: &str) -> Result<Vec<SourceEntry>> {
    Ok(serde_json::from_str(json)?)
}
