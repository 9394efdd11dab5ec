//! Passphrase extraction from jumbled sources strings.
//!
//! Some hosts interleave the AES passphrase into the base64 ciphertext they
//! serve, at positions published separately as an index table. Walking the
//! table recovers the passphrase and leaves the ciphertext behind.

use crate::error::{DescrambleError, Result};
use crate::models::KeyIndexEntry;

/// Pull the embedded passphrase out of `jumbled`, returning
/// `(passphrase, residual_ciphertext)`.
///
/// Each table entry's `start` is relative to the payload as already shrunk
/// by the previous extractions, so a running offset (the total length pulled
/// so far) is added before indexing. Using raw absolute offsets would
/// silently corrupt every entry after the first.
///
/// An empty table is the fixed-key degenerate case: nothing is extracted and
/// the payload passes through untouched.
///
/// # Errors
///
/// Returns [`DescrambleError::ExtractionFailed`] when an entry's range falls
/// outside the payload, which indicates a stale or mismatched remote table.
pub fn extract(jumbled: &str, table: &[KeyIndexEntry]) -> Result<(String, String)> {
    if table.is_empty() {
        return Ok((String::new(), jumbled.to_string()));
    }

    let mut buf: Vec<char> = jumbled.chars().collect();
    let mut passphrase = String::new();
    let mut offset = 0usize;

    for entry in table {
        // remote tables are untrusted; a huge start/length must not wrap
        let range = entry
            .start
            .checked_add(offset)
            .and_then(|start| start.checked_add(entry.len).map(|end| start..end))
            .filter(|range| range.end <= buf.len())
            .ok_or_else(|| {
                DescrambleError::ExtractionFailed(format!(
                    "table entry {}+{} out of range, payload is {} chars",
                    entry.start,
                    entry.len,
                    buf.len()
                ))
            })?;

        for slot in &mut buf[range] {
            passphrase.push(*slot);
            *slot = '\0';
        }
        offset = offset.checked_add(entry.len).ok_or_else(|| {
            DescrambleError::ExtractionFailed("cumulative offset overflow".into())
        })?;
    }

    let residual: String = buf.into_iter().filter(|&ch| ch != '\0').collect();
    tracing::debug!(
        passphrase_len = passphrase.len(),
        residual_len = residual.len(),
        "extracted embedded passphrase"
    );

    Ok((passphrase, residual.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(usize, usize)]) -> Vec<KeyIndexEntry> {
        entries.iter().map(|&(start, len)| (start, len).into()).collect()
    }

    #[test]
    fn test_single_entry() {
        let (passphrase, residual) = extract("ABCsecretXYZ", &table(&[(3, 6)])).unwrap();
        assert_eq!(passphrase, "secret");
        assert_eq!(residual, "ABCXYZ");
    }

    #[test]
    fn test_empty_table_passes_through() {
        let (passphrase, residual) = extract("  anything at all  ", &[]).unwrap();
        assert_eq!(passphrase, "");
        assert_eq!(residual, "  anything at all  ");
    }

    #[test]
    fn test_offsets_are_relative_to_shrunk_payload() {
        // second entry's start counts from the string with "abc" removed
        let (passphrase, residual) = extract("abcXYdefZW", &table(&[(0, 3), (2, 3)])).unwrap();
        assert_eq!(passphrase, "abcdef");
        assert_eq!(residual, "XYZW");
    }

    #[test]
    fn test_out_of_range_entry_is_hard_error() {
        let err = extract("short", &table(&[(3, 6)])).unwrap_err();
        assert!(matches!(err, DescrambleError::ExtractionFailed(_)));

        let err = extract("ABCXYZ", &table(&[(0, 3), (4, 1)])).unwrap_err();
        assert!(matches!(err, DescrambleError::ExtractionFailed(_)));
    }

    #[test]
    fn test_overflowing_entry_is_hard_error() {
        // a hostile table must not wrap around the index arithmetic
        let err = extract("ABCXYZ", &table(&[(usize::MAX, 1)])).unwrap_err();
        assert!(matches!(err, DescrambleError::ExtractionFailed(_)));

        let err = extract("ABCXYZ", &table(&[(1, usize::MAX)])).unwrap_err();
        assert!(matches!(err, DescrambleError::ExtractionFailed(_)));

        let err = extract("ABCXYZ", &table(&[(0, usize::MAX), (0, 2)])).unwrap_err();
        assert!(matches!(err, DescrambleError::ExtractionFailed(_)));
    }

    // Captured from a live megacloud response and its published index table.
    #[test]
    fn test_megacloud_vector() {
        const TABLE: &[(usize, usize)] = &[
            (54, 6),
            (85, 6),
            (100, 6),
            (101, 6),
            (106, 7),
            (134, 7),
            (156, 6),
        ];
        const JUMBLED: &str = "U2FsdGVkX19A5ALyV8svWKkUjszjAf9X0H8EtnLgE++xbOtdodmq0udf4XgJottZ+S8yCPC/xggYMwx03zsQpp29M2Z5TKDwYhe5MM46qZlwLvzjrM25gG9uAz1kNSdrkzMmgaQOkwpQkF5ZeLKq564aV6ahlqv5Hx/yG4yZZniYu1IJdXCR5DZ9x3KT/qvvWWGlRS8kzJGLBnjHJj0f2NzptDHnYy/oDgKWRbCgjsap8eM8/Rk096AXDIoSMKrATsxZrvf4MiTOF6CzPRZQffLn1/KDVLN1PsTkr1BgifI8hmyA+UqSBgH7iFD8ds8OZMLyjqTYrOuTf8NRiY/CYRlPgX2ANC2vPDvXA6gMY1QlRuLJ8aCxFCggNSOrfG/chaLhOCFrd0+VxXqDfUWcxwQec5LtYHKP067N5F4siCLmjh3bs6TS1+x7ZFokFTQylZ0yHvTMD56Ldu0J1TSEOYV73hipy/U74PSrnMAQ8j6r4jdGE1Y53QHNwzwrQGTfUg==";
        const PASSPHRASE: &str = "df4XgJ5TKDwYrM25gGuAz1kNMmgaQOk4yZZniYGlRS8k";
        const RESIDUAL: &str = "U2FsdGVkX19A5ALyV8svWKkUjszjAf9X0H8EtnLgE++xbOtdodmq0uottZ+S8yCPC/xggYMwx03zsQpp29M2Zhe5MM46qZlwLvzj9SdrkzwpQkF5ZeLKq564aV6ahlqv5Hx/yGu1IJdXCR5DZ9x3KT/qvvWWzJGLBnjHJj0f2NzptDHnYy/oDgKWRbCgjsap8eM8/Rk096AXDIoSMKrATsxZrvf4MiTOF6CzPRZQffLn1/KDVLN1PsTkr1BgifI8hmyA+UqSBgH7iFD8ds8OZMLyjqTYrOuTf8NRiY/CYRlPgX2ANC2vPDvXA6gMY1QlRuLJ8aCxFCggNSOrfG/chaLhOCFrd0+VxXqDfUWcxwQec5LtYHKP067N5F4siCLmjh3bs6TS1+x7ZFokFTQylZ0yHvTMD56Ldu0J1TSEOYV73hipy/U74PSrnMAQ8j6r4jdGE1Y53QHNwzwrQGTfUg==";

        let (passphrase, residual) = extract(JUMBLED, &table(TABLE)).unwrap();
        assert_eq!(passphrase, PASSPHRASE);
        assert_eq!(residual, RESIDUAL);
    }
}
