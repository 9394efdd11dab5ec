//! Detection and unpacking of "Dean Edwards Packer" encoded JavaScript.
//!
//! Hosting pages ship their player setup through
//! `eval(function(p,a,c,k,e,d){...})` blobs that replace repeated
//! identifiers with short base-N tokens plus a pipe-delimited symbol table.
//! This module finds those blobs and restores the plain source.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::{DescrambleError, Result};
use crate::unbaser::Unbaser;

static PACKED_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"eval[ ]*\([ ]*function[ ]*\([ ]*p[ ]*,[ ]*a[ ]*,[ ]*c[ ]*,[ ]*k[ ]*,[ ]*e[ ]*,[ ]*[rd]?",
    )
    .case_insensitive(true)
    .build()
    .unwrap()
});

/// The two historical call-site shapes: with and without the trailing
/// `, 0, {})` parameters.
static JUICERS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        RegexBuilder::new(
            r"}\('(.*)', *(\d+|\[\]), *(\d+), *'(.*)'\.split\('\|'\), *(\d+), *(.*)\)\)",
        )
        .dot_matches_new_line(true)
        .build()
        .unwrap(),
        RegexBuilder::new(r"}\('(.*)', *(\d+|\[\]), *(\d+), *'(.*)'\.split\('\|'\)")
            .dot_matches_new_line(true)
            .build()
            .unwrap(),
    ]
});

/// Detect whether `source` contains packer-encoded JavaScript.
///
/// Intentionally permissive: any `eval(function(p,a,c,k,e,` prefix
/// (optionally followed by the `r`/`d` variant parameter, any case) counts.
/// [`unpack_all`] is responsible for rejecting malformed matches.
///
/// ```
/// assert!(descramble::detect("eval(function(p,a,c,k,e,r){...}"));
/// assert!(!descramble::detect("var x = 1;"));
/// ```
pub fn detect(source: &str) -> bool {
    PACKED_RE.is_match(source)
}

/// Unpack every packed block in `source`, one plain string per block.
///
/// A page may embed more than one packed script; blocks whose call-site
/// arguments are inconsistent (symbol count mismatch, unparseable count) are
/// skipped, the rest are still processed. No packed block at all yields an
/// empty vector, which is a success state, not an error.
pub fn unpack_all(source: &str) -> Vec<String> {
    let starts: Vec<usize> = PACKED_RE.find_iter(source).map(|m| m.start()).collect();

    let mut blocks = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(source.len());
        match unpack_block(&source[start..end]) {
            Ok(text) => blocks.push(text),
            Err(err) => tracing::warn!("skipping packed block at offset {start}: {err}"),
        }
    }
    blocks
}

/// Unpack all blocks and join them with a single space.
///
/// Returns `None` when no block could be unpacked.
///
/// ```
/// let packed = "eval(function(p,a,c,k,e,d){}('0 1',2,2,'hello|world'.split('|')))";
/// assert_eq!(descramble::unpack_combined(packed).unwrap(), "hello world");
/// ```
pub fn unpack_combined(source: &str) -> Option<String> {
    let blocks = unpack_all(source);
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join(" "))
    }
}

fn unpack_block(block: &str) -> Result<String> {
    let (payload, symtab, radix, count) = filter_args(block)?;

    if symtab.len() != count {
        return Err(DescrambleError::UnparseableScript(format!(
            "symbol table has {} entries, call site claims {count}",
            symtab.len()
        )));
    }

    let unbaser = Unbaser::new(radix)?;
    let cleaned = payload.replace("\\\\", "\\").replace("\\'", "'");
    tracing::debug!(radix, count, "unpacking block of {} bytes", cleaned.len());

    Ok(substitute(&cleaned, &symtab, &unbaser))
}

/// Extract `(payload, symtab, radix, count)` from the trailing call site.
fn filter_args(block: &str) -> Result<(&str, Vec<&str>, u32, usize)> {
    for juicer in JUICERS.iter() {
        let Some(caps) = juicer.captures(block) else {
            continue;
        };
        let payload = caps.get(1).map_or("", |m| m.as_str());

        // `[]` forces `a.toString(a)` down JS string-coercion paths that
        // behave like radix 62; plain numbers that fail to parse fall back
        // to decimal.
        let radix = match caps.get(2).map_or("", |m| m.as_str()) {
            "[]" => 62,
            s => s.parse().unwrap_or(10),
        };

        let count: usize = caps
            .get(3)
            .map_or("", |m| m.as_str())
            .parse()
            .map_err(|_| DescrambleError::UnparseableScript("symbol count not numeric".into()))?;

        let symtab: Vec<&str> = caps.get(4).map_or("", |m| m.as_str()).split('|').collect();

        return Ok((payload, symtab, radix, count));
    }

    Err(DescrambleError::UnparseableScript(
        "no recognizable call site".into(),
    ))
}

/// Replace word tokens in the payload with their symbol-table entries.
///
/// An explicit scanner rather than a `\b\w+\b` regex pass, so adversarial
/// payloads cannot trigger pathological backtracking. A token is replaced
/// only when it decodes to an in-range index with a non-empty symbol; the
/// packer leaves literal numbers and unabbreviated identifiers alone, so we
/// must too.
fn substitute(payload: &str, symtab: &[&str], unbaser: &Unbaser) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut word = String::new();

    for ch in payload.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            word.push(ch);
        } else {
            flush_word(&mut out, &mut word, symtab, unbaser);
            out.push(ch);
        }
    }
    flush_word(&mut out, &mut word, symtab, unbaser);

    out
}

fn flush_word(out: &mut String, word: &mut String, symtab: &[&str], unbaser: &Unbaser) {
    if word.is_empty() {
        return;
    }
    match unbaser.unbase(word) {
        Ok(index) if index < symtab.len() && !symtab[index].is_empty() => {
            out.push_str(symtab[index]);
        }
        _ => out.push_str(word),
    }
    word.clear();
}
