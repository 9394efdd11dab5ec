//! Base-N token decoding for packed-script symbol indices.

use std::collections::HashMap;

use crate::error::{DescrambleError, Result};

const ALPHA_62: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHA_95: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Decoder for one radix. Converts packed tokens back to symbol-table indices.
///
/// Radices 2..=36 parse as conventional positional numbers
/// (case-insensitive). Above 36 the packer switches to custom alphabets,
/// selected by threshold: 95-char printable ASCII above 62, the 62-char
/// alphanumeric set above 54, and its 54- and 52-char prefixes below that.
#[derive(Debug)]
pub struct Unbaser {
    radix: u32,
    /// Character-to-value mapping for radices above 36. None for native radices.
    dictionary: Option<HashMap<char, usize>>,
}

impl Unbaser {
    /// Create a decoder for `radix`.
    ///
    /// # Errors
    ///
    /// Returns [`DescrambleError::UnsupportedRadix`] outside 2..=95.
    pub fn new(radix: u32) -> Result<Self> {
        let dictionary = match radix {
            2..=36 => None,
            37..=52 => Some(Self::build_dict(&ALPHA_62[..52])),
            53..=54 => Some(Self::build_dict(&ALPHA_62[..54])),
            55..=62 => Some(Self::build_dict(ALPHA_62)),
            63..=95 => Some(Self::build_dict(ALPHA_95)),
            _ => return Err(DescrambleError::UnsupportedRadix(radix)),
        };

        Ok(Self { radix, dictionary })
    }

    fn build_dict(alphabet: &str) -> HashMap<char, usize> {
        alphabet.chars().enumerate().map(|(i, c)| (c, i)).collect()
    }

    /// Decode `token` into a symbol-table index.
    ///
    /// For custom-alphabet radices, characters missing from the alphabet
    /// decode as value 0. That leniency is inherited from the packer
    /// ecosystem and some packed scripts round-trip through it, so it is
    /// kept rather than reported as an error.
    ///
    /// # Errors
    ///
    /// Returns [`DescrambleError::InvalidDigit`] if the token is not a valid
    /// number in a native radix, or is too long to fit in a `usize`.
    pub fn unbase(&self, token: &str) -> Result<usize> {
        match &self.dictionary {
            None => usize::from_str_radix(token, self.radix).map_err(|_| {
                DescrambleError::InvalidDigit {
                    token: token.to_string(),
                    radix: self.radix,
                }
            }),
            Some(dict) => self.unbase_with_dict(token, dict),
        }
    }

    fn unbase_with_dict(&self, token: &str, dict: &HashMap<char, usize>) -> Result<usize> {
        let overflow = || DescrambleError::InvalidDigit {
            token: token.to_string(),
            radix: self.radix,
        };

        let mut value: usize = 0;
        for (i, ch) in token.chars().rev().enumerate() {
            let digit = dict.get(&ch).copied().unwrap_or(0);
            let place = (self.radix as usize)
                .checked_pow(i as u32)
                .ok_or_else(overflow)?;
            value = digit
                .checked_mul(place)
                .and_then(|v| value.checked_add(v))
                .ok_or_else(overflow)?;
        }
        Ok(value)
    }
}
