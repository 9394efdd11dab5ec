//! AES-CBC codec with PKCS7 padding.

use aes::{Aes128, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{DescrambleError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt `plaintext` with AES-CBC/PKCS7. Key length selects AES-128 or
/// AES-256.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != 16 {
        return Err(DescrambleError::InvalidIvLength(iv.len()));
    }
    match key.len() {
        16 => {
            let cipher = Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(|_| DescrambleError::InvalidKeyLength(key.len()))?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
        32 => {
            let cipher = Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(|_| DescrambleError::InvalidKeyLength(key.len()))?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
        other => Err(DescrambleError::InvalidKeyLength(other)),
    }
}

/// Decrypt AES-CBC/PKCS7 `ciphertext`.
///
/// # Errors
///
/// Returns [`DescrambleError::DecryptionFailed`] when the padding is
/// structurally invalid after decryption. That is the primary signal that
/// the key/IV derived upstream was wrong (stale index table, bad
/// passphrase), so it must surface instead of returning garbage bytes.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != 16 {
        return Err(DescrambleError::InvalidIvLength(iv.len()));
    }
    let unpadded = match key.len() {
        16 => {
            let cipher = Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| DescrambleError::InvalidKeyLength(key.len()))?;
            cipher.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        }
        32 => {
            let cipher = Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| DescrambleError::InvalidKeyLength(key.len()))?;
            cipher.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        }
        other => return Err(DescrambleError::InvalidKeyLength(other)),
    };
    unpadded.map_err(|_| DescrambleError::DecryptionFailed)
}
