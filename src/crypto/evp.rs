//! OpenSSL-style key derivation (`EVP_BytesToKey`, MD5, one iteration).

use md5::{Digest, Md5};

use crate::models::KeySize;

/// Key material derived for one decrypt call. Never persisted.
#[derive(Debug, Clone)]
pub struct DerivedKey {
    pub key: Vec<u8>,
    pub iv: [u8; 16],
}

/// Stretch a passphrase and salt into an AES key and CBC IV.
///
/// Chained MD5 blocks, `block_0 = MD5(pass || salt)` and
/// `block_{i+1} = MD5(block_i || pass || salt)`, concatenated until
/// `key_len + 16` bytes are available. MD5 yields 16 bytes per round, so the
/// loop is bounded by `ceil((key_len + 16) / 16)` rounds.
pub fn bytes_to_key(passphrase: &[u8], salt: &[u8], key_size: KeySize) -> DerivedKey {
    let key_len = key_size.byte_len();

    let mut material = Vec::with_capacity(key_len + 16);
    let mut block: Vec<u8> = Vec::new();
    while material.len() < key_len + 16 {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        material.extend_from_slice(&block);
    }

    let mut iv = [0u8; 16];
    iv.copy_from_slice(&material[key_len..key_len + 16]);

    DerivedKey {
        key: material[..key_len].to_vec(),
        iv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_lengths() {
        let derived = bytes_to_key(b"passphrase", b"\x01\x02\x03\x04\x05\x06\x07\x08", KeySize::Aes128);
        assert_eq!(derived.key.len(), 16);

        let derived = bytes_to_key(b"passphrase", b"\x01\x02\x03\x04\x05\x06\x07\x08", KeySize::Aes256);
        assert_eq!(derived.key.len(), 32);
    }

    #[test]
    fn test_deterministic() {
        let a = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes256);
        let b = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes256);
        assert_eq!(a.key, b.key);
        assert_eq!(a.iv, b.iv);
    }

    #[test]
    fn test_salt_sensitivity() {
        let a = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes256);
        let b = bytes_to_key(b"secret", b"saltsalA", KeySize::Aes256);
        assert_ne!(a.key, b.key);

        let c = bytes_to_key(b"secreT", b"saltsalt", KeySize::Aes256);
        assert_ne!(a.key, c.key);
    }

    #[test]
    fn test_first_block_is_md5_of_pass_and_salt() {
        let derived = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes256);

        let mut hasher = Md5::new();
        hasher.update(b"secret");
        hasher.update(b"saltsalt");
        let block0 = hasher.finalize();
        assert_eq!(&derived.key[..16], block0.as_slice());

        let mut hasher = Md5::new();
        hasher.update(block0);
        hasher.update(b"secret");
        hasher.update(b"saltsalt");
        let block1 = hasher.finalize();
        assert_eq!(&derived.key[16..32], block1.as_slice());
    }

    #[test]
    fn test_aes128_key_iv_split() {
        // 16 + 16 bytes needed: exactly two MD5 rounds, iv is the second block
        let derived = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes128);
        let full = bytes_to_key(b"secret", b"saltsalt", KeySize::Aes256);
        assert_eq!(derived.key[..], full.key[..16]);
        assert_eq!(derived.iv[..], full.key[16..32]);
    }
}
