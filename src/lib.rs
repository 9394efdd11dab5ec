//! # descramble
//!
//! Recovery engine for the two obfuscation layers that video hosting pages
//! put between a scraper and their playable source list:
//!
//! - **Packed JavaScript**: "Dean Edwards Packer" output
//!   (`eval(function(p,a,c,k,e,d){...})`) is detected and unpacked back to
//!   plain JS/JSON without executing anything.
//! - **Jumbled ciphertext**: an AES passphrase interleaved into base64
//!   ciphertext at positions published as a remote index table is extracted,
//!   stretched into key material (OpenSSL `EVP_BytesToKey`, MD5), and the
//!   remainder AES-CBC decrypted into the real sources JSON.
//!
//! Everything here is a pure, synchronous function over its inputs: no HTTP,
//! no DOM, no shared state. The surrounding scraper fetches pages and index
//! tables and consumes the recovered strings; many recoveries can run
//! concurrently without coordination.
//!
//! ## Unpacking
//!
//! ```
//! let page = "eval(function(p,a,c,k,e,d){}('0 1',2,2,'hello|world'.split('|')))";
//!
//! assert!(descramble::detect(page));
//! assert_eq!(descramble::unpack_combined(page).unwrap(), "hello world");
//! ```
//!
//! ## Recovering jumbled sources
//!
//! ```
//! use descramble::{keyindex, KeyIndexEntry};
//!
//! let table = vec![KeyIndexEntry { start: 3, len: 6 }];
//! let (passphrase, residual) = keyindex::extract("ABCsecretXYZ", &table).unwrap();
//! assert_eq!(passphrase, "secret");
//! assert_eq!(residual, "ABCXYZ");
//! ```
//!
//! For the full pipeline, [`recover_sources`] takes a [`DecryptionScheme`],
//! either `RemoteIndexed` (index table + salted blob, MegaCloud/RapidCloud
//! style) or `Fixed` (pre-agreed key and IV, GogoCDN style), and returns the
//! decrypted JSON, which [`parse_sources`] turns into typed entries.

pub mod crypto;
pub mod error;
pub mod keyindex;
pub mod models;
pub mod packer;
pub mod unbaser;

// Re-exports for convenience
pub use crypto::{bytes_to_key, decrypt, encrypt, recover_sources, DecryptionScheme, DerivedKey};
pub use error::{DescrambleError, Result};
pub use models::{parse_sources, KeyIndexEntry, KeyIndexTable, KeySize, SourceEntry};
pub use packer::{detect, unpack_all, unpack_combined};
pub use unbaser::Unbaser;
