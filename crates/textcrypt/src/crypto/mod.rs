//! AES-CBC text encryption services.
//!
//! Two independent services share the block-level primitives in [`cipher`]:
//!
//! - [`AesEncryptionService`]: key and IV supplied as base64 strings, from
//!   configuration or per call. Text is UTF-8.
//! - [`AesDerivedKeyEncryptionService`]: key and IV derived from a passphrase
//!   and salt with PBKDF2. Text is UTF-16LE.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(AES-CBC(PKCS#7(text bytes)))
//! ```
//!
//! No IV or version prefix is embedded: the IV is part of the key material,
//! and reusing it for every message is what keeps previously stored values
//! decryptable.

pub mod cipher;
pub mod derived_key;
pub mod fixed_key;
pub mod key;
pub mod keygen;

pub use derived_key::AesDerivedKeyEncryptionService;
pub use fixed_key::AesEncryptionService;
pub use key::KeyMaterial;
pub use keygen::generate_secrets;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialization vector (one AES block).
pub const IV_LEN: usize = 16;
