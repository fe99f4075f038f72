//! `textcrypt`: AES-CBC encryption of text values.
//!
//! Two stateless services, constructed directly from their options:
//!
//! ```no_run
//! use textcrypt::{AesEncryptionOptions, AesEncryptionService};
//!
//! let secrets = textcrypt::generate_secrets();
//! let service = AesEncryptionService::new(AesEncryptionOptions::from(secrets));
//! let encrypted = service.encrypt("123-45-6789")?;
//! assert_eq!(service.decrypt(&encrypted)?, "123-45-6789");
//! # Ok::<(), textcrypt::CipherError>(())
//! ```
//!
//! Options can also be loaded from the environment with [`Settings::from_env`].
//!
//! # Security notes
//!
//! - CBC without authentication: ciphertext integrity is not protected.
//! - The IV is fixed per configuration (or per passphrase/salt pair), so equal
//!   plaintexts produce equal ciphertexts.
//! - No key or passphrase is ever logged; `Debug` output is redacted.

pub mod config;
pub mod crypto;

pub use common::{CipherError, EncryptionSecrets, ErrorKind};
pub use config::{AesDerivedKeyOptions, AesEncryptionOptions, Settings};
pub use crypto::{generate_secrets, AesDerivedKeyEncryptionService, AesEncryptionService};
