//! [`AesEncryptionService`]: text encryption under a stored key and IV.
//!
//! Text is encoded as UTF-8 (no BOM) before encryption. Ciphertext is returned
//! as standard padded base64.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{error::require, CipherError, EncryptionSecrets};
use tracing::debug;

use super::cipher;
use super::key::{decode_base64, KeyMaterial};
use crate::config::AesEncryptionOptions;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encrypts and decrypts strings with AES-CBC using a configured (or
/// per-call) base64 key and IV.
///
/// Cheap to clone; safe to share between threads.
#[derive(Clone, Debug)]
pub struct AesEncryptionService {
    options: Arc<AesEncryptionOptions>,
}

impl AesEncryptionService {
    /// Create a service whose default key material is taken from `options`.
    ///
    /// The options are not validated here: empty values surface as
    /// [`CipherError::MissingArgument`] on the first call that needs them.
    pub fn new(options: AesEncryptionOptions) -> Self {
        debug!(
            has_key = !options.key.is_empty(),
            has_iv = !options.iv.is_empty(),
            "fixed-key encryption service created"
        );
        Self {
            options: Arc::new(options),
        }
    }

    /// Encrypt `plain_text` with the configured key and IV.
    ///
    /// # Errors
    ///
    /// See [`AesEncryptionService::encrypt_with_key`].
    pub fn encrypt(&self, plain_text: &str) -> Result<String, CipherError> {
        self.encrypt_with_key(plain_text, &self.options.key, &self.options.iv)
    }

    /// Encrypt `plain_text` with an explicit base64 `key` and `iv`.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MissingArgument`] naming `plain_text`, `key` or `iv`
    ///   (checked in that order) if one is empty.
    /// - [`CipherError::MalformedInput`] if `key` or `iv` is not base64 or has
    ///   the wrong decoded length.
    pub fn encrypt_with_key(
        &self,
        plain_text: &str,
        key: &str,
        iv: &str,
    ) -> Result<String, CipherError> {
        require(plain_text, "plain_text")?;
        require(key, "key")?;
        require(iv, "iv")?;

        let material = KeyMaterial::from_base64(key, iv)?;
        let encrypted = cipher::encrypt(&material, plain_text.as_bytes())?;
        Ok(STANDARD.encode(encrypted))
    }

    /// Decrypt base64 `cipher_text` with the configured key and IV.
    ///
    /// # Errors
    ///
    /// See [`AesEncryptionService::decrypt_with_key`].
    pub fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError> {
        self.decrypt_with_key(cipher_text, &self.options.key, &self.options.iv)
    }

    /// Decrypt base64 `cipher_text` with an explicit base64 `key` and `iv`.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MissingArgument`] naming `cipher_text`, `key` or `iv`.
    /// - [`CipherError::MalformedInput`] if any input is not valid base64, or
    ///   `key`/`iv` has the wrong decoded length.
    /// - [`CipherError::DecryptionFailure`] if the cipher rejects the data or
    ///   the result is not UTF-8.
    pub fn decrypt_with_key(
        &self,
        cipher_text: &str,
        key: &str,
        iv: &str,
    ) -> Result<String, CipherError> {
        require(cipher_text, "cipher_text")?;
        require(key, "key")?;
        require(iv, "iv")?;

        let material = KeyMaterial::from_base64(key, iv)?;
        let encrypted = decode_base64(cipher_text, "cipher_text")?;
        let decrypted = cipher::decrypt(&material, &encrypted)?;

        let text = decrypted.strip_prefix(UTF8_BOM).unwrap_or(&decrypted);
        String::from_utf8(text.to_vec()).map_err(|_| CipherError::DecryptionFailure)
    }

    /// Generate a fresh random key and IV suitable for [`AesEncryptionOptions`].
    pub fn generate_secrets() -> EncryptionSecrets {
        super::keygen::generate_secrets()
    }
}
