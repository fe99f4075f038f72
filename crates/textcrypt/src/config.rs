//! Service options and their loading/validation from the environment or a file.
//!
//! Variables use the `TEXTCRYPT` prefix and `__` as the nesting separator:
//!
//! | Variable                          | Field                       |
//! |-----------------------------------|-----------------------------|
//! | `TEXTCRYPT__AES__KEY`             | [`AesEncryptionOptions::key`] |
//! | `TEXTCRYPT__AES__IV`              | [`AesEncryptionOptions::iv`]  |
//! | `TEXTCRYPT__DERIVED__PASSPHRASE`  | [`AesDerivedKeyOptions::passphrase`] |
//!
//! Services themselves take their options by value and never read the
//! environment.

use std::path::Path;

use anyhow::{Context, Result};
use common::EncryptionSecrets;
use serde::Deserialize;
use tracing::info;

use crate::crypto::KeyMaterial;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TEXTCRYPT";

/// Options for [`crate::AesEncryptionService`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AesEncryptionOptions {
    /// Base64 encoded AES key (16, 24 or 32 bytes once decoded).
    #[serde(default)]
    pub key: String,

    /// Base64 encoded CBC initialization vector (16 bytes once decoded).
    #[serde(default)]
    pub iv: String,
}

impl std::fmt::Debug for AesEncryptionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesEncryptionOptions")
            .field("key", &redacted(&self.key))
            .field("iv", &redacted(&self.iv))
            .finish()
    }
}

impl From<EncryptionSecrets> for AesEncryptionOptions {
    fn from(secrets: EncryptionSecrets) -> Self {
        Self {
            key: secrets.key,
            iv: secrets.iv,
        }
    }
}

/// Options for [`crate::AesDerivedKeyEncryptionService`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AesDerivedKeyOptions {
    /// Default passphrase for key derivation.
    #[serde(default)]
    pub passphrase: String,
}

impl std::fmt::Debug for AesDerivedKeyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesDerivedKeyOptions")
            .field("passphrase", &redacted(&self.passphrase))
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "[REDACTED]"
    }
}

/// Validated settings for both services. Either section may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Fixed-key service options (`TEXTCRYPT__AES__*`).
    #[serde(default)]
    pub aes: Option<AesEncryptionOptions>,

    /// Derived-key service options (`TEXTCRYPT__DERIVED__*`).
    #[serde(default)]
    pub derived: Option<AesDerivedKeyOptions>,
}

impl Settings {
    /// Load and validate settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present section has an empty or malformed value.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Config::builder().add_source(environment()))
    }

    /// Load settings from a TOML or JSON file, with environment variables
    /// taking precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a present
    /// section has an empty or malformed value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::load(
            config::Config::builder()
                .add_source(config::File::from(path))
                .add_source(environment()),
        )
        .with_context(|| format!("failed to load settings from {}", path.display()))
    }

    fn load(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build encryption settings")?;

        let settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise encryption settings")?;

        settings.validate()?;
        info!(
            aes = settings.aes.is_some(),
            derived = settings.derived.is_some(),
            "encryption settings loaded"
        );
        Ok(settings)
    }

    /// Validate every present section, returning a descriptive error on the
    /// first failure.
    fn validate(&self) -> Result<()> {
        if let Some(aes) = &self.aes {
            ensure_non_empty(&aes.key, "TEXTCRYPT__AES__KEY")?;
            ensure_non_empty(&aes.iv, "TEXTCRYPT__AES__IV")?;
            KeyMaterial::from_base64(&aes.key, &aes.iv)
                .context("TEXTCRYPT__AES__KEY / TEXTCRYPT__AES__IV are not a usable AES key and IV")?;
        }
        if let Some(derived) = &self.derived {
            ensure_non_empty(&derived.passphrase, "TEXTCRYPT__DERIVED__PASSPHRASE")?;
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
