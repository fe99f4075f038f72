//! Common error types shared across crates.

use thiserror::Error;

/// Error type returned by every encrypt/decrypt operation.
///
/// Variants are distinguishable by [`ErrorKind`]:
/// - [`CipherError::MissingArgument`] → [`ErrorKind::MissingArgument`]
/// - [`CipherError::MalformedInput`] → [`ErrorKind::MalformedInput`]
/// - [`CipherError::DecryptionFailure`] → [`ErrorKind::DecryptionFailure`]
#[derive(Debug, Error)]
pub enum CipherError {
    /// A required input was empty after resolving configured defaults.
    ///
    /// Raised before any decoding or cryptographic work.
    #[error("value cannot be null or empty (parameter '{0}')")]
    MissingArgument(&'static str),

    /// Key, IV, salt or ciphertext could not be decoded, or has the wrong length.
    #[error("malformed {param}: {reason}")]
    MalformedInput {
        /// Name of the offending parameter.
        param: &'static str,
        /// Human-readable description; never contains secret material.
        reason: String,
    },

    /// The cipher rejected the ciphertext (wrong key, corrupted data, bad padding)
    /// or the decrypted bytes are not valid text.
    #[error("decryption failed")]
    DecryptionFailure,
}

/// Coarse classification of a [`CipherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingArgument,
    MalformedInput,
    DecryptionFailure,
}

impl CipherError {
    /// Shorthand for [`CipherError::MalformedInput`].
    pub fn malformed(param: &'static str, reason: impl Into<String>) -> Self {
        CipherError::MalformedInput {
            param,
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CipherError::MissingArgument(_) => ErrorKind::MissingArgument,
            CipherError::MalformedInput { .. } => ErrorKind::MalformedInput,
            CipherError::DecryptionFailure => ErrorKind::DecryptionFailure,
        }
    }

    /// Returns the name of the parameter this error refers to, if any.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            CipherError::MissingArgument(param) => Some(param),
            CipherError::MalformedInput { param, .. } => Some(param),
            CipherError::DecryptionFailure => None,
        }
    }
}

/// Fail with [`CipherError::MissingArgument`] if `value` is empty.
pub fn require(value: &str, param: &'static str) -> Result<(), CipherError> {
    if value.is_empty() {
        return Err(CipherError::MissingArgument(param));
    }
    Ok(())
}
