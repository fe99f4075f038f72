//! Key material handed to an operator for storage into configuration.

use serde::{Deserialize, Serialize};

/// A freshly generated key/IV pair, both base64 encoded.
///
/// Serialises to the same `{ "key": ..., "iv": ... }` shape the fixed-key
/// service reads from configuration, so the output can be pasted directly
/// into a config file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionSecrets {
    /// Base64 encoded AES key.
    pub key: String,
    /// Base64 encoded initialization vector.
    pub iv: String,
}

impl std::fmt::Debug for EncryptionSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionSecrets")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}
