//! Random key and IV generation for the fixed-key service.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EncryptionSecrets;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use super::{IV_LEN, KEY_LEN};

/// Generate a fresh AES-256 key and CBC IV from the OS CSPRNG.
///
/// The result is meant to be shown once to an operator and copied into
/// configuration; nothing retains it afterwards.
pub fn generate_secrets() -> EncryptionSecrets {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(key.as_mut_slice());
    OsRng.fill_bytes(&mut iv);

    EncryptionSecrets {
        key: STANDARD.encode(key.as_slice()),
        iv: STANDARD.encode(iv),
    }
}
