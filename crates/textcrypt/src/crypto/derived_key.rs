//! [`AesDerivedKeyEncryptionService`]: text encryption under a key and IV
//! derived from a passphrase and a per-call salt.
//!
//! # Derivation
//!
//! PBKDF2-HMAC-SHA1, [`PBKDF2_ITERATIONS`] rounds. The password is the UTF-8
//! passphrase, the salt is the UTF-16LE encoding of the salt string. The first
//! 32 output bytes form the AES-256 key and the next 16 form the IV.
//!
//! These parameters are the defaults of the derive-bytes primitive that
//! produced existing ciphertexts. Changing any of them breaks decryption of
//! stored values.
//!
//! Text is encoded as UTF-16LE before encryption.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{error::require, CipherError};
use hmac::Hmac;
use sha1::Sha1;
use tracing::debug;
use zeroize::Zeroizing;

use super::cipher;
use super::key::{decode_base64, KeyMaterial};
use super::{IV_LEN, KEY_LEN};
use crate::config::AesDerivedKeyOptions;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// Minimum salt length in bytes, after UTF-16LE encoding.
pub const MIN_SALT_LEN: usize = 8;

/// Encrypts and decrypts strings with AES-256-CBC using key material derived
/// from a passphrase and salt.
///
/// Cheap to clone; safe to share between threads.
#[derive(Clone, Debug)]
pub struct AesDerivedKeyEncryptionService {
    options: Arc<AesDerivedKeyOptions>,
}

impl AesDerivedKeyEncryptionService {
    /// Create a service whose default passphrase is taken from `options`.
    pub fn new(options: AesDerivedKeyOptions) -> Self {
        debug!(
            has_passphrase = !options.passphrase.is_empty(),
            "derived-key encryption service created"
        );
        Self {
            options: Arc::new(options),
        }
    }

    /// Encrypt `plain_text` with the configured passphrase and `salt`.
    ///
    /// # Errors
    ///
    /// See [`AesDerivedKeyEncryptionService::encrypt_with_passphrase`].
    pub fn encrypt(&self, plain_text: &str, salt: &str) -> Result<String, CipherError> {
        self.encrypt_with_passphrase(plain_text, salt, &self.options.passphrase)
    }

    /// Encrypt `plain_text` with an explicit `passphrase` and `salt`.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MissingArgument`] naming `plain_text`, `salt` or
    ///   `passphrase` (checked in that order) if one is empty.
    /// - [`CipherError::MalformedInput`] if the salt is shorter than
    ///   [`MIN_SALT_LEN`] bytes once encoded.
    pub fn encrypt_with_passphrase(
        &self,
        plain_text: &str,
        salt: &str,
        passphrase: &str,
    ) -> Result<String, CipherError> {
        require(plain_text, "plain_text")?;
        require(salt, "salt")?;
        require(passphrase, "passphrase")?;

        let material = derive_key_material(passphrase, salt)?;
        let encrypted = cipher::encrypt(&material, &encode_utf16le(plain_text))?;
        Ok(STANDARD.encode(encrypted))
    }

    /// Decrypt base64 `cipher_text` with the configured passphrase and `salt`.
    ///
    /// # Errors
    ///
    /// See [`AesDerivedKeyEncryptionService::decrypt_with_passphrase`].
    pub fn decrypt(&self, cipher_text: &str, salt: &str) -> Result<String, CipherError> {
        self.decrypt_with_passphrase(cipher_text, salt, &self.options.passphrase)
    }

    /// Decrypt base64 `cipher_text` with an explicit `passphrase` and `salt`.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MissingArgument`] naming `cipher_text`, `salt` or
    ///   `passphrase`.
    /// - [`CipherError::MalformedInput`] if `cipher_text` is not base64 or the
    ///   salt is too short.
    /// - [`CipherError::DecryptionFailure`] if the cipher rejects the data or
    ///   the result is not valid UTF-16.
    pub fn decrypt_with_passphrase(
        &self,
        cipher_text: &str,
        salt: &str,
        passphrase: &str,
    ) -> Result<String, CipherError> {
        require(cipher_text, "cipher_text")?;
        require(salt, "salt")?;
        require(passphrase, "passphrase")?;

        let material = derive_key_material(passphrase, salt)?;
        let encrypted = decode_base64(cipher_text, "cipher_text")?;
        let decrypted = cipher::decrypt(&material, &encrypted)?;
        decode_utf16le(&decrypted)
    }
}

/// Derive the AES-256 key and IV for `(passphrase, salt)`.
///
/// Deterministic: the same pair always yields the same key material.
///
/// # Errors
///
/// Returns [`CipherError::MalformedInput`] naming `salt` if the encoded salt
/// is shorter than [`MIN_SALT_LEN`] bytes.
pub fn derive_key_material(passphrase: &str, salt: &str) -> Result<KeyMaterial, CipherError> {
    let salt_bytes = encode_utf16le(salt);
    if salt_bytes.len() < MIN_SALT_LEN {
        return Err(CipherError::malformed(
            "salt",
            format!(
                "must be at least {MIN_SALT_LEN} bytes once encoded, got {}",
                salt_bytes.len()
            ),
        ));
    }

    let mut derived = Zeroizing::new([0u8; KEY_LEN + IV_LEN]);
    derive_bytes(
        passphrase.as_bytes(),
        &salt_bytes,
        PBKDF2_ITERATIONS,
        derived.as_mut_slice(),
    )?;
    KeyMaterial::new(&derived[..KEY_LEN], &derived[KEY_LEN..])
}

fn derive_bytes(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), CipherError> {
    pbkdf2::pbkdf2::<Hmac<Sha1>>(password, salt, rounds, out)
        .map_err(|_| CipherError::malformed("passphrase", "rejected by key derivation"))
}

fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn decode_utf16le(bytes: &[u8]) -> Result<String, CipherError> {
    if bytes.len() % 2 != 0 {
        return Err(CipherError::DecryptionFailure);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CipherError::DecryptionFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ErrorKind;

    const PASSPHRASE: &str = "This Is My Secret";

    fn service() -> AesDerivedKeyEncryptionService {
        AesDerivedKeyEncryptionService::new(AesDerivedKeyOptions {
            passphrase: PASSPHRASE.into(),
        })
    }

    fn missing_param(result: Result<String, CipherError>) -> &'static str {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        err.param().unwrap()
    }

    #[test]
    fn encrypt_requires_plain_text() {
        assert_eq!(missing_param(service().encrypt("", "testSalt")), "plain_text");
    }

    #[test]
    fn encrypt_requires_salt() {
        assert_eq!(missing_param(service().encrypt("Testing", "")), "salt");
    }

    #[test]
    fn encrypt_requires_passphrase() {
        assert_eq!(
            missing_param(service().encrypt_with_passphrase("Testing", "Salt", "")),
            "passphrase"
        );
    }

    #[test]
    fn decrypt_requires_cipher_text() {
        assert_eq!(missing_param(service().decrypt("", "testSalt")), "cipher_text");
    }

    #[test]
    fn decrypt_requires_salt() {
        assert_eq!(missing_param(service().decrypt("Testing", "")), "salt");
    }

    #[test]
    fn decrypt_requires_passphrase() {
        assert_eq!(
            missing_param(service().decrypt_with_passphrase("Testing", "Salt", "")),
            "passphrase"
        );
    }

    #[test]
    fn empty_configured_passphrase_is_missing_argument() {
        let svc = AesDerivedKeyEncryptionService::new(AesDerivedKeyOptions::default());
        assert_eq!(missing_param(svc.encrypt("Testing", "testSalt")), "passphrase");
        assert_eq!(missing_param(svc.decrypt("Testing", "testSalt")), "passphrase");
    }

    #[test]
    fn round_trip_with_configured_passphrase() {
        let svc = service();
        let cases = [
            ("msellers@iowacomputergurus.com|1234567890", "testSalt"),
            ("msellers@iowacomputergurus.com|1234567890", "ABC-12354"),
            ("msellers|1234567890", "ABC-56789"),
            (
                "test|123456789001234578901263348976321325687",
                "Super-Simple-Salt-Value",
            ),
            ("ünïcødé ✓ 日本語 🔐", "sälted-value"),
        ];
        for (input, salt) in cases {
            let encrypted = svc.encrypt(input, salt).unwrap();
            assert_ne!(encrypted, input);
            assert_eq!(svc.decrypt(&encrypted, salt).unwrap(), input);
        }
    }

    #[test]
    fn round_trip_with_explicit_passphrase() {
        let svc = AesDerivedKeyEncryptionService::new(AesDerivedKeyOptions::default());
        let encrypted = svc
            .encrypt_with_passphrase("explicit", "testSalt", "another secret")
            .unwrap();
        assert_eq!(
            svc.decrypt_with_passphrase(&encrypted, "testSalt", "another secret")
                .unwrap(),
            "explicit"
        );
    }

    #[test]
    fn same_inputs_produce_same_cipher_text() {
        let svc = service();
        let a = svc.encrypt("stable", "testSalt").unwrap();
        let b = svc.encrypt("stable", "testSalt").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, svc.encrypt("stable", "otherSalt").unwrap());
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key_material(PASSPHRASE, "testSalt").unwrap();
        let b = derive_key_material(PASSPHRASE, "testSalt").unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.iv(), b.iv());
        assert_eq!(a.key().len(), KEY_LEN);
        assert_eq!(a.iv().len(), IV_LEN);

        let c = derive_key_material(PASSPHRASE, "testSalt2").unwrap();
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn key_and_iv_are_one_continuous_derivation() {
        let material = derive_key_material(PASSPHRASE, "testSalt").unwrap();
        let mut expected = [0u8; KEY_LEN + IV_LEN];
        derive_bytes(
            PASSPHRASE.as_bytes(),
            &encode_utf16le("testSalt"),
            PBKDF2_ITERATIONS,
            &mut expected,
        )
        .unwrap();
        assert_eq!(material.key(), &expected[..KEY_LEN]);
        assert_eq!(material.iv(), &expected[KEY_LEN..]);
    }

    #[test]
    fn derivation_matches_known_answer() {
        let material = derive_key_material(PASSPHRASE, "testSalt").unwrap();
        assert_eq!(
            material.key(),
            &[
                0x79, 0x58, 0x7b, 0x2d, 0xbf, 0x29, 0xdb, 0xe0, 0x28, 0x9c, 0x04, 0x7f, 0x8a, 0xcf,
                0xe5, 0xb5, 0xa7, 0x24, 0x28, 0xb4, 0x73, 0xc0, 0x6b, 0x61, 0xeb, 0xeb, 0x38, 0x45,
                0xb0, 0x97, 0x2e, 0x5d,
            ]
        );
        assert_eq!(
            material.iv(),
            &[
                0xf8, 0x00, 0x08, 0xa0, 0x7f, 0xfa, 0xcb, 0x31, 0x24, 0x6d, 0x2c, 0x01, 0x3b, 0x88,
                0xee, 0xa6,
            ]
        );
    }

    #[test]
    fn encrypt_matches_stored_ciphertext() {
        let input = "msellers@iowacomputergurus.com|1234567890";
        let stored = "LVl40QlT9MqUmF6FLF0En/vWsEjLoHp9mwnWi/3c+ShHGez5CTNCss6BH3bnHgcDsykA9RRxH70R+TN/GGKCckwo1g+Xj5pTSpI1kYBsxjiwqKopTjc208fNcYuGAQ1g";
        assert_eq!(service().encrypt(input, "testSalt").unwrap(), stored);
        assert_eq!(service().decrypt(stored, "testSalt").unwrap(), input);
    }

    #[test]
    fn prf_is_hmac_sha1() {
        // RFC 6070, test case 1: P = "password", S = "salt", c = 1, dkLen = 20.
        let mut out = [0u8; 20];
        derive_bytes(b"password", b"salt", 1, &mut out).unwrap();
        assert_eq!(
            out,
            [
                0x0c, 0x60, 0xc8, 0x0f, 0x96, 0x1f, 0x0e, 0x71, 0xf3, 0xa9, 0xb5, 0x24, 0xaf, 0x60,
                0x12, 0x06, 0x2f, 0xe0, 0x37, 0xa6,
            ]
        );
    }

    #[test]
    fn short_salt_is_malformed() {
        let err = service().encrypt("Testing", "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.param(), Some("salt"));
        // Four UTF-16 code units is exactly the minimum.
        assert!(service().encrypt("Testing", "Salt").is_ok());
    }

    #[test]
    fn salt_is_encoded_as_utf16le() {
        assert_eq!(encode_utf16le("Ab"), vec![0x41, 0x00, 0x62, 0x00]);
    }

    #[test]
    fn wrong_salt_or_passphrase_does_not_yield_plain_text() {
        let svc = service();
        let encrypted = svc.encrypt("secret value", "testSalt").unwrap();
        for result in [
            svc.decrypt(&encrypted, "wrongSalt"),
            svc.decrypt_with_passphrase(&encrypted, "testSalt", "not the secret"),
        ] {
            match result {
                Err(e) => assert_eq!(e.kind(), ErrorKind::DecryptionFailure),
                Ok(text) => assert_ne!(text, "secret value"),
            }
        }
    }

    #[test]
    fn malformed_cipher_text_is_reported() {
        let err = service().decrypt("Testing", "testSalt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.param(), Some("cipher_text"));
    }

    #[test]
    fn odd_length_plain_text_bytes_fail_decoding() {
        assert!(matches!(
            decode_utf16le(&[0x41, 0x00, 0x42]),
            Err(CipherError::DecryptionFailure)
        ));
        // Unpaired high surrogate.
        assert!(decode_utf16le(&[0x00, 0xD8]).is_err());
        assert_eq!(decode_utf16le(&[0x41, 0x00]).unwrap(), "A");
    }
}
