//! AES-CBC encryption and decryption of byte buffers with PKCS#7 padding.
//!
//! **Algorithm choice:** plain CBC, no authentication tag. The IV comes from
//! configuration (or derivation), so identical plaintext under identical key
//! material always produces identical ciphertext. Values stored by earlier
//! releases depend on this; do not randomize the IV here.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use common::CipherError;

use super::key::KeyMaterial;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Pad and encrypt `plaintext`. The AES variant follows the key length.
///
/// # Errors
///
/// Returns [`CipherError::MalformedInput`] if the key length has no AES
/// variant (unreachable for a [`KeyMaterial`] built through its constructors).
pub fn encrypt(material: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    match material.key().len() {
        16 => encrypt_with::<Aes128CbcEnc>(material, plaintext),
        24 => encrypt_with::<Aes192CbcEnc>(material, plaintext),
        32 => encrypt_with::<Aes256CbcEnc>(material, plaintext),
        n => Err(unsupported_key_len(n)),
    }
}

/// Decrypt and unpad `ciphertext`.
///
/// # Errors
///
/// Returns [`CipherError::DecryptionFailure`] if the ciphertext is not a whole
/// number of blocks or the padding does not validate (wrong key, tampered data).
pub fn decrypt(material: &KeyMaterial, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    match material.key().len() {
        16 => decrypt_with::<Aes128CbcDec>(material, ciphertext),
        24 => decrypt_with::<Aes192CbcDec>(material, ciphertext),
        32 => decrypt_with::<Aes256CbcDec>(material, ciphertext),
        n => Err(unsupported_key_len(n)),
    }
}

fn encrypt_with<E>(material: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let encryptor = E::new_from_slices(material.key(), material.iv())
        .map_err(|_| CipherError::malformed("key", "invalid key or iv length"))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<D>(material: &KeyMaterial, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    D: KeyIvInit + BlockDecryptMut,
{
    let decryptor = D::new_from_slices(material.key(), material.iv())
        .map_err(|_| CipherError::malformed("key", "invalid key or iv length"))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::DecryptionFailure)
}

fn unsupported_key_len(len: usize) -> CipherError {
    CipherError::malformed("key", format!("no AES variant for a {len}-byte key"))
}
