//! [`KeyMaterial`]: a validated AES key + IV pair for a single call.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherError;
use zeroize::Zeroizing;

use super::{IV_LEN, KEY_LEN};

/// AES key lengths accepted by the fixed-key service (AES-128/192/256).
pub const VALID_KEY_LENS: [usize; 3] = [16, 24, KEY_LEN];

/// Key and IV bytes for one encrypt or decrypt call.
///
/// Built per call and dropped when the call returns. Both buffers are zeroed
/// on drop.
pub struct KeyMaterial {
    key: Zeroizing<Vec<u8>>,
    iv: Zeroizing<[u8; IV_LEN]>,
}

impl KeyMaterial {
    /// Wrap raw key and IV bytes, checking their lengths.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedInput`] if `key` is not 16, 24 or 32
    /// bytes, or `iv` is not [`IV_LEN`] bytes.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        if !VALID_KEY_LENS.contains(&key.len()) {
            return Err(CipherError::malformed(
                "key",
                format!("expected 16, 24 or 32 bytes, got {}", key.len()),
            ));
        }
        if iv.len() != IV_LEN {
            return Err(CipherError::malformed(
                "iv",
                format!("expected {IV_LEN} bytes, got {}", iv.len()),
            ));
        }
        let mut iv_buf = Zeroizing::new([0u8; IV_LEN]);
        iv_buf.copy_from_slice(iv);
        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
            iv: iv_buf,
        })
    }

    /// Decode base64 `key` and `iv` strings into validated key material.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedInput`] naming `key` or `iv` if either
    /// is not valid base64 or decodes to the wrong length.
    pub fn from_base64(key: &str, iv: &str) -> Result<Self, CipherError> {
        let key_bytes = Zeroizing::new(decode_base64(key, "key")?);
        let iv_bytes = Zeroizing::new(decode_base64(iv, "iv")?);
        Self::new(&key_bytes, &iv_bytes)
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv[..]
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        write!(f, "KeyMaterial(aes-{}, [REDACTED])", self.key.len() * 8)
    }
}

/// Decode a standard (padded) base64 string, attributing failures to `param`.
///
/// ASCII whitespace anywhere in `value` is ignored, so values stored with
/// line breaks still decode.
pub fn decode_base64(value: &str, param: &'static str) -> Result<Vec<u8>, CipherError> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| CipherError::malformed(param, format!("invalid base64: {e}")))
}
