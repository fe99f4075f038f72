//! Common error types and secret shapes shared across `textcrypt` crates.

pub mod error;
pub mod secrets;

pub use error::{CipherError, ErrorKind};
pub use secrets::EncryptionSecrets;
