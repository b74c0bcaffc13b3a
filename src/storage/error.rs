//! Store error types

use crate::codec::CodecError;
use thiserror::Error;

/// Boxed error reported by a cipher collaborator.
pub type CipherFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`ExpiringStore`](crate::storage::ExpiringStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is empty or whitespace only
    #[error("key is required")]
    InvalidKey,

    /// `add` was called on a key that is already stored
    #[error("key already exists: {0}")]
    KeyExists(String),

    /// No entry is stored under the key
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The record could not be serialized
    #[error("failed to encode payload: {0}")]
    Encode(#[source] CodecError),

    /// The stored bytes are not a valid payload
    #[error("failed to decode payload for key: {key}")]
    Decode { key: String },

    /// The cipher could not decrypt the value
    #[error("failed to decrypt value for key {key}: {source}")]
    Decrypt {
        key: String,
        #[source]
        source: CipherFailure,
    },

    /// The cipher could not produce a secret key or ciphertext
    #[error("failed to encrypt value: {0}")]
    Encrypt(#[source] CipherFailure),

    /// A seal was requested with a zero lifetime
    #[error("ttl must be greater than zero")]
    InvalidTtl,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
