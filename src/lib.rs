//! # arbstore - An Expiring Store for Encrypted Payloads
//!
//! arbstore keeps short-lived secrets in process memory. A value is encrypted
//! by a caller-supplied cipher, and the material needed to decrypt it (secret
//! key, IV, expiry) is stored under the ciphertext. A background sweeper
//! forgets everything whose expiry has passed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              arbstore                                   │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────────────────┐ │
//! │  │   Cipher    │───>│ seal/reveal │───>│        ExpiringStore         │ │
//! │  │ (caller's)  │    │             │    │  RwLock<HashMap<key, bytes>> │ │
//! │  └─────────────┘    └──────┬──────┘    └──────────────────────────────┘ │
//! │                            │                          ▲                 │
//! │                            ▼                          │                 │
//! │                     ┌─────────────┐    ┌──────────────┴───────────────┐ │
//! │                     │ PayloadCodec│    │        ExpirySweeper         │ │
//! │                     │ (bincode)   │    │   (Background Tokio Task)    │ │
//! │                     └─────────────┘    └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use arbstore::{start_expiry_sweeper, ExpiringStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(ExpiringStore::new());
//!     let sweeper = start_expiry_sweeper(Arc::clone(&store));
//!
//!     // `cipher` is any type implementing arbstore::Cipher
//!     let key = store.seal("4111-1111-1111-1111", &cipher)?;
//!     let card = store.reveal(&key, &cipher)?;
//!
//!     sweeper.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`codec`]: Payload record type and its versioned byte encoding
//! - [`storage`]: Thread-safe store, error types and the expiry sweeper
//! - [`cipher`]: The encryption collaborator trait
//! - [`config`]: Store settings
//!
//! ## Design Highlights
//!
//! ### Locking
//!
//! One RwLock guards the whole map. Reads share it. Every mutation, including
//! the existence check that precedes it, holds it exclusively.
//!
//! ### Expiry
//!
//! Each record carries an absolute unix expiry. The sweeper scans a snapshot
//! outside the lock and removes expired entries in one short write section.
//! Entries that fail to decode are skipped, never removed.

pub mod cipher;
pub mod codec;
pub mod config;
pub mod storage;

// Re-export commonly used types for convenience
pub use cipher::Cipher;
pub use codec::{CodecError, PayloadRecord};
pub use config::StoreConfig;
pub use storage::{
    start_expiry_sweeper, ExpiringStore, ExpiryConfig, ExpirySweeper, StoreError, StoreResult,
    SweepReport,
};

/// Version of arbstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
