//! Storage Module
//!
//! This module provides the core storage functionality for arbstore.
//! It includes a thread-safe key-value store for encoded payload records
//! and a background sweeper that removes expired ones.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ExpiringStore                           │
//! │          RwLock<HashMap<String, encoded payload>>           │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ cleanup_expired()
//!              ┌─────────────┴─────────────┐
//!              │      ExpirySweeper        │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **Atomic Replace**: `create_or_replace` is a single critical section
//! - **Absolute Expiry**: Each record carries its own unix expiry timestamp
//! - **Active Expiry**: A cancellable sweeper cleans expired entries
//!
//! ## Example
//!
//! ```
//! use arbstore::storage::{ExpiringStore, StoreError};
//! use bytes::Bytes;
//!
//! let store = ExpiringStore::new();
//!
//! store.add("token", Bytes::from("opaque")).unwrap();
//! assert_eq!(store.get("token"), Some(Bytes::from("opaque")));
//!
//! // Keys are unique
//! assert!(matches!(
//!     store.add("token", Bytes::from("again")),
//!     Err(StoreError::KeyExists(_))
//! ));
//! ```

pub mod engine;
pub mod error;
pub mod expiry;

// Re-export commonly used types
pub use engine::{ExpiringStore, StoreStats, SweepReport};
pub use error::{CipherFailure, StoreError, StoreResult};
pub use expiry::{start_expiry_sweeper, ExpiryConfig, ExpirySweeper};
