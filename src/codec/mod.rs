//! Payload Codec Module
//!
//! Serializes payload records to the opaque byte sequences kept by the store.
//!
//! ## Modules
//!
//! - `record`: The `PayloadRecord` type and expiry helpers
//! - `payload`: Versioned, deterministic encode/decode
//!
//! ## Example
//!
//! ```
//! use arbstore::codec::{decode, encode, PayloadRecord};
//! use std::time::Duration;
//!
//! let record = PayloadRecord::with_ttl("ciphertext", "secret", vec![7; 16], Duration::from_secs(300));
//! let bytes = encode(&record).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), record);
//! ```

pub mod payload;
pub mod record;

// Re-export commonly used types for convenience
pub use payload::{decode, encode, CodecError, CodecResult, MAX_PAYLOAD_SIZE, PAYLOAD_FORMAT_VERSION};
pub use record::{unix_timestamp, PayloadRecord};
