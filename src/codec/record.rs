//! Payload Record
//!
//! The unit of stored value: everything needed to later decrypt a sealed
//! ciphertext, plus the absolute instant after which it should be forgotten.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current time as unix seconds.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// A sealed payload as stored in the [`ExpiringStore`](crate::storage::ExpiringStore).
///
/// Records are immutable once stored. Replacing one means storing a new
/// record under the same key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadRecord {
    /// Opaque identifier or ciphertext this record belongs to
    pub reference: String,
    /// Secret key needed to decrypt the referenced ciphertext
    pub secret_key: String,
    /// Initialization vector paired with `secret_key`
    pub iv: Vec<u8>,
    /// Absolute expiry instant (unix seconds)
    pub expires_at: i64,
}

impl PayloadRecord {
    /// Creates a record with an explicit expiry timestamp.
    pub fn new(
        reference: impl Into<String>,
        secret_key: impl Into<String>,
        iv: impl Into<Vec<u8>>,
        expires_at: i64,
    ) -> Self {
        Self {
            reference: reference.into(),
            secret_key: secret_key.into(),
            iv: iv.into(),
            expires_at,
        }
    }

    /// Creates a record that expires `ttl` from now.
    ///
    /// Sub-second TTLs are rounded up to a whole second so the record is
    /// never born expired.
    pub fn with_ttl(
        reference: impl Into<String>,
        secret_key: impl Into<String>,
        iv: impl Into<Vec<u8>>,
        ttl: Duration,
    ) -> Self {
        let mut secs = ttl.as_secs();
        if ttl.subsec_nanos() > 0 {
            secs = secs.saturating_add(1);
        }
        let expires_at = unix_timestamp().saturating_add(secs.min(i64::MAX as u64) as i64);
        Self::new(reference, secret_key, iv, expires_at)
    }

    /// Checks whether the record had expired at `now` (unix seconds).
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }

    /// Checks whether the record has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_timestamp())
    }

    /// Returns the remaining lifetime in seconds, or 0 once expired.
    pub fn ttl_secs(&self) -> u64 {
        self.expires_at.saturating_sub(unix_timestamp()).max(0) as u64
    }
}

// The secret key never shows up in logs or panic messages.
impl fmt::Debug for PayloadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadRecord")
            .field("reference", &self.reference)
            .field("secret_key", &"<redacted>")
            .field("iv_len", &self.iv.len())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_ttl_is_in_the_future() {
        let record = PayloadRecord::with_ttl("ref", "secret", vec![1, 2, 3], Duration::from_secs(60));
        assert!(record.expires_at > unix_timestamp());
        assert!(!record.is_expired());
        assert!(record.ttl_secs() <= 60);
    }

    #[test]
    fn test_subsecond_ttl_rounds_up() {
        let record = PayloadRecord::with_ttl("ref", "secret", vec![], Duration::from_millis(10));
        assert!(!record.is_expired());
    }

    #[test]
    fn test_expired_record() {
        let record = PayloadRecord::new("ref", "secret", vec![], unix_timestamp() - 1);
        assert!(record.is_expired());
        assert_eq!(record.ttl_secs(), 0);
    }

    #[test]
    fn test_expiry_is_strict() {
        let record = PayloadRecord::new("ref", "secret", vec![], 100);
        assert!(!record.is_expired_at(100));
        assert!(record.is_expired_at(101));
    }

    #[test]
    fn test_with_ttl_saturates_huge_durations() {
        let record = PayloadRecord::with_ttl("ref", "secret", vec![], Duration::MAX);
        assert_eq!(record.expires_at, i64::MAX);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_ttl_secs_at_timestamp_extremes() {
        let ancient = PayloadRecord::new("r", "s", vec![1], i64::MIN);
        assert_eq!(ancient.ttl_secs(), 0);
        assert!(ancient.is_expired());

        let distant = PayloadRecord::new("r", "s", vec![1], i64::MAX);
        assert!(distant.ttl_secs() > 0);
        assert!(!distant.is_expired());
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let record = PayloadRecord::new("ref", "hunter2", vec![9; 16], 0);
        let debug = format!("{:?}", record);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("iv_len: 16"));
    }
}
