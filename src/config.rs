//! Store Configuration
//!
//! Plain values passed to [`ExpiringStore::with_config`](crate::storage::ExpiringStore::with_config).
//! Nothing is read from the environment; the host application decides.

use crate::storage::ExpiryConfig;
use std::time::Duration;

/// Default lifetime of a sealed value (30 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default length of generated secret keys
pub const DEFAULT_SECRET_KEY_LEN: usize = 32;

/// Configuration for an [`ExpiringStore`](crate::storage::ExpiringStore).
///
/// # Example
///
/// ```
/// use arbstore::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_default_ttl(Duration::from_secs(120))
///     .with_sweep_interval(Duration::from_secs(1));
/// assert_eq!(config.expiry.interval, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Lifetime given to values sealed without an explicit TTL
    pub default_ttl: Duration,

    /// Length requested from the cipher when generating secret keys
    pub secret_key_len: usize,

    /// Background sweeper settings
    pub expiry: ExpiryConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            secret_key_len: DEFAULT_SECRET_KEY_LEN,
            expiry: ExpiryConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime of values sealed without an explicit TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the secret key length requested from the cipher.
    pub fn with_secret_key_len(mut self, len: usize) -> Self {
        self.secret_key_len = len;
        self
    }

    /// Sets how often the background sweeper scans the store.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.expiry.interval = interval;
        self
    }
}
