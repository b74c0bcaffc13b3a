//! Thread-Safe Expiring Store
//!
//! This module implements the core store for arbstore.
//! It maps string keys to encoded payload records behind a single
//! reader/writer lock, and knows how to sweep out records whose expiry
//! timestamp has passed.
//!
//! ## Design Decisions
//!
//! 1. **One RwLock**: The whole map sits behind one lock. Reads share it,
//!    every mutation takes it exclusively for the full check-then-act sequence.
//! 2. **Opaque Values**: The map holds encoded bytes, not records. Records are
//!    decoded on the way out, so a corrupt entry only affects its own key.
//! 3. **Snapshot Sweeps**: The sweeper copies the map under a read lock,
//!    decodes outside any lock, then removes under a short write lock.
//! 4. **Explicit Instances**: Stores are plain values shared through `Arc`.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ExpiringStore                          │
//! │                                                             │
//! │   get / decode ──── read ───┐                               │
//! │                             ▼                               │
//! │                 ┌─────────────────────────┐                 │
//! │                 │ RwLock<HashMap<String,  │                 │
//! │                 │        Bytes>>          │                 │
//! │                 └─────────────────────────┘                 │
//! │                             ▲                               │
//! │   add / remove / ── write ──┘                               │
//! │   create_or_replace                                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reader racing the sweeper may see a hit followed by a miss for the same
//! key. Expiry is eventually consistent, bounded by the sweep interval.

use crate::cipher::Cipher;
use crate::codec::{self, unix_timestamp, PayloadRecord};
use crate::config::StoreConfig;
use crate::storage::error::{CipherFailure, StoreError, StoreResult};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::trace;

/// Rejects empty and whitespace-only keys.
#[inline]
fn validate_key(key: &str) -> StoreResult<()> {
    if key.trim().is_empty() {
        Err(StoreError::InvalidKey)
    } else {
        Ok(())
    }
}

/// The main store for arbstore.
///
/// # Thread Safety
///
/// This struct is designed to be wrapped in an `Arc` and shared across
/// caller threads and the background sweeper. All operations are thread-safe.
///
/// # Example
///
/// ```
/// use arbstore::codec::PayloadRecord;
/// use arbstore::storage::ExpiringStore;
/// use std::time::Duration;
///
/// let store = ExpiringStore::new();
///
/// let record = PayloadRecord::with_ttl("9f2c0a", "secret", vec![1; 16], Duration::from_secs(60));
/// let key = store.create_or_replace("9f2c0a", &record).unwrap();
///
/// assert_eq!(store.decode(&key).unwrap(), record);
/// ```
pub struct ExpiringStore {
    /// Encoded payloads by key
    data: RwLock<HashMap<String, Bytes>>,

    /// Settings for sealing and the sweeper
    config: StoreConfig,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total successful inserts
    add_count: AtomicU64,

    /// Statistics: total explicit removals
    remove_count: AtomicU64,

    /// Statistics: number of expired entries swept
    expired_count: AtomicU64,
}

impl std::fmt::Debug for ExpiringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("add_count", &self.add_count.load(Ordering::Relaxed))
            .field("remove_count", &self.remove_count.load(Ordering::Relaxed))
            .field("expired_count", &self.expired_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for ExpiringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpiringStore {
    /// Creates an empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with custom settings.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            config,
            get_count: AtomicU64::new(0),
            add_count: AtomicU64::new(0),
            remove_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    /// Returns the settings this store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // The map only ever holds whole values, so a guard abandoned by a
    // panicking thread still protects a consistent map.
    fn read_data(&self) -> RwLockReadGuard<'_, HashMap<String, Bytes>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_data(&self) -> RwLockWriteGuard<'_, HashMap<String, Bytes>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts into an already locked map, refusing to overwrite.
    fn insert_new(data: &mut HashMap<String, Bytes>, key: &str, value: Bytes) -> StoreResult<()> {
        if data.contains_key(key) {
            return Err(StoreError::KeyExists(key.to_string()));
        }
        data.insert(key.to_string(), value);
        Ok(())
    }

    // ========================================================================
    // BASIC OPERATIONS
    // ========================================================================

    /// Stores encoded bytes under a new key.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidKey`] if the key is blank
    /// - [`StoreError::KeyExists`] if the key is already stored
    pub fn add(&self, key: &str, value: Bytes) -> StoreResult<()> {
        validate_key(key)?;

        let mut data = self.write_data();
        Self::insert_new(&mut data, key, value)?;
        self.add_count.fetch_add(1, Ordering::Relaxed);

        Ok(())
    }

    /// Gets the encoded bytes stored under a key.
    ///
    /// Returns `None` on a miss; a miss is not an error.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let data = self.read_data();
        data.get(key).cloned()
    }

    /// Removes a key, returning the bytes that were stored under it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidKey`] if the key is blank
    /// - [`StoreError::KeyNotFound`] if nothing is stored under the key
    pub fn remove(&self, key: &str) -> StoreResult<Bytes> {
        validate_key(key)?;

        let mut data = self.write_data();
        match data.remove(key) {
            Some(value) => {
                self.remove_count.fetch_add(1, Ordering::Relaxed);
                Ok(value)
            }
            None => Err(StoreError::KeyNotFound(key.to_string())),
        }
    }

    /// Checks whether a key is currently stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read_data().contains_key(key)
    }

    // ========================================================================
    // PAYLOAD OPERATIONS
    // ========================================================================

    /// Encodes a record and stores it under `key`, replacing any existing entry.
    ///
    /// The existence check, removal and insert happen under one write lock,
    /// so concurrent callers on the same key never see a spurious
    /// [`StoreError::KeyExists`].
    ///
    /// # Returns
    ///
    /// The key the record was stored under.
    pub fn create_or_replace(&self, key: &str, record: &PayloadRecord) -> StoreResult<String> {
        validate_key(key)?;

        let encoded = codec::encode(record).map_err(StoreError::Encode)?;

        let mut data = self.write_data();
        if data.remove(key).is_some() {
            self.remove_count.fetch_add(1, Ordering::Relaxed);
        }
        Self::insert_new(&mut data, key, encoded)?;
        self.add_count.fetch_add(1, Ordering::Relaxed);

        Ok(key.to_string())
    }

    /// Looks up a key and decodes its payload record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidKey`] if the key is blank
    /// - [`StoreError::KeyNotFound`] if nothing is stored under the key
    /// - [`StoreError::Decode`] if the stored bytes are not a valid record
    pub fn decode(&self, key: &str) -> StoreResult<PayloadRecord> {
        validate_key(key)?;

        let bytes = self
            .get(key)
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?;

        codec::decode(&bytes).map_err(|_| StoreError::Decode {
            key: key.to_string(),
        })
    }

    /// Decodes the record under `key` and decrypts with the supplied function.
    ///
    /// The function receives `(ciphertext, secret_key, iv)`. The storage key
    /// is the ciphertext: sealed values are stored under their own encrypted
    /// form, so the record only carries the material needed to open it.
    pub fn decrypt_by_key<F, E>(&self, key: &str, decrypt: F) -> StoreResult<String>
    where
        F: FnOnce(&str, &str, &[u8]) -> Result<String, E>,
        E: Into<CipherFailure>,
    {
        let record = self.decode(key)?;

        decrypt(key, &record.secret_key, &record.iv).map_err(|err| StoreError::Decrypt {
            key: key.to_string(),
            source: err.into(),
        })
    }

    // ========================================================================
    // SEALING
    // ========================================================================

    /// Encrypts `plaintext` and stores the key material for the configured
    /// default TTL.
    ///
    /// # Returns
    ///
    /// The ciphertext, which is also the key to reveal it with.
    pub fn seal<C: Cipher>(&self, plaintext: &str, cipher: &C) -> StoreResult<String> {
        self.seal_with_ttl(plaintext, cipher, self.config.default_ttl)
    }

    /// Encrypts `plaintext` and stores the key material for `ttl`.
    pub fn seal_with_ttl<C: Cipher>(&self, plaintext: &str, cipher: &C, ttl: Duration) -> StoreResult<String> {
        if ttl.is_zero() {
            return Err(StoreError::InvalidTtl);
        }

        let secret_key = cipher
            .generate_secret_key(self.config.secret_key_len)
            .map_err(|err| StoreError::Encrypt(err.into()))?;
        let (ciphertext, iv) = cipher
            .encrypt(plaintext, &secret_key)
            .map_err(|err| StoreError::Encrypt(err.into()))?;

        let record = PayloadRecord::with_ttl(ciphertext.clone(), secret_key, iv, ttl);
        self.create_or_replace(&ciphertext, &record)
    }

    /// Decrypts a previously sealed value.
    pub fn reveal<C: Cipher>(&self, key: &str, cipher: &C) -> StoreResult<String> {
        self.decrypt_by_key(key, |ciphertext, secret_key, iv| {
            cipher.decrypt(ciphertext, secret_key, iv)
        })
    }

    // ========================================================================
    // MAINTENANCE
    // ========================================================================

    /// Returns a snapshot of all stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.read_data().keys().cloned().collect()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.read_data().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            add_ops: self.add_count.load(Ordering::Relaxed),
            remove_ops: self.remove_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Removes every entry whose record has expired.
    ///
    /// This is called by the background expiry sweeper.
    pub fn cleanup_expired(&self) -> SweepReport {
        self.cleanup_expired_at(unix_timestamp())
    }

    /// Removes every entry whose record expired before `now` (unix seconds).
    ///
    /// Entries that fail to decode are counted and left in place.
    pub fn cleanup_expired_at(&self, now: i64) -> SweepReport {
        let (doomed, mut report) = self.collect_expired(now);
        report.expired = self.remove_unchanged(doomed);
        report
    }

    /// Scans a snapshot of the map for expired entries. Decoding happens
    /// after the read lock is released.
    fn collect_expired(&self, now: i64) -> (Vec<(String, Bytes)>, SweepReport) {
        let snapshot: Vec<(String, Bytes)> = {
            let data = self.read_data();
            data.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let mut report = SweepReport {
            scanned: snapshot.len() as u64,
            ..SweepReport::default()
        };

        let doomed = snapshot
            .into_iter()
            .filter(|(key, value)| match codec::decode(value) {
                Ok(record) => record.is_expired_at(now),
                Err(err) => {
                    report.corrupt += 1;
                    trace!(key = %key, error = %err, "Skipping undecodable entry");
                    false
                }
            })
            .collect();

        (doomed, report)
    }

    /// Removes entries whose bytes still match what was scanned, so a value
    /// replaced since the snapshot survives.
    fn remove_unchanged(&self, doomed: Vec<(String, Bytes)>) -> u64 {
        if doomed.is_empty() {
            return 0;
        }

        let mut removed = 0u64;
        let mut data = self.write_data();
        for (key, scanned) in doomed {
            if data.get(&key) == Some(&scanned) {
                data.remove(&key);
                removed += 1;
            }
        }
        drop(data);

        self.expired_count.fetch_add(removed, Ordering::Relaxed);
        removed
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    /// Number of entries currently stored
    pub keys: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total successful inserts
    pub add_ops: u64,
    /// Total explicit removals
    pub remove_ops: u64,
    /// Total expired entries swept
    pub expired: u64,
}

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries inspected
    pub scanned: u64,
    /// Entries removed because their record had expired
    pub expired: u64,
    /// Entries skipped because they did not decode
    pub corrupt: u64,
}
