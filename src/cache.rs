//! Output cache contract and in-memory store

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// String-keyed blob store with TTL.
///
/// The grid's only requirements are get-or-miss and put-with-expiry.
/// A race between two identical requests populating the same key is
/// benign: the fingerprint uniquely identifies one logical render, so
/// last write wins and the values are equal.
pub trait CacheStore {
	/// Returns the cached value, or `None` on miss or expiry
	fn get(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key` for `ttl`
	fn put(&self, key: &str, value: &str, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
	value: String,
	expires_at: SystemTime,
}

impl CacheEntry {
	fn new(value: String, ttl: Duration) -> Self {
		Self {
			value,
			expires_at: SystemTime::now() + ttl,
		}
	}

	fn is_expired(&self) -> bool {
		SystemTime::now() > self.expires_at
	}
}

/// In-memory cache store with per-entry expiry.
///
/// # Examples
///
/// ```
/// use datagrid::{CacheStore, InMemoryCacheStore};
/// use std::time::Duration;
///
/// let store = InMemoryCacheStore::new();
/// store.put("key", "<table/>", Duration::from_secs(60));
/// assert_eq!(store.get("key").as_deref(), Some("<table/>"));
/// assert_eq!(store.get("missing"), None);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
	entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops expired entries
	pub fn cleanup_expired(&self) {
		self.entries.lock().retain(|_, entry| !entry.is_expired());
	}

	/// Returns the number of stored entries, expired ones included
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns true if the store holds no entries
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl CacheStore for InMemoryCacheStore {
	fn get(&self, key: &str) -> Option<String> {
		let entries = self.entries.lock();
		let entry = entries.get(key)?;
		if entry.is_expired() {
			return None;
		}
		Some(entry.value.clone())
	}

	fn put(&self, key: &str, value: &str, ttl: Duration) {
		self.entries
			.lock()
			.insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
	}
}
