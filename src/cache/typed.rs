//! Type-gated memoization cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{trace, warn};

use super::{CacheError, CacheOptions};
use crate::key::{serialize, KeyType, Value};

/// Outcome of a [`MemoCache::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Hit(V),
    Miss,
    /// The key was rejected by the type guard; no lookup was made.
    TypeMismatch { expected: KeyType, found: KeyType },
}

impl<V> Lookup<V> {
    /// Collapse into the lenient result: mismatches read as misses.
    pub fn into_option(self) -> Option<V> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::TypeMismatch { .. } => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// A named cache whose keys must have one runtime type.
///
/// Keys are stored under their canonical serialization. Keys of the wrong
/// type are dropped silently by `get`/`set`/`del`; the `lookup` and `try_*`
/// variants report them instead.
///
/// This cache is:
/// - Thread-safe (per-key locking via DashMap)
/// - Unbounded, with no eviction or expiry
/// - Clone-friendly (cloning is cheap, shares the same underlying store)
pub struct MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<DashMap<String, V>>,
    identifier: Arc<str>,
    key_type: KeyType,
    warn_on_type_mismatch: bool,
}

// Manual Clone implementation that doesn't require V: Clone on the handle
impl<V> Clone for MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            identifier: Arc::clone(&self.identifier),
            key_type: self.key_type,
            warn_on_type_mismatch: self.warn_on_type_mismatch,
        }
    }
}

impl<V> MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new, empty cache.
    pub fn new(options: &CacheOptions) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            identifier: Arc::from(options.identifier.as_str()),
            key_type: options.key_type,
            warn_on_type_mismatch: false,
        }
    }

    /// Log rejected keys at `warn` instead of `trace`.
    #[must_use]
    pub fn warn_on_type_mismatch(mut self, enabled: bool) -> Self {
        self.warn_on_type_mismatch = enabled;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Whether both handles share the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Canonical key for `key`, or `None` if the type guard rejects it.
    fn guard(&self, key: &Value) -> Option<String> {
        let found = key.key_type();
        if found == self.key_type {
            return Some(serialize(key));
        }
        if self.warn_on_type_mismatch {
            warn!(
                "Cache '{}' ignored {} key (expects {})",
                self.identifier, found, self.key_type
            );
        } else {
            trace!(
                "Cache '{}' ignored {} key (expects {})",
                self.identifier, found, self.key_type
            );
        }
        None
    }

    fn mismatch(&self, key: &Value) -> CacheError {
        CacheError::KeyTypeMismatch {
            identifier: self.identifier.to_string(),
            expected: self.key_type,
            found: key.key_type(),
        }
    }

    /// Get the value stored under `key`.
    ///
    /// Returns `None` both when nothing is stored and when `key` has the
    /// wrong type.
    pub fn get(&self, key: &Value) -> Option<V> {
        self.lookup(key).into_option()
    }

    /// Like [`get`](Self::get), but tells a miss apart from a rejected key.
    pub fn lookup(&self, key: &Value) -> Lookup<V> {
        let Some(canonical) = self.guard(key) else {
            return Lookup::TypeMismatch {
                expected: self.key_type,
                found: key.key_type(),
            };
        };
        match self.inner.get(&canonical) {
            Some(entry) => {
                trace!("Cache '{}' hit: {}", self.identifier, canonical);
                Lookup::Hit(entry.value().clone())
            }
            None => {
                trace!("Cache '{}' miss: {}", self.identifier, canonical);
                Lookup::Miss
            }
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Does nothing if `key` has the wrong type.
    pub fn set(&self, key: &Value, value: V) {
        if let Some(canonical) = self.guard(key) {
            self.inner.insert(canonical, value);
        }
    }

    /// Like [`set`](Self::set), but rejects a mistyped key with an error.
    pub fn try_set(&self, key: &Value, value: V) -> Result<(), CacheError> {
        let canonical = self.guard(key).ok_or_else(|| self.mismatch(key))?;
        self.inner.insert(canonical, value);
        Ok(())
    }

    /// Remove the entry under `key`.
    ///
    /// Returns `true` if an entry was removed; `false` if there was none or
    /// `key` has the wrong type.
    pub fn del(&self, key: &Value) -> bool {
        self.guard(key)
            .is_some_and(|canonical| self.inner.remove(&canonical).is_some())
    }

    /// Like [`del`](Self::del), but rejects a mistyped key with an error.
    pub fn try_del(&self, key: &Value) -> Result<bool, CacheError> {
        let canonical = self.guard(key).ok_or_else(|| self.mismatch(key))?;
        Ok(self.inner.remove(&canonical).is_some())
    }

    /// Check if an entry exists under `key`.
    pub fn contains(&self, key: &Value) -> bool {
        self.guard(key)
            .is_some_and(|canonical| self.inner.contains_key(&canonical))
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get or insert a value using a closure.
    ///
    /// `f` runs without holding any lock, so it may use this cache itself.
    /// If another caller stores the key first, that value wins and is
    /// returned. Returns `None` without calling `f` if `key` has the wrong
    /// type.
    pub fn get_or_insert_with<F>(&self, key: &Value, f: F) -> Option<V>
    where
        F: FnOnce() -> V,
    {
        let canonical = self.guard(key)?;
        if let Some(entry) = self.inner.get(&canonical) {
            return Some(entry.value().clone());
        }
        let value = f();
        Some(self.inner.entry(canonical).or_insert(value).value().clone())
    }

    /// Get or try to insert a value using a fallible closure.
    ///
    /// Errors from `f` are returned and nothing is cached.
    pub fn get_or_try_insert_with<F, E>(&self, key: &Value, f: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let Some(canonical) = self.guard(key) else {
            return Ok(None);
        };
        if let Some(entry) = self.inner.get(&canonical) {
            return Ok(Some(entry.value().clone()));
        }
        let value = f()?;
        Ok(Some(self.inner.entry(canonical).or_insert(value).value().clone()))
    }
}

impl<V> std::fmt::Debug for MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("identifier", &self.identifier)
            .field("key_type", &self.key_type)
            .field("entry_count", &self.inner.len())
            .finish()
    }
}
