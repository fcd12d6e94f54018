//! Cache registry - Central management for all caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{CacheError, CacheOptions, MemoCache};
use crate::config::RegistryConfig;

/// Central registry for sharing memoization caches by name.
///
/// Caches are keyed by `"<type>_<identifier>"`, so unrelated call sites
/// that agree on an identifier and key type get the same cache. Entries are
/// never removed.
///
/// ## Example
///
/// ```rust
/// use memokey::{CacheOptions, CacheRegistry, KeyType};
///
/// let registry = CacheRegistry::new();
/// let options = CacheOptions::new("compiled").key_type(KeyType::Object);
///
/// let a = registry.find_or_generate::<String>(&options).unwrap();
/// let b = registry.find_or_generate::<String>(&options).unwrap();
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
    config: RegistryConfig,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CacheEntry {
    fn new<V>(cache: MemoCache<V>) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self {
            cache: Box::new(cache),
            type_id: TypeId::of::<MemoCache<V>>(),
            type_name: std::any::type_name::<MemoCache<V>>(),
        }
    }

    fn downcast<V>(&self, name: &str) -> Result<MemoCache<V>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let mismatch = || CacheError::ValueTypeMismatch {
            cache: name.to_string(),
            expected: std::any::type_name::<MemoCache<V>>(),
            found: self.type_name,
        };
        if self.type_id != TypeId::of::<MemoCache<V>>() {
            return Err(mismatch());
        }
        self.cache
            .downcast_ref::<MemoCache<V>>()
            .cloned()
            .ok_or_else(mismatch)
    }
}

impl CacheRegistry {
    /// Create a new empty cache registry with default settings.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new empty cache registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        info!("Cache registry initialized");
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Options for `identifier` using this registry's default key type.
    pub fn options(&self, identifier: impl Into<String>) -> CacheOptions {
        CacheOptions::new(identifier).key_type(self.config.default_key_type)
    }

    /// Get the cache registered for `options`, creating it if absent.
    ///
    /// Two calls with the same key type and identifier return handles to the
    /// same cache. Fails only if that cache was created with a different
    /// value type.
    pub fn find_or_generate<V>(&self, options: &CacheOptions) -> Result<MemoCache<V>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let name = options.composite_key();

        if let Some(entry) = self.caches.read().get(&name) {
            return entry.downcast(&name);
        }

        let mut caches = self.caches.write();

        // Another caller may have created it between the two locks.
        if let Some(entry) = caches.get(&name) {
            return entry.downcast(&name);
        }

        debug!("Creating cache: {}", name);

        let cache =
            MemoCache::new(options).warn_on_type_mismatch(self.config.warn_on_type_mismatch);
        caches.insert(name, CacheEntry::new(cache.clone()));

        Ok(cache)
    }

    /// Check if a cache exists for the given options.
    pub fn contains(&self, options: &CacheOptions) -> bool {
        self.caches.read().contains_key(&options.composite_key())
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }

    /// Get a list of all registered composite cache names.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyType;

    #[test]
    fn test_find_or_generate_is_idempotent() {
        let registry = CacheRegistry::new();
        let options = CacheOptions::new("schemaA");

        let a = registry.find_or_generate::<i32>(&options).unwrap();
        let b = registry.find_or_generate::<i32>(&options).unwrap();

        assert!(a.ptr_eq(&b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_type_or_identifier_change_gives_new_cache() {
        let registry = CacheRegistry::new();
        let base = registry
            .find_or_generate::<i32>(&CacheOptions::new("schemaA"))
            .unwrap();
        let other_id = registry
            .find_or_generate::<i32>(&CacheOptions::new("schemaB"))
            .unwrap();
        let other_type = registry
            .find_or_generate::<i32>(&CacheOptions::new("schemaA").key_type(KeyType::Number))
            .unwrap();

        assert!(!base.ptr_eq(&other_id));
        assert!(!base.ptr_eq(&other_type));
        assert_eq!(other_type.key_type(), KeyType::Number);

        let mut names = registry.cache_names();
        names.sort();
        assert_eq!(names, ["number_schemaA", "string_schemaA", "string_schemaB"]);
    }

    #[test]
    fn test_value_type_mismatch_is_an_error() {
        let registry = CacheRegistry::new();
        let options = CacheOptions::new("hosts");
        registry.find_or_generate::<bool>(&options).unwrap();

        let err = registry.find_or_generate::<String>(&options).unwrap_err();
        assert!(matches!(
            err,
            CacheError::ValueTypeMismatch { ref cache, .. } if cache == "string_hosts"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_options_use_default_key_type() {
        let registry = CacheRegistry::with_config(RegistryConfig {
            default_key_type: KeyType::Object,
            ..RegistryConfig::default()
        });
        let options = registry.options("rules");
        assert_eq!(options.key_type, KeyType::Object);

        assert!(!registry.contains(&options));
        registry.find_or_generate::<u8>(&options).unwrap();
        assert!(registry.contains(&options));
    }

    #[test]
    fn test_cloned_registry_shares_caches() {
        let registry = CacheRegistry::new();
        let clone = registry.clone();
        let a = registry.find_or_generate::<u8>(&CacheOptions::new("x")).unwrap();
        let b = clone.find_or_generate::<u8>(&CacheOptions::new("x")).unwrap();
        assert!(a.ptr_eq(&b));
    }
}
