//! memokey - Named, type-gated memoization caches.
//!
//! ## Architecture
//!
//! - `key` - Key values, runtime type tags and the canonical serializer
//! - `cache` - Memoization caches and the registry that shares them
//! - `config` - Environment configuration

pub mod cache;
pub mod config;
pub mod key;

pub use cache::{CacheError, CacheOptions, CacheRegistry, Lookup, MemoCache};
pub use config::RegistryConfig;
pub use key::{serialize, write_canonical, KeyType, Value};
