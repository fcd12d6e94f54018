//! Cache module - Named memoization caches.
//!
//! This module provides a registry-based caching system that lets unrelated
//! call sites share a memoization cache by agreeing on its name.
//!
//! ## Architecture
//!
//! - `CacheRegistry` - Directory of caches keyed by `"<type>_<identifier>"`
//! - `CacheOptions` - Identifier and expected key type of one cache
//! - `MemoCache` - Type-gated store indexed by canonical key strings
//!
//! ## Usage
//!
//! ```rust
//! use memokey::{CacheOptions, CacheRegistry, Value};
//!
//! let registry = CacheRegistry::new();
//! let cache = registry.find_or_generate::<u32>(&CacheOptions::new("lengths")).unwrap();
//!
//! cache.set(&Value::from("abc"), 3);
//! assert_eq!(cache.get(&Value::from("abc")), Some(3));
//!
//! // Keys of the wrong type are ignored.
//! assert_eq!(cache.get(&Value::from(3)), None);
//! ```

mod config;
mod error;
mod registry;
mod typed;

pub use config::CacheOptions;
pub use error::CacheError;
pub use registry::CacheRegistry;
pub use typed::{Lookup, MemoCache};
