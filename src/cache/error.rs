//! Cache errors.
//!
//! The lenient cache API never returns these; they surface only through the
//! strict `try_*` operations and registry lookups.

use thiserror::Error;

use crate::key::KeyType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A key's runtime type differs from the cache's configured key type.
    #[error("cache '{identifier}' expects {expected} keys, got {found}")]
    KeyTypeMismatch {
        identifier: String,
        expected: KeyType,
        found: KeyType,
    },

    /// A registered cache was requested with a different value type.
    #[error("cache '{cache}' holds {found}, requested as {expected}")]
    ValueTypeMismatch {
        cache: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown key type '{0}'")]
    UnknownKeyType(String),
}
