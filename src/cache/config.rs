//! Cache configuration.

use serde::Deserialize;

use crate::key::KeyType;

/// Configuration for a cache instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheOptions {
    /// Logical name, shared by every call site that wants the same cache.
    pub identifier: String,

    /// Runtime type keys must have to be looked up or stored.
    #[serde(rename = "type", default)]
    pub key_type: KeyType,
}

impl CacheOptions {
    /// Options for a cache of string keys.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            key_type: KeyType::default(),
        }
    }

    /// Set the expected key type (builder pattern).
    #[must_use]
    pub fn key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    /// Registry key: `"<type>_<identifier>"`.
    pub fn composite_key(&self) -> String {
        format!("{}_{}", self.key_type, self.identifier)
    }
}
