//! Configuration module.
//!
//! Loads registry settings from environment variables.

use std::env;

use tracing::warn;

use crate::key::KeyType;

/// Registry-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Key type used by `CacheRegistry::options`.
    pub default_key_type: KeyType,

    /// Log keys rejected by a type guard at `warn` instead of `trace`.
    pub warn_on_type_mismatch: bool,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `.env` first if present. Unset or unparseable values fall back to
    /// defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_vars(
            env::var("MEMOKEY_DEFAULT_KEY_TYPE").ok().as_deref(),
            env::var("MEMOKEY_WARN_ON_TYPE_MISMATCH").ok().as_deref(),
        )
    }

    fn from_vars(default_key_type: Option<&str>, warn_on_type_mismatch: Option<&str>) -> Self {
        let default_key_type = match default_key_type {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring MEMOKEY_DEFAULT_KEY_TYPE: {}", e);
                KeyType::default()
            }),
            None => KeyType::default(),
        };

        let warn_on_type_mismatch = warn_on_type_mismatch
            .map(|raw| matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            default_key_type,
            warn_on_type_mismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(RegistryConfig::from_vars(None, None), RegistryConfig::default());
    }

    #[test]
    fn test_parse_vars() {
        let config = RegistryConfig::from_vars(Some("object"), Some("TRUE"));
        assert_eq!(config.default_key_type, KeyType::Object);
        assert!(config.warn_on_type_mismatch);

        let config = RegistryConfig::from_vars(Some("number"), Some("no"));
        assert_eq!(config.default_key_type, KeyType::Number);
        assert!(!config.warn_on_type_mismatch);
    }

    #[test]
    fn test_unknown_key_type_falls_back() {
        let config = RegistryConfig::from_vars(Some("symbol"), None);
        assert_eq!(config.default_key_type, KeyType::String);
    }
}
