//! Key values and their runtime type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheError;

/// Runtime type tag of a key.
///
/// Mirrors what a dynamic host reports for a value: records, sequences,
/// null and opaque values are all `object`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Undefined,
}

impl KeyType {
    /// Lowercase tag name, as used in composite registry keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "undefined" => Ok(Self::Undefined),
            _ => Err(CacheError::UnknownKeyType(s.to_string())),
        }
    }
}

/// A cache key.
///
/// Every shape a caller can hand to a cache, classified once at construction
/// so the serializer and the type guard dispatch on a single match.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    /// Named fields in insertion order. Order is significant for the
    /// canonical key.
    Record(Vec<(String, Value)>),
    Sequence(Vec<Value>),
    /// Anything else (dates, handles, ...), carried as its default string
    /// conversion. Always reports `object`; there is no `function` tag, so an
    /// `object` cache accepts every opaque key.
    Opaque(String),
}

impl Value {
    /// Build a record from `(field, value)` pairs, keeping their order.
    ///
    /// A repeated field name overwrites the earlier value in place, the way
    /// assigning to an existing property does.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            let value = value.into();
            match out.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => out.push((name, value)),
            }
        }
        Self::Record(out)
    }

    pub fn opaque(text: impl Into<String>) -> Self {
        Self::Opaque(text.into())
    }

    /// Runtime type tag, compared against a cache's configured key type.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::String(_) => KeyType::String,
            Self::Number(_) => KeyType::Number,
            Self::Boolean(_) => KeyType::Boolean,
            Self::Undefined => KeyType::Undefined,
            Self::Null | Self::Record(_) | Self::Sequence(_) | Self::Opaque(_) => KeyType::Object,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            // Every JSON number has an f64 reading; large integers lose precision
            // exactly as they would in a double-based host.
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
