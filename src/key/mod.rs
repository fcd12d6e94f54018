//! Key model - key values, their type tags and canonical serialization.

mod serializer;
mod value;

pub use serializer::{serialize, write_canonical};
pub use value::{KeyType, Value};
