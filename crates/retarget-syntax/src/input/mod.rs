//! Input readers - turn serialized syntax into documents.

#[cfg(feature = "read-json")]
pub mod json;

#[cfg(feature = "read-json")]
pub use json::{JSON_READER, JsonReader, read_json};
