//! Output writers - emit classes as target source files.

#[cfg(feature = "write-typescript")]
pub mod typescript;

#[cfg(feature = "write-typescript")]
pub use typescript::{TYPESCRIPT_WRITER, TypeScriptWriter, TypeScriptWriterImpl};
