//! Program-model builder and lowering engine for retarget.
//!
//! `retarget-core` turns parsed source documents into target-language
//! files. It is a structure-preserving translator: one class in, one file
//! out, with identifier meaning taken from the document's semantic oracle
//! rather than re-derived.
//!
//! # Architecture
//!
//! ```text
//! Documents           Pipeline                        Writers
//! ─────────────    ──────────────────────────────    ──────────────
//! Document     ─┐   reset → fold-symbols          ┌─> TypeScript
//! TextSource   ─┼─> discover → resolve → sort  ───┼─> (future)
//! (any source) ─┘   (Program IR, frozen)          └─> ...
//!                         │
//!                         └─> LoweringEngine (scoped, hoisting)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use retarget_core::{RetargetConfig, Translator, writer_for_language};
//!
//! let writer = writer_for_language("typescript").unwrap();
//! let translator = Translator::new(writer, RetargetConfig::load(root)?);
//! let mut session = translator.session();
//! session.add_source(document);
//! for file in translator.translate(&mut session)? {
//!     std::fs::write(out.join(&file.path), file.contents)?;
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod lower;
pub mod order;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod scope;
pub mod traits;
pub mod translate;

// Re-exports: passes
pub use discovery::{DiscoveryStats, SourceUnit, discover};
pub use order::{sort_members, sort_program};
pub use resolve::{ResolveStats, resolve_class, resolve_program};

// Re-exports: lowering
pub use lower::{ExpressionResult, LowerContext, Lowered, LoweredBody, LoweringEngine};
pub use render::{Fragment, Renderer};
pub use scope::{ClassRef, Frame, ScopeMark, ScopeStack};

// Re-exports: errors and config
pub use config::{ConfigError, ParseConfig, RetargetConfig};
pub use error::{LowerError, PipelineError};

// Re-exports: pipeline
pub use pipeline::{
    Discover, DocumentSource, FoldSymbols, Pipeline, Reset, Resolve, Session, Sort, Stage,
    StageTiming, TextSource,
};
pub use translate::{OutputFile, Translator};

// Re-exports: Traits
pub use traits::{ClassOutput, Writer};

// Re-exports: Registry
pub use registry::{register_writer, writer_for_language, writers};

// Re-exports: Built-in writers
#[cfg(feature = "write-typescript")]
pub use output::TYPESCRIPT_WRITER;
#[cfg(feature = "write-typescript")]
pub use output::typescript::TypeScriptWriterImpl;
