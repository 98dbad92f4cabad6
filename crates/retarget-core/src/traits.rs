//! The target writer seam.

use crate::error::LowerError;
use crate::lower::LoweringEngine;
use crate::render::Renderer;
use retarget_model::{ClassId, KnownClasses, TypeMap};

/// A writer turns one finalized class into a source file in a target
/// language.
///
/// Writers supply the backend tables the core consumes (primitive type
/// map, known classes, preprocessor symbols) and the [`Renderer`]
/// templates the lowering engine calls into. Walking the class layout is
/// the writer's own business.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "typescript").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "ts").
    fn extension(&self) -> &'static str;

    /// Source primitive name to target name.
    fn primitive_types(&self) -> TypeMap;

    /// Symbols defined while reading documents for this target.
    fn preprocessor_symbols(&self) -> &'static [&'static str] {
        &[]
    }

    /// Source library types the target provides.
    fn known_classes(&self) -> KnownClasses {
        KnownClasses::new()
    }

    fn renderer(&self) -> &dyn Renderer;

    /// Emit a complete output file for one class.
    fn write_class(
        &self,
        engine: &LoweringEngine<'_>,
        class: ClassId,
    ) -> Result<ClassOutput, LowerError>;
}

/// A written class and the program classes it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassOutput {
    pub contents: String,
    pub referenced_classes: Vec<String>,
}
