//! Source syntax model for retarget.
//!
//! `retarget-syntax` describes what the external parser hands to the
//! translator: one syntax tree per source document plus a semantic oracle
//! that answers name and type questions about individual nodes. The
//! translator never re-derives identifier meaning itself.
//!
//! # Architecture
//!
//! ```text
//! External parser           retarget-syntax              retarget-core
//! ────────────────    ─────────────────────────    ─────────────────────
//! source text     ─┐   Document                 ┌─> discovery
//! type checker    ─┼─>   members: Vec<Member>  ─┼─> lowering
//! (any frontend)  ─┘     annotations (oracle)   └─> (renderers)
//! ```
//!
//! # Node identity
//!
//! Statements, expressions, declarators and base-list entries carry a
//! [`NodeId`]. The [`SemanticModel`] oracle is queried by id, so a syntax
//! tree can be built by hand in tests without any oracle at all.
//!
//! # Example
//!
//! ```ignore
//! use retarget_syntax::{ParseOptions, input::read_json};
//!
//! let mut options = ParseOptions::default();
//! options.define("TYPESCRIPT");
//! let document = read_json(&std::fs::read_to_string("Program.json")?, &options)?;
//! ```
//!
//! The JSON form is the serde representation of [`Document`]; every enum
//! is internally tagged by `kind`.

pub mod decl;
pub mod expr;
pub mod node;
pub mod registry;
pub mod semantic;
pub mod stmt;
pub mod traits;
pub mod types;

pub mod input;

// Re-exports: syntax model
pub use decl::{
    AccessorDecl, AccessorKind, BaseType, Body, ConstructorDecl, ConstructorInitializer,
    DelegateDecl, EnumMemberDecl, EventDecl, FieldDecl, InitializerTarget, Member, MethodDecl,
    NamespaceDecl, ParameterDecl, PropertyDecl, RegionDecl, TypeDecl, TypeKeyword,
};
pub use expr::{
    Argument, ArgumentModifier, AssignOp, BinaryOp, Expr, InitializerShape, InterpolationPart,
    LambdaBody, LambdaParam, LiteralKind, UnaryOp,
};
pub use node::{Document, NodeId};
pub use stmt::{CatchClause, Declarator, Stmt, SwitchLabel, SwitchSection, VariableDeclaration};
pub use types::TypeSyntax;

// Re-exports: oracle
pub use semantic::{Annotations, NoSemantics, SemanticModel, Symbol, SymbolKind};

// Re-exports: Traits
pub use traits::{ParseOptions, ReadError, Reader};

// Re-exports: Registry
pub use registry::{reader_for_extension, reader_for_language, readers, register_reader};

// Re-exports: Built-in readers
#[cfg(feature = "read-json")]
pub use input::json::{JSON_READER, JsonReader, read_json};
