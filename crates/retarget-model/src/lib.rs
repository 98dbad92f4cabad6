//! Program IR and type mapping for retarget.
//!
//! The IR is built by discovery, normalized by conflict resolution and
//! ordering, and then walked by a target writer. Everything here is plain
//! data plus lookup tables; the passes that fill it in live in
//! `retarget-core`.
//!
//! ```text
//! Program
//! ├── rules        ignored namespaces/classes, static redirects
//! ├── type_map     backend primitive substitutions
//! └── classes[]    arena; extensions are names, resolved on use
//!     ├── variables[]   fields, properties, events
//!     └── functions[]   methods, constructors, delegate Invoke
//! ```

pub mod mapping;
pub mod program;
pub mod rules;
pub mod types;

pub use mapping::{ContainerSyntax, ImportTracker, KnownClass, KnownClasses, TypeMap, TypeMapper};
pub use program::{
    AccessType, BodyVariable, Class, ClassId, DeclarationType, Function, MemberRef, ModelError,
    Parameter, ParameterModifiers, Program, SemanticHandle, Variable, VariableKind,
};
pub use rules::Rules;
pub use types::{TypeKind, VariableType};
