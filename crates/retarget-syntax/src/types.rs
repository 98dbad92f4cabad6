//! Type syntax as written in declarations, and as reported by the oracle.

use serde::{Deserialize, Serialize};

/// A type reference.
///
/// The same shape is used for declared types (fields, parameters, casts)
/// and for the resolved types the oracle reports for expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSyntax {
    /// Language keyword type: `int`, `string`, `bool`, `void`, `object`...
    Predefined { name: String },
    /// Simple or generic name: `Animal`, `List<int>`.
    Named {
        name: String,
        #[serde(default)]
        args: Vec<TypeSyntax>,
    },
    /// Dotted name: `System.Collections.Generic.List<int>`.
    Qualified {
        qualifier: String,
        name: String,
        #[serde(default)]
        args: Vec<TypeSyntax>,
    },
    Array {
        element: Box<TypeSyntax>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    Nullable { inner: Box<TypeSyntax> },
    Tuple { elements: Vec<TypeSyntax> },
    /// Function-pointer or callback syntax; `returns` absent means void.
    Function {
        #[serde(default)]
        params: Vec<TypeSyntax>,
        #[serde(default)]
        returns: Option<Box<TypeSyntax>>,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeSyntax {
    pub fn predefined(name: impl Into<String>) -> Self {
        TypeSyntax::Predefined { name: name.into() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeSyntax::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeSyntax>) -> Self {
        TypeSyntax::Named {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: TypeSyntax) -> Self {
        TypeSyntax::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    pub fn nullable(inner: TypeSyntax) -> Self {
        TypeSyntax::Nullable {
            inner: Box::new(inner),
        }
    }

    /// The unqualified name without generic arguments (`List` for
    /// `System.Collections.Generic.List<int>`). Arrays, tuples and callbacks
    /// have no simple name.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeSyntax::Predefined { name } => Some(name),
            TypeSyntax::Named { name, .. } | TypeSyntax::Qualified { name, .. } => Some(name),
            TypeSyntax::Nullable { inner } => inner.simple_name(),
            TypeSyntax::Array { .. } | TypeSyntax::Tuple { .. } | TypeSyntax::Function { .. } => {
                None
            }
        }
    }

    /// `var`-style placeholder written in place of a type.
    pub fn is_implicit(&self) -> bool {
        matches!(self, TypeSyntax::Named { name, args } if name == "var" && args.is_empty())
    }

    /// Source-language spelling, for diagnostics and extension names.
    pub fn display(&self) -> String {
        match self {
            TypeSyntax::Predefined { name } => name.clone(),
            TypeSyntax::Named { name, args } => with_args(name, args),
            TypeSyntax::Qualified {
                qualifier,
                name,
                args,
            } => format!("{}.{}", qualifier, with_args(name, args)),
            TypeSyntax::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{}]", element.display(), commas)
            }
            TypeSyntax::Nullable { inner } => format!("{}?", inner.display()),
            TypeSyntax::Tuple { elements } => {
                let parts: Vec<String> = elements.iter().map(TypeSyntax::display).collect();
                format!("({})", parts.join(", "))
            }
            TypeSyntax::Function { params, returns } => {
                let parts: Vec<String> = params.iter().map(TypeSyntax::display).collect();
                let ret = returns
                    .as_ref()
                    .map(|r| r.display())
                    .unwrap_or_else(|| "void".to_string());
                format!("({}) => {}", parts.join(", "), ret)
            }
        }
    }
}

fn with_args(name: &str, args: &[TypeSyntax]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let parts: Vec<String> = args.iter().map(TypeSyntax::display).collect();
    format!("{}<{}>", name, parts.join(", "))
}
