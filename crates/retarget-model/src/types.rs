//! Type descriptors.
//!
//! A [`VariableType`] is the IR's view of a source type. Its [`TypeKind`] is
//! authoritative for container classification: mapping code switches on the
//! kind, never on the raw name.

use retarget_syntax::TypeSyntax;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    #[default]
    Unknown,
    Enum,
    Null,
    Void,
    Boolean,
    Char,
    String,
    Object,
    Array,
    List,
    Dictionary,
    Tuple,
    Callback,
    Single,
    Double,
    Decimal,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

impl TypeKind {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeKind::Single
                | TypeKind::Double
                | TypeKind::Decimal
                | TypeKind::Int8
                | TypeKind::UInt8
                | TypeKind::Int16
                | TypeKind::UInt16
                | TypeKind::Int32
                | TypeKind::UInt32
                | TypeKind::Int64
                | TypeKind::UInt64
        )
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            TypeKind::Array | TypeKind::List | TypeKind::Dictionary | TypeKind::Tuple
        )
    }

    /// Kind of a keyword or framework primitive name, if it is one.
    pub fn from_primitive_name(name: &str) -> Option<TypeKind> {
        let kind = match name {
            "bool" | "Boolean" => TypeKind::Boolean,
            "byte" | "Byte" => TypeKind::UInt8,
            "sbyte" | "SByte" => TypeKind::Int8,
            "short" | "Int16" => TypeKind::Int16,
            "ushort" | "UInt16" => TypeKind::UInt16,
            "int" | "Int32" => TypeKind::Int32,
            "uint" | "UInt32" => TypeKind::UInt32,
            "long" | "Int64" => TypeKind::Int64,
            "ulong" | "UInt64" => TypeKind::UInt64,
            "float" | "Single" => TypeKind::Single,
            "double" | "Double" => TypeKind::Double,
            "decimal" | "Decimal" => TypeKind::Decimal,
            "char" | "Char" => TypeKind::Char,
            "string" | "String" => TypeKind::String,
            "object" | "Object" | "dynamic" => TypeKind::Object,
            "void" | "Void" => TypeKind::Void,
            _ => return None,
        };
        Some(kind)
    }
}

const LIST_NAMES: &[&str] = &[
    "List",
    "IList",
    "IReadOnlyList",
    "ICollection",
    "IReadOnlyCollection",
    "IEnumerable",
];

const DICTIONARY_NAMES: &[&str] = &[
    "Dictionary",
    "IDictionary",
    "IReadOnlyDictionary",
    "SortedDictionary",
];

/// IR type descriptor.
///
/// For `Callback` types, `args` holds the parameter types and
/// `generic_args` holds the return type (empty for void).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct VariableType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<VariableType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<VariableType>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl VariableType {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void, "void")
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Object, name)
    }

    pub fn with_generic_args(mut self, args: Vec<VariableType>) -> Self {
        self.generic_args = args;
        self
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    /// Classify a type syntax node.
    pub fn from_syntax(syntax: &TypeSyntax) -> Self {
        match syntax {
            TypeSyntax::Predefined { name } => {
                let kind = TypeKind::from_primitive_name(name).unwrap_or(TypeKind::Object);
                Self::new(kind, name.as_str())
            }
            TypeSyntax::Named { name, args } | TypeSyntax::Qualified { name, args, .. } => {
                Self::from_name(name, args)
            }
            TypeSyntax::Array { element, rank } => {
                let mut ty = Self::from_syntax(element);
                for _ in 0..(*rank).max(1) {
                    ty = Self::new(TypeKind::Array, "Array").with_generic_args(vec![ty]);
                }
                ty
            }
            TypeSyntax::Nullable { inner } => {
                let mut ty = Self::from_syntax(inner);
                ty.nullable = true;
                ty
            }
            TypeSyntax::Tuple { elements } => Self::new(TypeKind::Tuple, "Tuple")
                .with_generic_args(elements.iter().map(Self::from_syntax).collect()),
            TypeSyntax::Function { params, returns } => Self {
                kind: TypeKind::Callback,
                name: "Callback".into(),
                args: params.iter().map(Self::from_syntax).collect(),
                generic_args: returns
                    .iter()
                    .map(|r| Self::from_syntax(r))
                    .filter(|r| !r.is_void())
                    .collect(),
                nullable: false,
            },
        }
    }

    fn from_name(name: &str, args: &[TypeSyntax]) -> Self {
        let generic: Vec<VariableType> = args.iter().map(Self::from_syntax).collect();

        if generic.is_empty()
            && let Some(kind) = TypeKind::from_primitive_name(name)
        {
            return Self::new(kind, name);
        }

        match name {
            "Nullable" if generic.len() == 1 => {
                let mut inner = generic.into_iter().next().unwrap_or_default();
                inner.nullable = true;
                inner
            }
            "Func" if !generic.is_empty() => {
                let mut params = generic;
                let ret = params.pop().into_iter().collect();
                Self {
                    kind: TypeKind::Callback,
                    name: name.into(),
                    args: params,
                    generic_args: ret,
                    nullable: false,
                }
            }
            "Action" => Self {
                kind: TypeKind::Callback,
                name: name.into(),
                args: generic,
                ..Self::default()
            },
            "Predicate" => Self {
                kind: TypeKind::Callback,
                name: name.into(),
                args: generic,
                generic_args: vec![Self::new(TypeKind::Boolean, "bool")],
                nullable: false,
            },
            "Tuple" | "ValueTuple" => Self::new(TypeKind::Tuple, name).with_generic_args(generic),
            n if LIST_NAMES.contains(&n) && generic.len() == 1 => {
                Self::new(TypeKind::List, n).with_generic_args(generic)
            }
            n if DICTIONARY_NAMES.contains(&n) && generic.len() == 2 => {
                Self::new(TypeKind::Dictionary, n).with_generic_args(generic)
            }
            n => Self::object(n).with_generic_args(generic),
        }
    }

    /// Default value used when a field or property has no initializer.
    pub fn default_value(&self) -> Option<&'static str> {
        if self.nullable {
            return None;
        }
        if self.kind.is_numeric() {
            Some("0")
        } else if self.kind == TypeKind::Boolean {
            Some("false")
        } else {
            None
        }
    }

    /// Source-like spelling, for diagnostics.
    pub fn display(&self) -> String {
        let mut out = self.name.clone();
        if !self.generic_args.is_empty() {
            let parts: Vec<String> = self.generic_args.iter().map(Self::display).collect();
            out = format!("{}<{}>", out, parts.join(", "));
        }
        if self.nullable {
            out.push('?');
        }
        out
    }
}
