//! Declarations: namespaces, types and their members.

use crate::expr::{Argument, Expr};
use crate::node::NodeId;
use crate::stmt::{Declarator, Stmt};
use crate::types::TypeSyntax;
use serde::{Deserialize, Serialize};

/// A namespace-level or type-level member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
    Delegate(DelegateDecl),
    Field(FieldDecl),
    Property(PropertyDecl),
    Event(EventDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    EnumMember(EnumMemberDecl),
    /// A preprocessor region (`#if SYMBOL ... #else ... #endif`).
    Region(RegionDecl),
    /// Syntax outside the supported subset (operators, indexers, ...).
    Other { syntax: String },
}

impl Member {
    pub fn kind_name(&self) -> &str {
        match self {
            Member::Namespace(_) => "namespace",
            Member::Type(_) => "type",
            Member::Delegate(_) => "delegate",
            Member::Field(_) => "field",
            Member::Property(_) => "property",
            Member::Event(_) => "event",
            Member::Method(_) => "method",
            Member::Constructor(_) => "constructor",
            Member::EnumMember(_) => "enum_member",
            Member::Region(_) => "region",
            Member::Other { syntax } => syntax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKeyword {
    Class,
    Struct,
    Interface,
    Enum,
}

/// Entry in a type's base list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseType {
    #[serde(default)]
    pub id: NodeId,
    pub ty: TypeSyntax,
}

impl BaseType {
    pub fn new(ty: TypeSyntax) -> Self {
        Self {
            id: NodeId::NONE,
            ty,
        }
    }
}

/// Class, struct, interface or enum declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub keyword: TypeKeyword,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub bases: Vec<BaseType>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(keyword: TypeKeyword, name: impl Into<String>) -> Self {
        Self {
            keyword,
            name: name.into(),
            modifiers: Vec::new(),
            generic_params: Vec::new(),
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKeyword::Class, name)
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.modifiers = modifiers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_base(mut self, base: TypeSyntax) -> Self {
        self.bases.push(BaseType::new(base));
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParameterDecl>,
    pub returns: TypeSyntax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub ty: TypeSyntax,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

/// A `get`/`set` accessor. A missing body marks an auto-property accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub ty: TypeSyntax,
    pub name: String,
    #[serde(default)]
    pub accessors: Vec<AccessorDecl>,
    /// `int Count => items.Length;`
    #[serde(default)]
    pub expression_body: Option<Expr>,
    #[serde(default)]
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecl {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub ty: TypeSyntax,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub ty: TypeSyntax,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub default: Option<Expr>,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, ty: TypeSyntax) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Vec::new(),
            default: None,
        }
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(modifier.to_string());
        self
    }
}

/// A member body: a statement block or a single expression (`=> expr`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body {
    Block { statements: Vec<Stmt> },
    Expression { expr: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub returns: TypeSyntax,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParameterDecl>,
    #[serde(default)]
    pub body: Option<Body>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, returns: TypeSyntax) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            returns,
            generic_params: Vec::new(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.modifiers = modifiers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_param(mut self, param: ParameterDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_body(mut self, statements: Vec<Stmt>) -> Self {
        self.body = Some(Body::Block { statements });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializerTarget {
    Base,
    This,
}

/// `: base(...)` / `: this(...)` chained constructor call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInitializer {
    pub target: InitializerTarget,
    #[serde(default)]
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParameterDecl>,
    #[serde(default)]
    pub initializer: Option<ConstructorInitializer>,
    #[serde(default)]
    pub body: Option<Body>,
}

impl ConstructorDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: vec!["public".to_string()],
            params: Vec::new(),
            initializer: None,
            body: Some(Body::Block {
                statements: Vec::new(),
            }),
        }
    }

    pub fn with_param(mut self, param: ParameterDecl) -> Self {
        self.params.push(param);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    /// Raw initializer text (`= 4`), if any.
    #[serde(default)]
    pub value: Option<String>,
}

/// A conditional-compilation region. `symbol` may be negated with `!`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDecl {
    pub symbol: String,
    #[serde(default)]
    pub then: Vec<Member>,
    #[serde(default)]
    pub otherwise: Vec<Member>,
}
