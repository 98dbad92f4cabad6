//! Semantic oracle interface.
//!
//! The oracle is trusted: it resolves what an identifier refers to and what
//! type an expression has. Consumers never re-derive either.

use crate::node::NodeId;
use crate::types::TypeSyntax;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Property,
    Event,
    Method,
    Constructor,
    Type,
    Namespace,
}

impl SymbolKind {
    /// Whether the symbol is a member of some type.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            SymbolKind::Field
                | SymbolKind::Property
                | SymbolKind::Event
                | SymbolKind::Method
                | SymbolKind::Constructor
        )
    }
}

/// What a name resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    /// Declaring type for members.
    #[serde(default)]
    pub containing_type: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    /// Parameter count of the resolved method or constructor overload.
    #[serde(default)]
    pub parameter_count: Option<usize>,
}

impl Symbol {
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            containing_type: None,
            is_static: false,
            parameter_count: None,
        }
    }

    pub fn member_of(mut self, containing_type: impl Into<String>) -> Self {
        self.containing_type = Some(containing_type.into());
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.parameter_count = Some(count);
        self
    }
}

/// Name and type resolution for the nodes of one document.
pub trait SemanticModel: Debug + Send + Sync {
    /// Resolved type of an expression, declarator or base-list entry.
    fn type_of(&self, node: NodeId) -> Option<&TypeSyntax>;

    /// Resolved symbol of a name-bearing node.
    fn symbol_of(&self, node: NodeId) -> Option<&Symbol>;
}

/// Oracle backed by precomputed tables, as shipped inside JSON documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub types: BTreeMap<NodeId, TypeSyntax>,
    #[serde(default)]
    pub symbols: BTreeMap<NodeId, Symbol>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, node: u32, ty: TypeSyntax) -> Self {
        self.types.insert(NodeId(node), ty);
        self
    }

    pub fn with_symbol(mut self, node: u32, symbol: Symbol) -> Self {
        self.symbols.insert(NodeId(node), symbol);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.symbols.is_empty()
    }
}

impl SemanticModel for Annotations {
    fn type_of(&self, node: NodeId) -> Option<&TypeSyntax> {
        if node.is_none() {
            return None;
        }
        self.types.get(&node)
    }

    fn symbol_of(&self, node: NodeId) -> Option<&Symbol> {
        if node.is_none() {
            return None;
        }
        self.symbols.get(&node)
    }
}

/// Oracle that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemantics;

impl SemanticModel for NoSemantics {
    fn type_of(&self, _node: NodeId) -> Option<&TypeSyntax> {
        None
    }

    fn symbol_of(&self, _node: NodeId) -> Option<&Symbol> {
        None
    }
}
