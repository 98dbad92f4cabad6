//! Statement syntax.

use crate::expr::Expr;
use crate::node::NodeId;
use crate::types::TypeSyntax;
use serde::{Deserialize, Serialize};

/// One declared name with an optional initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub init: Option<Expr>,
}

impl Declarator {
    pub fn new(name: impl Into<String>, init: Option<Expr>) -> Self {
        Self {
            id: NodeId::NONE,
            name: name.into(),
            init,
        }
    }
}

/// `int a = 1, b;` — `ty` is `None` for implicitly typed (`var`) locals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    #[serde(default)]
    pub ty: Option<TypeSyntax>,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwitchLabel {
    Case { value: Expr },
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSection {
    pub labels: Vec<SwitchLabel>,
    #[serde(default)]
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub ty: Option<TypeSyntax>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub block: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Expression {
        #[serde(default)]
        id: NodeId,
        expr: Expr,
    },
    Return {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        value: Option<Expr>,
    },
    LocalDeclaration {
        #[serde(default)]
        id: NodeId,
        declaration: VariableDeclaration,
    },
    Switch {
        #[serde(default)]
        id: NodeId,
        subject: Expr,
        #[serde(default)]
        sections: Vec<SwitchSection>,
    },
    Block {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        statements: Vec<Stmt>,
    },
    Break {
        #[serde(default)]
        id: NodeId,
    },
    Throw {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        value: Option<Expr>,
    },
    If {
        #[serde(default)]
        id: NodeId,
        condition: Expr,
        then: Box<Stmt>,
        #[serde(default)]
        otherwise: Option<Box<Stmt>>,
    },
    For {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        declaration: Option<VariableDeclaration>,
        #[serde(default)]
        initializers: Vec<Expr>,
        #[serde(default)]
        condition: Option<Expr>,
        #[serde(default)]
        incrementors: Vec<Expr>,
        body: Box<Stmt>,
    },
    While {
        #[serde(default)]
        id: NodeId,
        condition: Expr,
        body: Box<Stmt>,
    },
    Continue {
        #[serde(default)]
        id: NodeId,
    },
    ForEach {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        ty: Option<TypeSyntax>,
        name: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Try {
        #[serde(default)]
        id: NodeId,
        block: Vec<Stmt>,
        #[serde(default)]
        catches: Vec<CatchClause>,
        #[serde(default)]
        finally: Option<Vec<Stmt>>,
    },
    Lock {
        #[serde(default)]
        id: NodeId,
        target: Expr,
        body: Box<Stmt>,
    },
    /// `using (var r = ...) { }` or `using (expr) { }`.
    Using {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        declaration: Option<VariableDeclaration>,
        #[serde(default)]
        target: Option<Expr>,
        body: Box<Stmt>,
    },
    Do {
        #[serde(default)]
        id: NodeId,
        body: Box<Stmt>,
        condition: Expr,
    },
    Empty {
        #[serde(default)]
        id: NodeId,
    },
    /// Statement syntax outside the supported subset.
    Other {
        #[serde(default)]
        id: NodeId,
        syntax: String,
    },
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Expression { id, .. }
            | Stmt::Return { id, .. }
            | Stmt::LocalDeclaration { id, .. }
            | Stmt::Switch { id, .. }
            | Stmt::Block { id, .. }
            | Stmt::Break { id }
            | Stmt::Throw { id, .. }
            | Stmt::If { id, .. }
            | Stmt::For { id, .. }
            | Stmt::While { id, .. }
            | Stmt::Continue { id }
            | Stmt::ForEach { id, .. }
            | Stmt::Try { id, .. }
            | Stmt::Lock { id, .. }
            | Stmt::Using { id, .. }
            | Stmt::Do { id, .. }
            | Stmt::Empty { id }
            | Stmt::Other { id, .. } => *id,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            Stmt::Expression { .. } => "expression_statement",
            Stmt::Return { .. } => "return",
            Stmt::LocalDeclaration { .. } => "local_declaration",
            Stmt::Switch { .. } => "switch",
            Stmt::Block { .. } => "block",
            Stmt::Break { .. } => "break",
            Stmt::Throw { .. } => "throw",
            Stmt::If { .. } => "if",
            Stmt::For { .. } => "for",
            Stmt::While { .. } => "while",
            Stmt::Continue { .. } => "continue",
            Stmt::ForEach { .. } => "for_each",
            Stmt::Try { .. } => "try",
            Stmt::Lock { .. } => "lock",
            Stmt::Using { .. } => "using",
            Stmt::Do { .. } => "do",
            Stmt::Empty { .. } => "empty",
            Stmt::Other { syntax, .. } => syntax,
        }
    }

    // Builders, mostly for tests and hand-built trees.

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expression {
            id: NodeId::NONE,
            expr,
        }
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::Return {
            id: NodeId::NONE,
            value,
        }
    }

    pub fn local(ty: Option<TypeSyntax>, name: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::LocalDeclaration {
            id: NodeId::NONE,
            declaration: VariableDeclaration {
                ty,
                declarators: vec![Declarator::new(name, init)],
            },
        }
    }

    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block {
            id: NodeId::NONE,
            statements,
        }
    }

    pub fn if_stmt(condition: Expr, then: Stmt, otherwise: Option<Stmt>) -> Self {
        Stmt::If {
            id: NodeId::NONE,
            condition,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Stmt::While {
            id: NodeId::NONE,
            condition,
            body: Box::new(body),
        }
    }

    pub fn other(syntax: impl Into<String>) -> Self {
        Stmt::Other {
            id: NodeId::NONE,
            syntax: syntax.into(),
        }
    }
}
