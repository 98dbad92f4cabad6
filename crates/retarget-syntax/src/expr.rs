//! Expression syntax.

use crate::node::NodeId;
use crate::stmt::Stmt;
use crate::types::TypeSyntax;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Numeric,
    String,
    Char,
    True,
    False,
    Null,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Coalesce,
    Is,
    As,
}

impl BinaryOp {
    /// Source-language operator token.
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Coalesce => "??",
            BinaryOp::Is => "is",
            BinaryOp::As => "as",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }

    pub fn mutates(self) -> bool {
        matches!(self, UnaryOp::Increment | UnaryOp::Decrement)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    #[default]
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Coalesce,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::Coalesce => "??=",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentModifier {
    #[default]
    None,
    In,
    Out,
    Ref,
}

/// Call argument. `out`/`ref` arguments are what the hoisting protocol exists for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    pub modifier: ArgumentModifier,
    pub expr: Expr,
}

impl Argument {
    pub fn value(expr: Expr) -> Self {
        Self {
            modifier: ArgumentModifier::None,
            expr,
        }
    }

    pub fn out(expr: Expr) -> Self {
        Self {
            modifier: ArgumentModifier::Out,
            expr,
        }
    }

    pub fn by_ref(expr: Expr) -> Self {
        Self {
            modifier: ArgumentModifier::Ref,
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaParam {
    pub name: String,
    #[serde(default)]
    pub ty: Option<TypeSyntax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LambdaBody {
    Block { statements: Vec<Stmt> },
    Expression { expr: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolationPart {
    Text {
        text: String,
    },
    Expression {
        expr: Expr,
        #[serde(default)]
        format: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializerShape {
    Object,
    Collection,
    Array,
    /// `{ key, value }` element inside a collection initializer.
    Complex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Assignment {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Identifier {
        #[serde(default)]
        id: NodeId,
        name: String,
    },
    ObjectCreation {
        #[serde(default)]
        id: NodeId,
        ty: TypeSyntax,
        #[serde(default)]
        args: Vec<Argument>,
        #[serde(default)]
        initializer: Option<Box<Expr>>,
    },
    /// `target.name`; `name` is an identifier or generic name.
    MemberAccess {
        #[serde(default)]
        id: NodeId,
        target: Box<Expr>,
        name: Box<Expr>,
    },
    Invocation {
        #[serde(default)]
        id: NodeId,
        target: Box<Expr>,
        #[serde(default)]
        args: Vec<Argument>,
    },
    This {
        #[serde(default)]
        id: NodeId,
    },
    Literal {
        #[serde(default)]
        id: NodeId,
        literal: LiteralKind,
        text: String,
    },
    Binary {
        #[serde(default)]
        id: NodeId,
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    GenericName {
        #[serde(default)]
        id: NodeId,
        name: String,
        type_args: Vec<TypeSyntax>,
    },
    SimpleLambda {
        #[serde(default)]
        id: NodeId,
        param: LambdaParam,
        body: LambdaBody,
    },
    ParenthesizedLambda {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        params: Vec<LambdaParam>,
        body: LambdaBody,
    },
    Conditional {
        #[serde(default)]
        id: NodeId,
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Cast {
        #[serde(default)]
        id: NodeId,
        ty: TypeSyntax,
        operand: Box<Expr>,
    },
    /// `target?.rest` where `rest` starts with a member binding.
    ConditionalAccess {
        #[serde(default)]
        id: NodeId,
        target: Box<Expr>,
        when_not_null: Box<Expr>,
    },
    MemberBinding {
        #[serde(default)]
        id: NodeId,
        name: Box<Expr>,
    },
    PrefixUnary {
        #[serde(default)]
        id: NodeId,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    PostfixUnary {
        #[serde(default)]
        id: NodeId,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    ElementAccess {
        #[serde(default)]
        id: NodeId,
        target: Box<Expr>,
        args: Vec<Argument>,
    },
    InterpolatedString {
        #[serde(default)]
        id: NodeId,
        parts: Vec<InterpolationPart>,
    },
    Default {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        ty: Option<TypeSyntax>,
    },
    PredefinedType {
        #[serde(default)]
        id: NodeId,
        name: String,
    },
    Tuple {
        #[serde(default)]
        id: NodeId,
        elements: Vec<Argument>,
    },
    Initializer {
        #[serde(default)]
        id: NodeId,
        shape: InitializerShape,
        #[serde(default)]
        elements: Vec<Expr>,
    },
    Base {
        #[serde(default)]
        id: NodeId,
    },
    Parenthesized {
        #[serde(default)]
        id: NodeId,
        inner: Box<Expr>,
    },
    ArrayCreation {
        #[serde(default)]
        id: NodeId,
        element: TypeSyntax,
        #[serde(default)]
        sizes: Vec<Expr>,
        #[serde(default)]
        initializer: Option<Box<Expr>>,
    },
    TypeOf {
        #[serde(default)]
        id: NodeId,
        ty: TypeSyntax,
    },
    QualifiedName {
        #[serde(default)]
        id: NodeId,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Await {
        #[serde(default)]
        id: NodeId,
        operand: Box<Expr>,
    },
    ImplicitArrayCreation {
        #[serde(default)]
        id: NodeId,
        initializer: Box<Expr>,
    },
    /// `out var x` / `out int x` inside an argument list.
    Declaration {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        ty: Option<TypeSyntax>,
        name: String,
    },
    /// Expression syntax outside the supported subset.
    Other {
        #[serde(default)]
        id: NodeId,
        syntax: String,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        *self.id_ref()
    }

    fn id_ref(&self) -> &NodeId {
        match self {
            Expr::Assignment { id, .. }
            | Expr::Identifier { id, .. }
            | Expr::ObjectCreation { id, .. }
            | Expr::MemberAccess { id, .. }
            | Expr::Invocation { id, .. }
            | Expr::This { id }
            | Expr::Literal { id, .. }
            | Expr::Binary { id, .. }
            | Expr::GenericName { id, .. }
            | Expr::SimpleLambda { id, .. }
            | Expr::ParenthesizedLambda { id, .. }
            | Expr::Conditional { id, .. }
            | Expr::Cast { id, .. }
            | Expr::ConditionalAccess { id, .. }
            | Expr::MemberBinding { id, .. }
            | Expr::PrefixUnary { id, .. }
            | Expr::PostfixUnary { id, .. }
            | Expr::ElementAccess { id, .. }
            | Expr::InterpolatedString { id, .. }
            | Expr::Default { id, .. }
            | Expr::PredefinedType { id, .. }
            | Expr::Tuple { id, .. }
            | Expr::Initializer { id, .. }
            | Expr::Base { id }
            | Expr::Parenthesized { id, .. }
            | Expr::ArrayCreation { id, .. }
            | Expr::TypeOf { id, .. }
            | Expr::QualifiedName { id, .. }
            | Expr::Await { id, .. }
            | Expr::ImplicitArrayCreation { id, .. }
            | Expr::Declaration { id, .. }
            | Expr::Other { id, .. } => id,
        }
    }

    fn id_mut(&mut self) -> &mut NodeId {
        match self {
            Expr::Assignment { id, .. }
            | Expr::Identifier { id, .. }
            | Expr::ObjectCreation { id, .. }
            | Expr::MemberAccess { id, .. }
            | Expr::Invocation { id, .. }
            | Expr::This { id }
            | Expr::Literal { id, .. }
            | Expr::Binary { id, .. }
            | Expr::GenericName { id, .. }
            | Expr::SimpleLambda { id, .. }
            | Expr::ParenthesizedLambda { id, .. }
            | Expr::Conditional { id, .. }
            | Expr::Cast { id, .. }
            | Expr::ConditionalAccess { id, .. }
            | Expr::MemberBinding { id, .. }
            | Expr::PrefixUnary { id, .. }
            | Expr::PostfixUnary { id, .. }
            | Expr::ElementAccess { id, .. }
            | Expr::InterpolatedString { id, .. }
            | Expr::Default { id, .. }
            | Expr::PredefinedType { id, .. }
            | Expr::Tuple { id, .. }
            | Expr::Initializer { id, .. }
            | Expr::Base { id }
            | Expr::Parenthesized { id, .. }
            | Expr::ArrayCreation { id, .. }
            | Expr::TypeOf { id, .. }
            | Expr::QualifiedName { id, .. }
            | Expr::Await { id, .. }
            | Expr::ImplicitArrayCreation { id, .. }
            | Expr::Declaration { id, .. }
            | Expr::Other { id, .. } => id,
        }
    }

    /// Attach an oracle id to a hand-built node.
    pub fn with_id(mut self, id: u32) -> Self {
        *self.id_mut() = NodeId(id);
        self
    }

    pub fn kind_name(&self) -> &str {
        match self {
            Expr::Assignment { .. } => "assignment",
            Expr::Identifier { .. } => "identifier",
            Expr::ObjectCreation { .. } => "object_creation",
            Expr::MemberAccess { .. } => "member_access",
            Expr::Invocation { .. } => "invocation",
            Expr::This { .. } => "this",
            Expr::Literal { .. } => "literal",
            Expr::Binary { .. } => "binary",
            Expr::GenericName { .. } => "generic_name",
            Expr::SimpleLambda { .. } => "simple_lambda",
            Expr::ParenthesizedLambda { .. } => "parenthesized_lambda",
            Expr::Conditional { .. } => "conditional",
            Expr::Cast { .. } => "cast",
            Expr::ConditionalAccess { .. } => "conditional_access",
            Expr::MemberBinding { .. } => "member_binding",
            Expr::PrefixUnary { .. } => "prefix_unary",
            Expr::PostfixUnary { .. } => "postfix_unary",
            Expr::ElementAccess { .. } => "element_access",
            Expr::InterpolatedString { .. } => "interpolated_string",
            Expr::Default { .. } => "default",
            Expr::PredefinedType { .. } => "predefined_type",
            Expr::Tuple { .. } => "tuple",
            Expr::Initializer { .. } => "initializer",
            Expr::Base { .. } => "base",
            Expr::Parenthesized { .. } => "parenthesized",
            Expr::ArrayCreation { .. } => "array_creation",
            Expr::TypeOf { .. } => "typeof",
            Expr::QualifiedName { .. } => "qualified_name",
            Expr::Await { .. } => "await",
            Expr::ImplicitArrayCreation { .. } => "implicit_array_creation",
            Expr::Declaration { .. } => "declaration_expression",
            Expr::Other { syntax, .. } => syntax,
        }
    }

    // Builders, mostly for tests and hand-built trees.

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier {
            id: NodeId::NONE,
            name: name.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Expr::Literal {
            id: NodeId::NONE,
            literal: LiteralKind::Numeric,
            text: text.into(),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expr::Literal {
            id: NodeId::NONE,
            literal: LiteralKind::String,
            text: text.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal {
            id: NodeId::NONE,
            literal: if value {
                LiteralKind::True
            } else {
                LiteralKind::False
            },
            text: value.to_string(),
        }
    }

    pub fn this() -> Self {
        Expr::This { id: NodeId::NONE }
    }

    pub fn member(target: Expr, name: impl Into<String>) -> Self {
        Expr::MemberAccess {
            id: NodeId::NONE,
            target: Box::new(target),
            name: Box::new(Expr::ident(name)),
        }
    }

    pub fn call(target: Expr, args: Vec<Argument>) -> Self {
        Expr::Invocation {
            id: NodeId::NONE,
            target: Box::new(target),
            args,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assignment {
            id: NodeId::NONE,
            op: AssignOp::Assign,
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            id: NodeId::NONE,
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn new_object(ty: TypeSyntax, args: Vec<Argument>) -> Self {
        Expr::ObjectCreation {
            id: NodeId::NONE,
            ty,
            args,
            initializer: None,
        }
    }

    pub fn declaration(name: impl Into<String>) -> Self {
        Expr::Declaration {
            id: NodeId::NONE,
            ty: None,
            name: name.into(),
        }
    }

    pub fn other(syntax: impl Into<String>) -> Self {
        Expr::Other {
            id: NodeId::NONE,
            syntax: syntax.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_id_sets_nested_variant() {
        let e = Expr::member(Expr::this(), "Count").with_id(7);
        assert_eq!(e.id(), NodeId(7));
        assert_eq!(e.kind_name(), "member_access");
    }

    #[test]
    fn json_defaults_fill_ids_and_modifiers() {
        let e: Expr = serde_json::from_str(
            r#"{
                "kind": "invocation",
                "target": {"kind": "identifier", "name": "Foo"},
                "args": [{"modifier": "out", "expr": {"kind": "identifier", "name": "x", "id": 3}}]
            }"#,
        )
        .unwrap();
        let Expr::Invocation { id, args, .. } = e else {
            panic!("expected invocation");
        };
        assert!(id.is_none());
        assert_eq!(args[0].modifier, ArgumentModifier::Out);
        assert_eq!(args[0].expr.id(), NodeId(3));
    }

    #[test]
    fn other_keeps_syntax_name() {
        let e: Expr =
            serde_json::from_str(r#"{"kind": "other", "syntax": "checked_expression"}"#).unwrap();
        assert_eq!(e.kind_name(), "checked_expression");
    }
}
