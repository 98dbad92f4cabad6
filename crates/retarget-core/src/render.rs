//! Per-target rendering templates.
//!
//! The lowering engine owns dispatch, recursion and hoisting; a
//! [`Renderer`] only turns already-lowered pieces into target text. Every
//! method receives finished fragments and returns one fragment. Statement
//! templates return a single line without indentation.

use retarget_model::ContainerSyntax;
use retarget_syntax::{
    AssignOp, BinaryOp, InitializerShape, InitializerTarget, LiteralKind, UnaryOp,
};

/// Piece of an interpolated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Code {
        code: String,
        format: Option<String>,
    },
}

/// Target-language templates for every statement and expression kind the
/// engine lowers.
pub trait Renderer: ContainerSyntax + Send + Sync {
    /// One level of indentation.
    fn indent_unit(&self) -> &'static str;

    // Expressions

    fn assignment(&self, target: &str, op: AssignOp, value: &str) -> String;
    /// Instance member of the current class.
    fn this_member(&self, member: &str) -> String;
    fn static_member(&self, class: &str, member: &str) -> String;
    fn member_access(&self, target: &str, member: &str) -> String;
    /// `constructor` is set when the class has renamed constructors.
    fn object_creation(
        &self,
        ty: &str,
        constructor: Option<&str>,
        args: &[String],
        initializer: Option<&str>,
    ) -> String;
    fn invocation(&self, target: &str, args: &[String]) -> String;
    fn this_expr(&self) -> String;
    fn base_expr(&self) -> String;
    /// `text` is the raw source token; escaping is up to the target.
    fn literal(&self, kind: LiteralKind, text: &str) -> String;
    fn binary(&self, left: &str, op: BinaryOp, right: &str) -> String;
    fn generic_name(&self, name: &str, args: &[String]) -> String;
    fn lambda_parameter(&self, name: &str, ty: Option<&str>) -> String;
    /// `body` is an expression or a rendered block.
    fn lambda(&self, params: &[String], body: &str) -> String;
    fn conditional(&self, condition: &str, when_true: &str, when_false: &str) -> String;
    fn cast(&self, ty: &str, operand: &str) -> String;
    /// `rest` starts with a [`Renderer::member_binding`].
    fn conditional_access(&self, target: &str, rest: &str) -> String;
    fn member_binding(&self, member: &str) -> String;
    fn prefix_unary(&self, op: UnaryOp, operand: &str) -> String;
    fn postfix_unary(&self, op: UnaryOp, operand: &str) -> String;
    fn element_access(&self, target: &str, args: &[String]) -> String;
    fn interpolated_string(&self, parts: &[Fragment]) -> String;
    /// `default(T)` for types without a primitive default.
    fn default_value(&self, ty: Option<&str>) -> String;
    /// Type name used as an expression.
    fn type_reference(&self, ty: &str) -> String;
    fn tuple_literal(&self, elements: &[String]) -> String;
    fn initializer(&self, shape: InitializerShape, elements: &[String]) -> String;
    /// `Name = value` inside an object initializer.
    fn initializer_member(&self, name: &str, value: &str) -> String;
    fn parenthesized(&self, inner: &str) -> String;
    fn array_creation(&self, element: &str, sizes: &[String], initializer: Option<&str>) -> String;
    fn type_of(&self, ty: &str) -> String;
    fn await_expr(&self, operand: &str) -> String;
    fn implicit_array(&self, initializer: &str) -> String;
    fn declaration_expression(&self, name: &str) -> String;

    // By-reference arguments

    /// Declares the box passed in place of an `out`/`ref` argument.
    fn out_temp_declaration(&self, temp: &str, initial: Option<&str>) -> String;
    fn out_temp_argument(&self, temp: &str) -> String;
    /// Value written into the box by the callee.
    fn out_temp_value(&self, temp: &str) -> String;
    /// Read or write through a by-reference parameter of the current function.
    fn out_parameter_value(&self, parameter: &str) -> String;

    // Statements

    fn expression_statement(&self, expr: &str) -> String;
    fn return_statement(&self, value: Option<&str>) -> String;
    fn local_declaration(
        &self,
        name: &str,
        ty: Option<&str>,
        init: Option<&str>,
        mutable: bool,
    ) -> String;
    /// Declaration clause inside a `for` header, without a terminator.
    fn declaration_clause(&self, declarators: &[(String, Option<String>)]) -> String;
    fn throw_statement(&self, value: Option<&str>) -> String;
    fn break_statement(&self) -> String;
    fn continue_statement(&self) -> String;
    fn block_open(&self) -> String;
    fn block_close(&self) -> String;
    fn if_header(&self, condition: &str) -> String;
    fn else_if_header(&self, condition: &str) -> String;
    fn else_header(&self) -> String;
    fn while_header(&self, condition: &str) -> String;
    fn do_header(&self) -> String;
    fn do_footer(&self, condition: &str) -> String;
    fn for_header(
        &self,
        init: Option<&str>,
        condition: Option<&str>,
        incrementors: &[String],
    ) -> String;
    fn for_each_header(&self, name: &str, ty: Option<&str>, iterable: &str) -> String;
    fn switch_header(&self, subject: &str) -> String;
    fn case_label(&self, value: &str) -> String;
    fn default_label(&self) -> String;
    fn try_header(&self) -> String;
    fn catch_header(&self, name: Option<&str>, ty: Option<&str>) -> String;
    fn finally_header(&self) -> String;
    /// Release a `using` resource.
    fn dispose(&self, target: &str) -> String;
    /// `: base(...)` / `: this(...)` constructor chaining.
    fn constructor_chain(
        &self,
        target: InitializerTarget,
        constructor: Option<&str>,
        args: &[String],
    ) -> String;
}
