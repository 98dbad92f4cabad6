//! Metadata walk over an unlowered body.
//!
//! Records the oracle type of every `return` value (outside lambdas) and
//! every local declared in the body, marking locals that are written to
//! after declaration. Writes resolve against the locals visible at that
//! point, so a local in one block is never confused with a same-named local
//! of a sibling block.

use retarget_model::{BodyVariable, VariableType};
use retarget_syntax::{
    Argument, ArgumentModifier, Body, Expr, InterpolationPart, LambdaBody, NodeId,
    SemanticModel, Stmt, VariableDeclaration,
};

pub(crate) struct BodyScan<'a> {
    semantic: &'a dyn SemanticModel,
    returns: Vec<VariableType>,
    variables: Vec<BodyVariable>,
    /// Indices into `variables` currently in scope, innermost last.
    visible: Vec<usize>,
    lambda_depth: usize,
}

impl<'a> BodyScan<'a> {
    pub(crate) fn new(semantic: &'a dyn SemanticModel) -> Self {
        Self {
            semantic,
            returns: Vec::new(),
            variables: Vec::new(),
            visible: Vec::new(),
            lambda_depth: 0,
        }
    }

    /// `returns_value` makes an expression body count as a return site.
    pub(crate) fn scan_body(&mut self, body: &Body, returns_value: bool) {
        match body {
            Body::Block { statements } => self.stmts(statements),
            Body::Expression { expr } => {
                if returns_value {
                    self.record_return(expr);
                }
                self.expr(expr);
            }
        }
    }

    pub(crate) fn finish(self) -> (Vec<VariableType>, Vec<BodyVariable>) {
        (self.returns, self.variables)
    }

    fn record_return(&mut self, value: &Expr) {
        if self.lambda_depth > 0 {
            return;
        }
        if let Some(ty) = self.semantic.type_of(value.id()) {
            self.returns.push(VariableType::from_syntax(ty));
        }
    }

    fn declare(&mut self, name: &str, ty: Option<VariableType>) {
        let occurrence = self.variables.iter().filter(|v| v.name == name).count();
        self.visible.push(self.variables.len());
        self.variables.push(BodyVariable {
            name: name.to_string(),
            occurrence,
            ty,
            reassigned: false,
        });
    }

    /// Run `f` in a nested scope; locals it declares go out of view after.
    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        let mark = self.visible.len();
        f(self);
        self.visible.truncate(mark);
    }

    fn declare_from(&mut self, declaration: &VariableDeclaration) {
        for declarator in &declaration.declarators {
            let ty = self.local_type(declaration.ty.as_ref(), declarator.id);
            self.declare(&declarator.name, ty);
            if let Some(init) = &declarator.init {
                self.expr(init);
            }
        }
    }

    /// Written type, or the oracle's answer for `var`.
    fn local_type(
        &self,
        written: Option<&retarget_syntax::TypeSyntax>,
        id: NodeId,
    ) -> Option<VariableType> {
        match written {
            Some(ty) if !ty.is_implicit() => Some(VariableType::from_syntax(ty)),
            _ => self.semantic.type_of(id).map(VariableType::from_syntax),
        }
    }

    fn mark_reassigned(&mut self, target: &Expr) {
        let Expr::Identifier { name, .. } = target else {
            return;
        };
        let found = self
            .visible
            .iter()
            .rev()
            .copied()
            .find(|&i| &self.variables[i].name == name);
        if let Some(index) = found {
            self.variables[index].reassigned = true;
        }
    }

    fn stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression { expr, .. } => self.expr(expr),
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.record_return(value);
                    self.expr(value);
                }
            }
            Stmt::LocalDeclaration { declaration, .. } => self.declare_from(declaration),
            Stmt::Switch {
                subject, sections, ..
            } => {
                self.expr(subject);
                self.scoped(|this| {
                    for section in sections {
                        this.stmts(&section.statements);
                    }
                });
            }
            Stmt::Block { statements, .. } => self.scoped(|this| this.stmts(statements)),
            Stmt::Throw { value, .. } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            Stmt::If {
                condition,
                then,
                otherwise,
                ..
            } => {
                self.expr(condition);
                self.stmt(then);
                if let Some(otherwise) = otherwise {
                    self.stmt(otherwise);
                }
            }
            Stmt::For {
                declaration,
                initializers,
                condition,
                incrementors,
                body,
                ..
            } => self.scoped(|this| {
                if let Some(declaration) = declaration {
                    this.declare_from(declaration);
                }
                initializers.iter().for_each(|e| this.expr(e));
                if let Some(condition) = condition {
                    this.expr(condition);
                }
                incrementors.iter().for_each(|e| this.expr(e));
                this.stmt(body);
            }),
            Stmt::While {
                condition, body, ..
            }
            | Stmt::Do {
                condition, body, ..
            } => {
                self.expr(condition);
                self.stmt(body);
            }
            Stmt::ForEach {
                id,
                ty,
                name,
                iterable,
                body,
            } => {
                self.expr(iterable);
                let ty = self.local_type(ty.as_ref(), *id);
                self.scoped(|this| {
                    this.declare(name, ty);
                    this.stmt(body);
                });
            }
            Stmt::Try {
                block,
                catches,
                finally,
                ..
            } => {
                self.scoped(|this| this.stmts(block));
                for catch in catches {
                    self.scoped(|this| {
                        if let Some(name) = &catch.name {
                            let ty = catch.ty.as_ref().map(VariableType::from_syntax);
                            this.declare(name, ty);
                        }
                        this.stmts(&catch.block);
                    });
                }
                if let Some(finally) = finally {
                    self.scoped(|this| this.stmts(finally));
                }
            }
            Stmt::Lock { target, body, .. } => {
                self.expr(target);
                self.stmt(body);
            }
            Stmt::Using {
                declaration,
                target,
                body,
                ..
            } => self.scoped(|this| {
                if let Some(declaration) = declaration {
                    this.declare_from(declaration);
                }
                if let Some(target) = target {
                    this.expr(target);
                }
                this.stmt(body);
            }),
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty { .. } | Stmt::Other { .. } => {}
        }
    }

    fn args(&mut self, args: &[Argument]) {
        for arg in args {
            match (&arg.modifier, &arg.expr) {
                (ArgumentModifier::Out, Expr::Declaration { id, ty, name }) => {
                    let ty = self.local_type(ty.as_ref(), *id);
                    self.declare(name, ty);
                }
                (ArgumentModifier::Out | ArgumentModifier::Ref, target) => {
                    self.mark_reassigned(target);
                    self.expr(target);
                }
                (_, expr) => self.expr(expr),
            }
        }
    }

    fn lambda(&mut self, body: &LambdaBody) {
        self.lambda_depth += 1;
        self.scoped(|this| match body {
            LambdaBody::Block { statements } => this.stmts(statements),
            LambdaBody::Expression { expr } => this.expr(expr),
        });
        self.lambda_depth -= 1;
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Assignment { target, value, .. } => {
                self.mark_reassigned(target);
                self.expr(target);
                self.expr(value);
            }
            Expr::PrefixUnary { op, operand, .. } | Expr::PostfixUnary { op, operand, .. } => {
                if op.mutates() {
                    self.mark_reassigned(operand);
                }
                self.expr(operand);
            }
            Expr::ObjectCreation {
                args, initializer, ..
            } => {
                self.args(args);
                if let Some(init) = initializer {
                    self.expr(init);
                }
            }
            Expr::MemberAccess { target, .. } => self.expr(target),
            Expr::Invocation { target, args, .. } => {
                self.expr(target);
                self.args(args);
            }
            Expr::ElementAccess { target, args, .. } => {
                self.expr(target);
                self.args(args);
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::SimpleLambda { body, .. } | Expr::ParenthesizedLambda { body, .. } => {
                self.lambda(body)
            }
            Expr::Conditional {
                condition,
                when_true,
                when_false,
                ..
            } => {
                self.expr(condition);
                self.expr(when_true);
                self.expr(when_false);
            }
            Expr::Cast { operand, .. }
            | Expr::Parenthesized { inner: operand, .. }
            | Expr::Await { operand, .. } => self.expr(operand),
            Expr::ConditionalAccess {
                target,
                when_not_null,
                ..
            } => {
                self.expr(target);
                self.expr(when_not_null);
            }
            Expr::InterpolatedString { parts, .. } => {
                for part in parts {
                    if let InterpolationPart::Expression { expr, .. } = part {
                        self.expr(expr);
                    }
                }
            }
            Expr::Tuple { elements, .. } => self.args(elements),
            Expr::Initializer { elements, .. } => elements.iter().for_each(|e| self.expr(e)),
            Expr::ArrayCreation {
                sizes, initializer, ..
            } => {
                sizes.iter().for_each(|e| self.expr(e));
                if let Some(init) = initializer {
                    self.expr(init);
                }
            }
            Expr::ImplicitArrayCreation { initializer, .. } => self.expr(initializer),
            Expr::Declaration { id, ty, name } => {
                let ty = self.local_type(ty.as_ref(), *id);
                self.declare(name, ty);
            }
            Expr::Identifier { .. }
            | Expr::This { .. }
            | Expr::Literal { .. }
            | Expr::GenericName { .. }
            | Expr::MemberBinding { .. }
            | Expr::Default { .. }
            | Expr::PredefinedType { .. }
            | Expr::Base { .. }
            | Expr::TypeOf { .. }
            | Expr::QualifiedName { .. }
            | Expr::Other { .. } => {}
        }
    }
}
