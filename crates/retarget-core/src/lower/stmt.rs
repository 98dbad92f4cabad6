//! Statement dispatch.

use super::{Lowered, LowerContext, LoweringEngine};
use crate::error::LowerError;
use retarget_syntax::{
    AssignOp, Expr, LiteralKind, Stmt, SwitchLabel, SwitchSection, UnaryOp, VariableDeclaration,
};

impl LoweringEngine<'_> {
    pub fn lower_statements(
        &self,
        ctx: &mut LowerContext<'_>,
        statements: &[Stmt],
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        for stmt in statements {
            self.lower_statement(ctx, stmt, out)?;
        }
        Ok(())
    }

    pub fn lower_statement(
        &self,
        ctx: &mut LowerContext<'_>,
        stmt: &Stmt,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;
        match stmt {
            Stmt::Expression { expr, .. } => self.lower_expression_statement(ctx, expr, out)?,
            Stmt::Return { value, .. } => self.lower_return(ctx, value.as_ref(), out)?,
            Stmt::LocalDeclaration { declaration, .. } => {
                self.lower_local_declaration(ctx, declaration, out)?
            }
            Stmt::Switch {
                subject, sections, ..
            } => self.lower_switch(ctx, subject, sections, out)?,
            Stmt::Block { statements, .. } => {
                self.emit(ctx, out, r.block_open());
                self.indented(ctx, |this, ctx| this.lower_statements(ctx, statements, out))?;
                self.emit(ctx, out, r.block_close());
            }
            Stmt::Break { .. } => self.emit(ctx, out, r.break_statement()),
            Stmt::Continue { .. } => self.emit(ctx, out, r.continue_statement()),
            Stmt::Throw { value, .. } => match value {
                Some(value) => {
                    let lowered = self.lower_expression(ctx, value)?;
                    let code = self.bind(ctx, lowered, "ret", out);
                    self.emit(ctx, out, r.throw_statement(Some(&code)));
                }
                None => self.emit(ctx, out, r.throw_statement(None)),
            },
            Stmt::If {
                condition,
                then,
                otherwise,
                ..
            } => {
                let lowered = self.lower_expression(ctx, condition)?;
                let code = self.bind(ctx, lowered, "cond", out);
                self.emit(ctx, out, r.if_header(&code));
                self.lower_body(ctx, then, out)?;
                self.lower_else(ctx, otherwise.as_deref(), out)?;
                self.emit(ctx, out, r.block_close());
            }
            Stmt::For {
                declaration,
                initializers,
                condition,
                incrementors,
                body,
                ..
            } => self.lower_for(
                ctx,
                declaration.as_ref(),
                initializers,
                condition.as_ref(),
                incrementors,
                body,
                out,
            )?,
            Stmt::While {
                condition, body, ..
            } => {
                let lowered = self.lower_expression(ctx, condition)?;
                if lowered.result.hoists() {
                    self.lower_loop_with_exit(ctx, lowered, body, false, out)?;
                } else {
                    self.emit(ctx, out, r.while_header(&lowered.code));
                    self.lower_body(ctx, body, out)?;
                    self.emit(ctx, out, r.block_close());
                }
            }
            Stmt::Do {
                body, condition, ..
            } => {
                let lowered = self.lower_expression(ctx, condition)?;
                if lowered.result.hoists() {
                    self.lower_loop_with_exit(ctx, lowered, body, true, out)?;
                } else {
                    self.emit(ctx, out, r.do_header());
                    self.lower_body(ctx, body, out)?;
                    self.emit(ctx, out, r.do_footer(&lowered.code));
                }
            }
            Stmt::ForEach {
                ty,
                name,
                iterable,
                body,
                ..
            } => {
                let lowered = self.lower_expression(ctx, iterable)?;
                let code = self.bind(ctx, lowered, "iter", out);
                ctx.declare(name);
                let ty = ty
                    .as_ref()
                    .filter(|t| !t.is_implicit())
                    .map(|t| self.map_syntax(ctx, t));
                self.emit(ctx, out, r.for_each_header(name, ty.as_deref(), &code));
                self.lower_body(ctx, body, out)?;
                self.emit(ctx, out, r.block_close());
            }
            Stmt::Try {
                block,
                catches,
                finally,
                ..
            } => {
                self.emit(ctx, out, r.try_header());
                self.indented(ctx, |this, ctx| this.lower_statements(ctx, block, out))?;
                for catch in catches {
                    if let Some(name) = &catch.name {
                        ctx.declare(name);
                    }
                    let ty = catch.ty.as_ref().map(|t| self.map_syntax(ctx, t));
                    self.emit(ctx, out, r.catch_header(catch.name.as_deref(), ty.as_deref()));
                    self.indented(ctx, |this, ctx| {
                        this.lower_statements(ctx, &catch.block, out)
                    })?;
                }
                if let Some(finally) = finally {
                    self.emit(ctx, out, r.finally_header());
                    self.indented(ctx, |this, ctx| this.lower_statements(ctx, finally, out))?;
                }
                self.emit(ctx, out, r.block_close());
            }
            // Single-threaded target: the body runs in a plain block. The
            // target is still evaluated once unless it is a plain reference.
            Stmt::Lock { target, body, .. } => {
                if !is_plain_reference(target) {
                    self.lower_expression_statement(ctx, target, out)?;
                }
                self.emit(ctx, out, r.block_open());
                self.lower_body(ctx, body, out)?;
                self.emit(ctx, out, r.block_close());
            }
            Stmt::Using {
                declaration,
                target,
                body,
                ..
            } => self.lower_using(ctx, declaration.as_ref(), target.as_ref(), body, out)?,
            Stmt::Empty { .. } => {}
            Stmt::Other { id, syntax } => return Err(self.unsupported(ctx, syntax, *id)),
        }
        Ok(())
    }

    pub(crate) fn lower_expression_statement(
        &self,
        ctx: &mut LowerContext<'_>,
        expr: &Expr,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let Lowered { code, result } = self.lower_expression(ctx, expr)?;
        if !result.processed {
            return Ok(());
        }
        let line = self.renderer.expression_statement(&code);
        self.splice(ctx, out, result, line);
        Ok(())
    }

    pub(crate) fn lower_return(
        &self,
        ctx: &mut LowerContext<'_>,
        value: Option<&Expr>,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let line = match value {
            Some(value) => {
                let lowered = self.lower_expression(ctx, value)?;
                let code = self.bind(ctx, lowered, "ret", out);
                self.renderer.return_statement(Some(&code))
            }
            None => self.renderer.return_statement(None),
        };
        self.emit(ctx, out, line);
        Ok(())
    }

    fn lower_local_declaration(
        &self,
        ctx: &mut LowerContext<'_>,
        declaration: &VariableDeclaration,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let ty = declaration
            .ty
            .as_ref()
            .filter(|t| !t.is_implicit())
            .map(|t| self.map_syntax(ctx, t));
        for declarator in &declaration.declarators {
            let init = declarator
                .init
                .as_ref()
                .map(|init| self.lower_expression(ctx, init))
                .transpose()?;
            let reassigned = self.declare_local(ctx, &declarator.name);
            let mutable = init.is_none() || reassigned;
            let (code, result) = match init {
                Some(Lowered { code, result }) => (Some(code), result),
                None => (None, Default::default()),
            };
            let line = self.renderer.local_declaration(
                &declarator.name,
                ty.as_deref(),
                code.as_deref(),
                mutable,
            );
            self.splice(ctx, out, result, line);
        }
        Ok(())
    }

    fn lower_switch(
        &self,
        ctx: &mut LowerContext<'_>,
        subject: &Expr,
        sections: &[SwitchSection],
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;
        let lowered = self.lower_expression(ctx, subject)?;
        let code = self.bind(ctx, lowered, "cond", out);
        self.emit(ctx, out, r.switch_header(&code));
        self.indented(ctx, |this, ctx| {
            for section in sections {
                for label in &section.labels {
                    let line = match label {
                        SwitchLabel::Case { value } => {
                            let lowered = this.lower_expression(ctx, value)?;
                            if lowered.result.hoists() {
                                return Err(LowerError::UnsupportedHoist {
                                    construct: "case label",
                                    context: ctx.location.clone(),
                                });
                            }
                            r.case_label(&lowered.code)
                        }
                        SwitchLabel::Default => r.default_label(),
                    };
                    this.emit(ctx, out, line);
                }
                this.indented(ctx, |this, ctx| {
                    this.lower_statements(ctx, &section.statements, out)
                })?;
            }
            Ok(())
        })?;
        self.emit(ctx, out, r.block_close());
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn lower_for(
        &self,
        ctx: &mut LowerContext<'_>,
        declaration: Option<&VariableDeclaration>,
        initializers: &[Expr],
        condition: Option<&Expr>,
        incrementors: &[Expr],
        body: &Stmt,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;

        // Initializers run once, so `before` lines can move ahead of the loop.
        let mut init = None;
        if let Some(declaration) = declaration {
            let mut declarators = Vec::new();
            for declarator in &declaration.declarators {
                ctx.declare(&declarator.name);
                let value = match &declarator.init {
                    Some(expr) => Some(self.for_clause(ctx, expr, "for initializer", out)?),
                    None => None,
                };
                declarators.push((declarator.name.clone(), value));
            }
            init = Some(r.declaration_clause(&declarators));
        } else if !initializers.is_empty() {
            let mut parts = Vec::new();
            for expr in initializers {
                parts.push(self.for_clause(ctx, expr, "for initializer", out)?);
            }
            init = Some(parts.join(", "));
        }

        let condition = match condition {
            Some(expr) => Some(self.for_header_part(ctx, expr, "for condition")?),
            None => None,
        };
        let mut steps = Vec::new();
        for expr in incrementors {
            steps.push(self.for_header_part(ctx, expr, "for incrementor")?);
        }

        self.emit(
            ctx,
            out,
            r.for_header(init.as_deref(), condition.as_deref(), &steps),
        );
        self.lower_body(ctx, body, out)?;
        self.emit(ctx, out, r.block_close());
        Ok(())
    }

    fn for_clause(
        &self,
        ctx: &mut LowerContext<'_>,
        expr: &Expr,
        construct: &'static str,
        out: &mut Vec<String>,
    ) -> Result<String, LowerError> {
        let Lowered { code, result } = self.lower_expression(ctx, expr)?;
        if !result.after.is_empty() {
            return Err(LowerError::UnsupportedHoist {
                construct,
                context: ctx.location.clone(),
            });
        }
        for line in result.before {
            self.emit(ctx, out, line);
        }
        Ok(code)
    }

    fn for_header_part(
        &self,
        ctx: &mut LowerContext<'_>,
        expr: &Expr,
        construct: &'static str,
    ) -> Result<String, LowerError> {
        let lowered = self.lower_expression(ctx, expr)?;
        if lowered.result.hoists() {
            return Err(LowerError::UnsupportedHoist {
                construct,
                context: ctx.location.clone(),
            });
        }
        Ok(lowered.code)
    }

    /// `while (true)` form for loops whose condition hoists lines.
    ///
    /// A `while` loop tests at the top. A `do` loop skips the test on the
    /// first pass through a `first_N` flag, so `continue` in the body still
    /// reaches the condition:
    ///
    /// ```text
    /// let first_1 = true;
    /// while (true) {
    ///   if (!first_1) {
    ///     <condition, break when false>
    ///   }
    ///   first_1 = false;
    ///   <body>
    /// }
    /// ```
    fn lower_loop_with_exit(
        &self,
        ctx: &mut LowerContext<'_>,
        condition: Lowered,
        body: &Stmt,
        test_last: bool,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;
        let first = test_last.then(|| ctx.temp("first"));
        if let Some(first) = &first {
            let init = r.literal(LiteralKind::True, "true");
            self.emit(ctx, out, r.local_declaration(first, None, Some(&init), true));
        }
        let always = r.literal(LiteralKind::True, "true");
        self.emit(ctx, out, r.while_header(&always));
        self.indented(ctx, |this, ctx| {
            match &first {
                Some(first) => {
                    let skip = r.prefix_unary(UnaryOp::Not, first);
                    this.emit(ctx, out, r.if_header(&skip));
                    this.indented(ctx, |this, ctx| {
                        this.exit_unless(ctx, condition, out);
                        Ok(())
                    })?;
                    this.emit(ctx, out, r.block_close());
                    let done = r.literal(LiteralKind::False, "false");
                    let line = r.expression_statement(&r.assignment(first, AssignOp::Assign, &done));
                    this.emit(ctx, out, line);
                }
                None => this.exit_unless(ctx, condition, out),
            }
            this.lower_statements(ctx, body_statements(body), out)
        })?;
        self.emit(ctx, out, r.block_close());
        Ok(())
    }

    /// `<hoisted condition>; if (!(cond)) { break; }`
    fn exit_unless(&self, ctx: &mut LowerContext<'_>, condition: Lowered, out: &mut Vec<String>) {
        let r = self.renderer;
        let code = self.bind(ctx, condition, "cond", out);
        let negated = r.prefix_unary(UnaryOp::Not, &r.parenthesized(&code));
        self.emit(ctx, out, r.if_header(&negated));
        ctx.depth += 1;
        self.emit(ctx, out, r.break_statement());
        ctx.depth -= 1;
        self.emit(ctx, out, r.block_close());
    }

    fn lower_using(
        &self,
        ctx: &mut LowerContext<'_>,
        declaration: Option<&VariableDeclaration>,
        target: Option<&Expr>,
        body: &Stmt,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;
        self.emit(ctx, out, r.block_open());
        self.indented(ctx, |this, ctx| {
            let mut resources = Vec::new();
            if let Some(declaration) = declaration {
                this.lower_local_declaration(ctx, declaration, out)?;
                resources.extend(declaration.declarators.iter().map(|d| d.name.clone()));
            } else if let Some(target) = target {
                let Lowered { code, result } = this.lower_expression(ctx, target)?;
                let temp = ctx.temp("using");
                let line = r.local_declaration(&temp, None, Some(&code), false);
                this.splice(ctx, out, result, line);
                resources.push(temp);
            }

            this.emit(ctx, out, r.try_header());
            this.indented(ctx, |this, ctx| {
                this.lower_statements(ctx, body_statements(body), out)
            })?;
            this.emit(ctx, out, r.finally_header());
            this.indented(ctx, |this, ctx| {
                for resource in resources.iter().rev() {
                    this.emit(ctx, out, r.dispose(resource));
                }
                Ok(())
            })?;
            this.emit(ctx, out, r.block_close());
            Ok(())
        })?;
        self.emit(ctx, out, r.block_close());
        Ok(())
    }

    fn lower_else(
        &self,
        ctx: &mut LowerContext<'_>,
        otherwise: Option<&Stmt>,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let r = self.renderer;
        let Some(otherwise) = otherwise else {
            return Ok(());
        };
        let Stmt::If {
            condition,
            then,
            otherwise: next,
            ..
        } = otherwise
        else {
            self.emit(ctx, out, r.else_header());
            return self.lower_body(ctx, otherwise, out);
        };

        let lowered = self.lower_expression(ctx, condition)?;
        if !lowered.result.hoists() {
            self.emit(ctx, out, r.else_if_header(&lowered.code));
            self.lower_body(ctx, then, out)?;
            return self.lower_else(ctx, next.as_deref(), out);
        }

        // Hoisted lines need a statement position, so nest the `if`.
        self.emit(ctx, out, r.else_header());
        self.indented(ctx, |this, ctx| {
            let code = this.bind(ctx, lowered, "cond", out);
            this.emit(ctx, out, r.if_header(&code));
            this.lower_body(ctx, then, out)?;
            this.lower_else(ctx, next.as_deref(), out)?;
            this.emit(ctx, out, r.block_close());
            Ok(())
        })
    }

    /// Statements of a body, one level deeper than the current line.
    fn lower_body(
        &self,
        ctx: &mut LowerContext<'_>,
        body: &Stmt,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        self.indented(ctx, |this, ctx| {
            this.lower_statements(ctx, body_statements(body), out)
        })
    }

    /// Emit hoisted lines for a value used by a control transfer. If the
    /// value has `after` lines it is bound to a temp first so they run
    /// before the transfer; returns the code to use in its place.
    pub(crate) fn bind(
        &self,
        ctx: &mut LowerContext<'_>,
        lowered: Lowered,
        prefix: &str,
        out: &mut Vec<String>,
    ) -> String {
        let Lowered { code, result } = lowered;
        for line in result.before {
            self.emit(ctx, out, line);
        }
        if result.after.is_empty() {
            return code;
        }
        let temp = ctx.temp(prefix);
        self.emit(
            ctx,
            out,
            self.renderer.local_declaration(&temp, None, Some(&code), false),
        );
        for line in result.after {
            self.emit(ctx, out, line);
        }
        temp
    }

    pub(crate) fn indented<T>(
        &self,
        ctx: &mut LowerContext<'_>,
        f: impl FnOnce(&Self, &mut LowerContext<'_>) -> Result<T, LowerError>,
    ) -> Result<T, LowerError> {
        ctx.depth += 1;
        let result = f(self, ctx);
        ctx.depth -= 1;
        result
    }
}

/// Names and member chains over them; evaluating one has no effect.
fn is_plain_reference(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier { .. } | Expr::This { .. } | Expr::Base { .. } | Expr::TypeOf { .. } => {
            true
        }
        Expr::MemberAccess { target, .. } | Expr::QualifiedName { left: target, .. } => {
            is_plain_reference(target)
        }
        Expr::Parenthesized { inner, .. } => is_plain_reference(inner),
        _ => false,
    }
}

fn body_statements(body: &Stmt) -> &[Stmt] {
    match body {
        Stmt::Block { statements, .. } => statements,
        other => std::slice::from_ref(other),
    }
}
