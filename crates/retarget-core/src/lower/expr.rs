//! Expression dispatch and identifier resolution.

use super::{ExpressionResult, LowerContext, Lowered, LoweringEngine, MemberInfo};
use crate::error::LowerError;
use crate::render::Fragment;
use crate::scope::{ClassRef, Frame};
use retarget_model::{ClassId, TypeKind, VariableType};
use retarget_syntax::{
    Argument, ArgumentModifier, AssignOp, Expr, InitializerShape, InterpolationPart, LambdaBody,
    LambdaParam, LiteralKind, NodeId, SymbolKind, TypeSyntax,
};

impl LoweringEngine<'_> {
    /// Lower one expression. The scope stack is restored before returning.
    pub fn lower_expression(
        &self,
        ctx: &mut LowerContext<'_>,
        expr: &Expr,
    ) -> Result<Lowered, LowerError> {
        let mark = ctx.scope.mark();
        let lowered = self.expression(ctx, expr);
        ctx.scope.restore(mark);
        lowered
    }

    fn expression(&self, ctx: &mut LowerContext<'_>, expr: &Expr) -> Result<Lowered, LowerError> {
        let r = self.renderer;
        let lowered = match expr {
            Expr::Assignment {
                op, target, value, ..
            } => {
                let target = self.lower_expression(ctx, target)?;
                let value = self.lower_expression(ctx, value)?;
                let code = r.assignment(&target.code, *op, &value.code);
                let ty = target.result.ty.clone();
                combine(code, ty, [target, value])
            }
            Expr::Identifier { id, name } => self.identifier(ctx, *id, name),
            Expr::GenericName {
                id,
                name,
                type_args,
            } => {
                let base = self.identifier(ctx, *id, name);
                let args: Vec<String> = type_args.iter().map(|t| self.map_syntax(ctx, t)).collect();
                let code = r.generic_name(&base.code, &args);
                let ty = base.result.ty.clone();
                combine(code, ty, [base])
            }
            Expr::MemberAccess { id, target, name }
            | Expr::QualifiedName {
                id,
                left: target,
                right: name,
            } => self.member_access(ctx, *id, target, name)?,
            Expr::ConditionalAccess {
                id,
                target,
                when_not_null,
            } => {
                ctx.call_arity = None;
                let receiver_expr = target;
                let target = self.lower_expression(ctx, target)?;
                let receiver = self.receiver_for(ctx, receiver_expr, &target);
                let saved = ctx.binding_receiver.replace(receiver);
                let rest = self.lower_expression(ctx, when_not_null);
                ctx.binding_receiver = saved;
                let rest = rest?;
                let code = r.conditional_access(&target.code, &rest.code);
                let ty = self.type_of(ctx, *id).or_else(|| rest.result.ty.clone());
                combine(code, ty, [target, rest])
            }
            Expr::MemberBinding { id, name } => {
                let arity = ctx.call_arity.take();
                let mark = ctx.scope.mark();
                let receiver = ctx
                    .binding_receiver
                    .clone()
                    .unwrap_or_else(|| ClassRef::External(String::new()));
                ctx.scope.push(Frame::Class(receiver));
                ctx.call_arity = arity;
                let member = self.lower_expression(ctx, name);
                ctx.call_arity = None;
                ctx.scope.restore(mark);
                let member = member?;
                let code = r.member_binding(&member.code);
                let ty = self.type_of(ctx, *id).or_else(|| member.result.ty.clone());
                combine(code, ty, [member])
            }
            Expr::Invocation { id, target, args } => {
                ctx.call_arity = Some(args.len());
                let callee = self.lower_expression(ctx, target);
                ctx.call_arity = None;
                let callee = callee?;
                let mut result = callee.result.clone();
                let args = self.lower_arguments(ctx, args, &mut result)?;
                result.ty = self.type_of(ctx, *id).or(result.ty);
                Lowered {
                    code: r.invocation(&callee.code, &args),
                    result,
                }
            }
            Expr::ObjectCreation {
                id,
                ty,
                args,
                initializer,
            } => self.object_creation(ctx, *id, ty, args, initializer.as_deref())?,
            Expr::This { .. } => {
                let ty = ctx
                    .scope
                    .member_owner()
                    .map(|id| VariableType::object(self.program.class(id).name.as_str()));
                Lowered::new(r.this_expr()).typed(ty)
            }
            Expr::Base { .. } => Lowered::new(r.base_expr()),
            Expr::Literal { id, literal, text } => {
                Lowered::new(r.literal(*literal, text)).typed(self.type_of(ctx, *id))
            }
            Expr::Binary {
                id,
                op,
                left,
                right,
            } => {
                // Both operands start from the same depth.
                //
                // Hoisted lines of a short-circuit right operand (`&&`, `||`,
                // `??`) are not guarded: its `before` lines only declare temps,
                // and its `after` lines run even when the operand is skipped so
                // an `out var` declared there stays visible to the statement.
                let mark = ctx.scope.mark();
                let left = self.lower_expression(ctx, left);
                ctx.scope.restore(mark);
                let left = left?;
                let right = self.lower_expression(ctx, right);
                ctx.scope.restore(mark);
                let right = right?;
                let code = r.binary(&left.code, *op, &right.code);
                combine(code, self.type_of(ctx, *id), [left, right])
            }
            Expr::SimpleLambda { param, body, .. } => {
                self.lambda(ctx, std::slice::from_ref(param), body)?
            }
            Expr::ParenthesizedLambda { params, body, .. } => self.lambda(ctx, params, body)?,
            Expr::Conditional {
                id,
                condition,
                when_true,
                when_false,
                ..
            } => {
                let condition = self.lower_expression(ctx, condition)?;
                let when_true = self.lower_expression(ctx, when_true)?;
                let when_false = self.lower_expression(ctx, when_false)?;
                if when_true.result.hoists() || when_false.result.hoists() {
                    return Err(LowerError::UnsupportedHoist {
                        construct: "conditional branch",
                        context: ctx.location.clone(),
                    });
                }
                let code = r.conditional(&condition.code, &when_true.code, &when_false.code);
                let ty = self
                    .type_of(ctx, *id)
                    .or_else(|| when_true.result.ty.clone());
                combine(code, ty, [condition, when_true, when_false])
            }
            Expr::Cast { ty, operand, .. } => {
                let target = VariableType::from_syntax(ty);
                let mapped = self.map_type(ctx, &target);
                let operand = self.lower_expression(ctx, operand)?;
                combine(r.cast(&mapped, &operand.code), Some(target), [operand])
            }
            Expr::PrefixUnary { op, operand, .. } => {
                let operand = self.lower_expression(ctx, operand)?;
                let ty = operand.result.ty.clone();
                combine(r.prefix_unary(*op, &operand.code), ty, [operand])
            }
            Expr::PostfixUnary { op, operand, .. } => {
                let operand = self.lower_expression(ctx, operand)?;
                let ty = operand.result.ty.clone();
                combine(r.postfix_unary(*op, &operand.code), ty, [operand])
            }
            Expr::ElementAccess { id, target, args } => {
                let target = self.lower_expression(ctx, target)?;
                let mut result = target.result.clone();
                let args = self.lower_arguments(ctx, args, &mut result)?;
                result.ty = self
                    .type_of(ctx, *id)
                    .or_else(|| target.result.ty.as_ref().and_then(element_type));
                Lowered {
                    code: r.element_access(&target.code, &args),
                    result,
                }
            }
            Expr::InterpolatedString { parts, .. } => {
                let mut result = processed();
                let mut fragments = Vec::with_capacity(parts.len());
                for part in parts {
                    fragments.push(match part {
                        InterpolationPart::Text { text } => Fragment::Text(text.clone()),
                        InterpolationPart::Expression { expr, format } => {
                            let Lowered { code, result: inner } =
                                self.lower_expression(ctx, expr)?;
                            result.absorb(inner);
                            Fragment::Code {
                                code,
                                format: format.clone(),
                            }
                        }
                    });
                }
                result.ty = Some(VariableType::new(TypeKind::String, "string"));
                Lowered {
                    code: r.interpolated_string(&fragments),
                    result,
                }
            }
            Expr::Default { id, ty } => {
                let ty = match ty {
                    Some(ty) => Some(VariableType::from_syntax(ty)),
                    None => self.type_of(ctx, *id),
                };
                let code = match ty.as_ref().and_then(VariableType::default_value) {
                    Some("false") => r.literal(LiteralKind::False, "false"),
                    Some(value) => r.literal(LiteralKind::Numeric, value),
                    None => {
                        let mapped = ty.as_ref().map(|t| self.map_type(ctx, t));
                        r.default_value(mapped.as_deref())
                    }
                };
                Lowered::new(code).typed(ty)
            }
            Expr::PredefinedType { name, .. } => {
                let ty = VariableType::from_syntax(&TypeSyntax::predefined(name.as_str()));
                let code = match self.known().get(name, 0) {
                    Some(known) => {
                        if let Some(import) = &known.import {
                            ctx.imports.add(import.clone());
                        }
                        r.type_reference(&known.target)
                    }
                    None => r.type_reference(&self.map_type(ctx, &ty)),
                };
                Lowered::new(code).typed(Some(ty))
            }
            Expr::Tuple { id, elements } => {
                let mut result = processed();
                let elements = self.lower_arguments(ctx, elements, &mut result)?;
                result.ty = self.type_of(ctx, *id);
                Lowered {
                    code: r.tuple_literal(&elements),
                    result,
                }
            }
            Expr::Initializer { id, .. } => {
                let mut result = processed();
                let code = self.initializer(ctx, expr, None, &mut result)?;
                result.ty = self.type_of(ctx, *id);
                Lowered { code, result }
            }
            Expr::Parenthesized { inner, .. } => {
                let inner = self.lower_expression(ctx, inner)?;
                let ty = inner.result.ty.clone();
                combine(r.parenthesized(&inner.code), ty, [inner])
            }
            Expr::ArrayCreation {
                element,
                sizes,
                initializer,
                ..
            } => {
                let element_ty = VariableType::from_syntax(element);
                let mapped = self.map_type(ctx, &element_ty);
                let mut result = processed();
                let mut lowered_sizes = Vec::with_capacity(sizes.len());
                for size in sizes {
                    let Lowered { code, result: inner } = self.lower_expression(ctx, size)?;
                    result.absorb(inner);
                    lowered_sizes.push(code);
                }
                let init = initializer
                    .as_deref()
                    .map(|init| self.initializer(ctx, init, None, &mut result))
                    .transpose()?;
                result.ty = Some(
                    VariableType::new(TypeKind::Array, "Array").with_generic_args(vec![element_ty]),
                );
                Lowered {
                    code: r.array_creation(&mapped, &lowered_sizes, init.as_deref()),
                    result,
                }
            }
            Expr::TypeOf { ty, .. } => {
                let mapped = self.map_syntax(ctx, ty);
                Lowered::new(r.type_of(&mapped))
            }
            Expr::Await { id, operand } => {
                let operand = self.lower_expression(ctx, operand)?;
                combine(r.await_expr(&operand.code), self.type_of(ctx, *id), [operand])
            }
            Expr::ImplicitArrayCreation { id, initializer } => {
                let mut result = processed();
                let init = self.initializer(ctx, initializer, None, &mut result)?;
                result.ty = self.type_of(ctx, *id);
                Lowered {
                    code: r.implicit_array(&init),
                    result,
                }
            }
            Expr::Declaration { name, .. } => {
                ctx.declare(name);
                Lowered::new(r.declaration_expression(name))
            }
            Expr::Other { id, syntax } => return Err(self.unsupported(ctx, syntax, *id)),
        };
        Ok(lowered)
    }

    /// Lower call arguments, hoisting `out`/`ref` arguments through temps.
    pub(crate) fn lower_arguments(
        &self,
        ctx: &mut LowerContext<'_>,
        args: &[Argument],
        into: &mut ExpressionResult,
    ) -> Result<Vec<String>, LowerError> {
        let r = self.renderer;
        let mut lowered = Vec::with_capacity(args.len());
        for arg in args {
            let code = match (arg.modifier, &arg.expr) {
                (ArgumentModifier::Out, Expr::Declaration { ty, name, .. }) => {
                    let temp = ctx.temp("out");
                    into.before.push(r.out_temp_declaration(&temp, None));
                    let ty = ty
                        .as_ref()
                        .filter(|t| !t.is_implicit())
                        .map(|t| self.map_syntax(ctx, t));
                    let value = r.out_temp_value(&temp);
                    let mutable = self.declare_local(ctx, name);
                    into.after
                        .push(r.local_declaration(name, ty.as_deref(), Some(&value), mutable));
                    r.out_temp_argument(&temp)
                }
                (modifier @ (ArgumentModifier::Out | ArgumentModifier::Ref), target) => {
                    let Lowered { code, result } = self.lower_expression(ctx, target)?;
                    let temp = ctx.temp("out");
                    let initial = (modifier == ArgumentModifier::Ref).then_some(code.as_str());
                    into.before.extend(result.before);
                    into.before.push(r.out_temp_declaration(&temp, initial));
                    let write_back = r.assignment(&code, AssignOp::Assign, &r.out_temp_value(&temp));
                    into.after.push(r.expression_statement(&write_back));
                    into.after.extend(result.after);
                    r.out_temp_argument(&temp)
                }
                (_, expr) => {
                    let Lowered { code, result } = self.lower_expression(ctx, expr)?;
                    into.absorb(result);
                    code
                }
            };
            lowered.push(code);
        }
        Ok(lowered)
    }

    fn identifier(&self, ctx: &mut LowerContext<'_>, id: NodeId, name: &str) -> Lowered {
        let arity = ctx.call_arity.take();
        let semantic_ty = self.type_of(ctx, id);

        // Right-hand side of a member access: look the name up on the receiver.
        if let Some(receiver) = ctx.scope.receiver() {
            let member = match receiver {
                ClassRef::Program(class) => self.member_info(*class, name, arity),
                ClassRef::External(_) => None,
            };
            return match member {
                Some(member) => Lowered::new(member.emitted).typed(semantic_ty.or(member.ty)),
                None => Lowered::new(name).typed(semantic_ty),
            };
        }

        let mut lowered = match ctx.semantic.symbol_of(id) {
            Some(symbol) => match symbol.kind {
                SymbolKind::Local | SymbolKind::Constructor => Lowered::new(name),
                SymbolKind::Parameter => self.parameter(ctx, name),
                SymbolKind::Namespace => return Lowered::skipped(),
                SymbolKind::Type => self.type_name(ctx, name),
                SymbolKind::Field
                | SymbolKind::Property
                | SymbolKind::Event
                | SymbolKind::Method => {
                    let declared_in = symbol.containing_type.clone();
                    let owner = declared_in
                        .as_deref()
                        .and_then(|t| self.program.find_class(t))
                        .or(ctx.scope.member_owner());
                    let arity = symbol.parameter_count.or(arity);
                    self.member(ctx, owner, name, arity, Some(symbol.is_static), declared_in)
                }
            },
            None => self.unannotated_identifier(ctx, name, arity),
        };
        if semantic_ty.is_some() {
            lowered.result.ty = semantic_ty;
        }
        lowered
    }

    /// Resolution without oracle help: parameters, locals, members of the
    /// owner, then type names.
    fn unannotated_identifier(
        &self,
        ctx: &mut LowerContext<'_>,
        name: &str,
        arity: Option<usize>,
    ) -> Lowered {
        if self.is_local_name(ctx, name) {
            return self.parameter(ctx, name);
        }
        if let Some(owner) = ctx.scope.member_owner()
            && self.member_info(owner, name, arity).is_some()
        {
            return self.member(ctx, Some(owner), name, arity, None, None);
        }
        if self.program.find_class(name).is_some() || self.known().get(name, 0).is_some() {
            return self.type_name(ctx, name);
        }
        Lowered::new(name)
    }

    fn is_local_name(&self, ctx: &LowerContext<'_>, name: &str) -> bool {
        ctx.scope.current_function().is_some_and(|(class, index)| {
            let function = self.program.function(class, index);
            function.parameter(name).is_some() || function.body_variable(name).is_some()
        })
    }

    /// A parameter of the current function, unboxed if passed by reference.
    fn parameter(&self, ctx: &LowerContext<'_>, name: &str) -> Lowered {
        let parameter = ctx
            .scope
            .current_function()
            .and_then(|(class, index)| self.program.function(class, index).parameter(name));
        match parameter {
            Some(p) if p.modifiers.is_by_reference() => {
                Lowered::new(self.renderer.out_parameter_value(name)).typed(Some(p.ty.clone()))
            }
            Some(p) => Lowered::new(name).typed(Some(p.ty.clone())),
            None => Lowered::new(name),
        }
    }

    fn member(
        &self,
        ctx: &mut LowerContext<'_>,
        owner: Option<ClassId>,
        name: &str,
        arity: Option<usize>,
        is_static: Option<bool>,
        declared_in: Option<String>,
    ) -> Lowered {
        let info = owner.and_then(|class| self.member_info(class, name, arity));
        let emitted = info.as_ref().map_or(name, |m| m.emitted.as_str());
        let ty = info.as_ref().and_then(|m| m.ty.clone());
        let is_static = is_static
            .or(info.as_ref().map(|m| m.is_static))
            .unwrap_or(false);

        if !is_static {
            return Lowered::new(self.renderer.this_member(emitted)).typed(ty);
        }
        let class = info
            .as_ref()
            .and_then(|m| m.remap_class.clone().or_else(|| Some(m.owner.clone())))
            .or(declared_in)
            .or_else(|| owner.map(|id| self.program.class(id).name.clone()))
            .unwrap_or_default();
        self.reference(ctx, &class);
        Lowered::new(self.renderer.static_member(&class, emitted)).typed(ty)
    }

    fn type_name(&self, ctx: &mut LowerContext<'_>, name: &str) -> Lowered {
        let ty = Some(VariableType::object(name));
        if let Some(known) = self.known().get(name, 0) {
            if let Some(import) = &known.import {
                ctx.imports.add(import.clone());
            }
            return Lowered::new(self.renderer.type_reference(&known.target)).typed(ty);
        }
        self.reference(ctx, name);
        Lowered::new(self.renderer.type_reference(name)).typed(ty)
    }

    fn member_access(
        &self,
        ctx: &mut LowerContext<'_>,
        id: NodeId,
        target: &Expr,
        name: &Expr,
    ) -> Result<Lowered, LowerError> {
        let arity = ctx.call_arity.take();
        let target_lowered = self.lower_expression(ctx, target)?;

        // Namespace qualifiers vanish; the name stands alone.
        if !target_lowered.result.processed {
            ctx.call_arity = arity;
            let lowered = self.lower_expression(ctx, name);
            ctx.call_arity = None;
            return lowered;
        }

        let receiver = self.receiver_for(ctx, target, &target_lowered);
        let mark = ctx.scope.mark();
        ctx.scope.push(Frame::Class(receiver.clone()));
        ctx.call_arity = arity;
        let member = self.lower_expression(ctx, name);
        ctx.call_arity = None;
        ctx.scope.restore(mark);
        let member = member?;

        let redirect = match (&receiver, name) {
            (ClassRef::Program(class), Expr::Identifier { name, .. })
                if self.is_type_expression(ctx, target) =>
            {
                self.member_info(*class, name, arity)
                    .and_then(|m: MemberInfo| m.remap_class)
            }
            _ => None,
        };
        let code = match redirect {
            Some(class) => {
                self.reference(ctx, &class);
                self.renderer.static_member(&class, &member.code)
            }
            None => self.renderer.member_access(&target_lowered.code, &member.code),
        };
        let ty = self.type_of(ctx, id).or_else(|| member.result.ty.clone());
        Ok(combine(code, ty, [target_lowered, member]))
    }

    /// Class that a member name after `target` is looked up on.
    fn receiver_for(&self, ctx: &LowerContext<'_>, expr: &Expr, target: &Lowered) -> ClassRef {
        let owner = ctx.scope.member_owner();
        let class = match expr {
            Expr::This { .. } => owner,
            Expr::Base { .. } => owner.and_then(|id| self.base_class(id)),
            _ => None,
        };
        if let Some(class) = class {
            return ClassRef::Program(class);
        }
        match &target.result.ty {
            Some(ty) => match self.program.find_class(&ty.name) {
                Some(class) => ClassRef::Program(class),
                None => ClassRef::External(ty.name.clone()),
            },
            None => ClassRef::External(String::new()),
        }
    }

    fn is_type_expression(&self, ctx: &LowerContext<'_>, expr: &Expr) -> bool {
        match expr {
            Expr::Identifier { id, name } | Expr::GenericName { id, name, .. } => {
                match ctx.semantic.symbol_of(*id) {
                    Some(symbol) => symbol.kind == SymbolKind::Type,
                    None => {
                        !self.is_local_name(ctx, name) && self.program.find_class(name).is_some()
                    }
                }
            }
            _ => false,
        }
    }

    fn object_creation(
        &self,
        ctx: &mut LowerContext<'_>,
        id: NodeId,
        ty: &TypeSyntax,
        args: &[Argument],
        initializer: Option<&Expr>,
    ) -> Result<Lowered, LowerError> {
        let created = VariableType::from_syntax(ty);
        let mapped = self.map_type(ctx, &created);
        let class = ty.simple_name().and_then(|name| self.program.find_class(name));

        let mut result = processed();
        let args_code = self.lower_arguments(ctx, args, &mut result)?;
        let arity = ctx
            .semantic
            .symbol_of(id)
            .and_then(|s| s.parameter_count)
            .unwrap_or(args.len());
        let constructor = class
            .and_then(|c| self.program.class(c).constructor_for(arity))
            .and_then(|f| f.remap.clone());
        let init = initializer
            .map(|init| self.initializer(ctx, init, class, &mut result))
            .transpose()?;

        result.ty = Some(created);
        Ok(Lowered {
            code: self.renderer.object_creation(
                &mapped,
                constructor.as_deref(),
                &args_code,
                init.as_deref(),
            ),
            result,
        })
    }

    /// Object, collection and array initializers. Object members resolve
    /// against `class` when it belongs to the program.
    fn initializer(
        &self,
        ctx: &mut LowerContext<'_>,
        expr: &Expr,
        class: Option<ClassId>,
        into: &mut ExpressionResult,
    ) -> Result<String, LowerError> {
        let Expr::Initializer {
            shape, elements, ..
        } = expr
        else {
            let Lowered { code, result } = self.lower_expression(ctx, expr)?;
            into.absorb(result);
            return Ok(code);
        };

        let mut lowered = Vec::with_capacity(elements.len());
        for element in elements {
            let code = match (object_member(*shape, element), element) {
                (Some((name, value)), _) => {
                    let member = class
                        .and_then(|c| self.member_info(c, name, None))
                        .map_or_else(|| name.to_string(), |m| m.emitted);
                    let Lowered { code, result } = self.lower_expression(ctx, value)?;
                    into.absorb(result);
                    self.renderer.initializer_member(&member, &code)
                }
                (None, nested @ Expr::Initializer { .. }) => {
                    self.initializer(ctx, nested, None, into)?
                }
                (None, other) => {
                    let Lowered { code, result } = self.lower_expression(ctx, other)?;
                    into.absorb(result);
                    code
                }
            };
            lowered.push(code);
        }
        Ok(self.renderer.initializer(*shape, &lowered))
    }

    fn lambda(
        &self,
        ctx: &mut LowerContext<'_>,
        params: &[LambdaParam],
        body: &LambdaBody,
    ) -> Result<Lowered, LowerError> {
        let r = self.renderer;
        let params: Vec<String> = params
            .iter()
            .map(|p| {
                let ty = p
                    .ty
                    .as_ref()
                    .filter(|t| !t.is_implicit())
                    .map(|t| self.map_syntax(ctx, t));
                r.lambda_parameter(&p.name, ty.as_deref())
            })
            .collect();

        let body = match body {
            LambdaBody::Expression { expr } => {
                let lowered = self.lower_expression(ctx, expr)?;
                if lowered.result.hoists() {
                    // Hoisted lines cannot escape the lambda; give it a block.
                    let mut lines = Vec::new();
                    self.indented(ctx, |this, ctx| {
                        let code = this.bind(ctx, lowered, "ret", &mut lines);
                        this.emit(ctx, &mut lines, r.return_statement(Some(&code)));
                        Ok(())
                    })?;
                    self.block_text(ctx, lines)
                } else {
                    lowered.code
                }
            }
            LambdaBody::Block { statements } => {
                let mut lines = Vec::new();
                self.indented(ctx, |this, ctx| {
                    this.lower_statements(ctx, statements, &mut lines)
                })?;
                self.block_text(ctx, lines)
            }
        };
        Ok(Lowered::new(r.lambda(&params, &body)))
    }

    fn block_text(&self, ctx: &LowerContext<'_>, lines: Vec<String>) -> String {
        let r = self.renderer;
        if lines.is_empty() {
            return format!("{}{}", r.block_open(), r.block_close());
        }
        format!(
            "{}\n{}\n{}{}",
            r.block_open(),
            lines.join("\n"),
            self.indent(ctx),
            r.block_close()
        )
    }

    fn type_of(&self, ctx: &LowerContext<'_>, id: NodeId) -> Option<VariableType> {
        ctx.semantic.type_of(id).map(VariableType::from_syntax)
    }
}

fn processed() -> ExpressionResult {
    ExpressionResult {
        processed: true,
        ..ExpressionResult::default()
    }
}

fn combine<const N: usize>(
    code: String,
    ty: Option<VariableType>,
    parts: [Lowered; N],
) -> Lowered {
    let mut lowered = Lowered::new(code).typed(ty);
    for part in parts {
        lowered.result.absorb(part.result);
    }
    lowered
}

/// `Name = value` inside an object initializer.
fn object_member(shape: InitializerShape, element: &Expr) -> Option<(&str, &Expr)> {
    match (shape, element) {
        (InitializerShape::Object, Expr::Assignment { target, value, .. }) => match target.as_ref() {
            Expr::Identifier { name, .. } => Some((name.as_str(), value.as_ref())),
            _ => None,
        },
        _ => None,
    }
}

/// Element type of an indexable descriptor.
fn element_type(ty: &VariableType) -> Option<VariableType> {
    match ty.kind {
        TypeKind::Array | TypeKind::List => ty.generic_args.first().cloned(),
        TypeKind::Dictionary => ty.generic_args.get(1).cloned(),
        TypeKind::String => Some(VariableType::new(TypeKind::Char, "char")),
        _ => None,
    }
}
