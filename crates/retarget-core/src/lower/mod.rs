//! Scoped lowering engine.
//!
//! Turns stored bodies into target lines through a [`Renderer`]. Lowering
//! is a pure function of the context and the node: the only state carried
//! between nodes is the scope stack (always restored), the temp counter,
//! and the import/reference sets.
//!
//! # Hoisting
//!
//! Every expression lowers to inline code plus an [`ExpressionResult`]
//! with `before`/`after` lines. Statements splice `before ++ inline ++
//! after`; expressions never open a boundary of their own. A call with an
//! `out` argument, for example:
//!
//! ```text
//! before:  const out_1 = { value: undefined };
//! inline:  this.Foo(out_1);
//! after:   x = out_1.value;
//! ```
//!
//! # Scopes
//!
//! Member access pushes a receiver class frame while lowering the member
//! name and restores the stack afterwards. Binary operands are lowered from
//! the same depth, so nothing the left side pushes is visible to the right.

mod context;
mod expr;
mod stmt;

#[cfg(all(test, feature = "write-typescript"))]
mod tests;

pub use context::{ExpressionResult, LowerContext, Lowered};

use crate::error::LowerError;
use crate::render::Renderer;
use crate::scope::{ClassRef, Frame};
use retarget_model::{
    ClassId, ImportTracker, KnownClasses, MemberRef, Program, TypeMapper, VariableType,
};
use retarget_syntax::{
    AccessorKind, Body, ConstructorInitializer, InitializerTarget, NoSemantics, NodeId,
    SemanticModel, TypeSyntax,
};

static NO_SEMANTICS: NoSemantics = NoSemantics;

/// Lines of one lowered body plus what they depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoweredBody {
    /// Lines relative to the body's own indentation. A line may contain
    /// newlines (block lambdas); continuation lines are indented relative to
    /// the same base.
    pub lines: Vec<String>,
    pub imports: ImportTracker,
    pub referenced_classes: Vec<String>,
}

/// A member found through [`LoweringEngine::member_info`].
#[derive(Debug, Clone)]
pub(crate) struct MemberInfo {
    pub emitted: String,
    pub is_static: bool,
    pub remap_class: Option<String>,
    pub owner: String,
    pub ty: Option<VariableType>,
}

pub struct LoweringEngine<'a> {
    program: &'a Program,
    renderer: &'a dyn Renderer,
    known: &'a KnownClasses,
}

impl<'a> LoweringEngine<'a> {
    pub fn new(program: &'a Program, renderer: &'a dyn Renderer, known: &'a KnownClasses) -> Self {
        Self {
            program,
            renderer,
            known,
        }
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn renderer(&self) -> &'a dyn Renderer {
        self.renderer
    }

    /// Oracle of the document a class came from.
    pub fn semantic_of(&self, class: ClassId) -> &'a dyn SemanticModel {
        match &self.program.class(class).semantic {
            Some(handle) => handle.model(),
            None => &NO_SEMANTICS,
        }
    }

    /// Context positioned inside a function: class frame, then function frame.
    pub fn function_context(
        &self,
        class: ClassId,
        index: usize,
    ) -> Result<LowerContext<'a>, LowerError> {
        let owner = self.program.class(class);
        let function = owner.functions.get(index).ok_or_else(|| LowerError::MissingMember {
            what: "function",
            class: owner.name.clone(),
            index,
        })?;
        let mut ctx = LowerContext::new(
            self.semantic_of(class),
            format!("{}.{}", owner.name, function.name),
        );
        ctx.scope.push(Frame::Class(ClassRef::Program(class)));
        ctx.scope.push(Frame::Function { class, index });
        Ok(ctx)
    }

    /// Context positioned inside a field or property.
    pub fn variable_context(
        &self,
        class: ClassId,
        index: usize,
    ) -> Result<LowerContext<'a>, LowerError> {
        let owner = self.program.class(class);
        let var = owner.variables.get(index).ok_or_else(|| LowerError::MissingMember {
            what: "variable",
            class: owner.name.clone(),
            index,
        })?;
        let mut ctx = LowerContext::new(
            self.semantic_of(class),
            format!("{}.{}", owner.name, var.name),
        );
        ctx.scope.push(Frame::Class(ClassRef::Program(class)));
        ctx.scope.push(Frame::Variable { class, index });
        Ok(ctx)
    }

    /// Lower a method or constructor body, including constructor chaining.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn lower_function(&self, class: ClassId, index: usize) -> Result<LoweredBody, LowerError> {
        let mut ctx = self.function_context(class, index)?;
        let function = self.program.function(class, index);
        let mut lines = Vec::new();

        if let Some(chain) = &function.chained_constructor {
            self.constructor_chain(&mut ctx, class, chain, &mut lines)?;
        }
        match &function.body {
            Some(Body::Block { statements }) => {
                self.lower_statements(&mut ctx, statements, &mut lines)?
            }
            Some(Body::Expression { expr }) if function.return_type.is_some() => {
                self.lower_return(&mut ctx, Some(expr), &mut lines)?
            }
            Some(Body::Expression { expr }) => {
                self.lower_expression_statement(&mut ctx, expr, &mut lines)?
            }
            None => {}
        }
        Ok(finish(ctx, lines))
    }

    /// Lower a property accessor. `Init` lowers like `Set`.
    pub fn lower_accessor(
        &self,
        class: ClassId,
        index: usize,
        kind: AccessorKind,
    ) -> Result<LoweredBody, LowerError> {
        let mut ctx = self.variable_context(class, index)?;
        let var = self.program.variable(class, index);
        let mut lines = Vec::new();

        match kind {
            AccessorKind::Get => {
                if let Some(expr) = &var.expression_body {
                    self.lower_return(&mut ctx, Some(expr), &mut lines)?;
                } else {
                    match &var.get_body {
                        Some(Body::Block { statements }) => {
                            self.lower_statements(&mut ctx, statements, &mut lines)?
                        }
                        Some(Body::Expression { expr }) => {
                            self.lower_return(&mut ctx, Some(expr), &mut lines)?
                        }
                        None => {}
                    }
                }
            }
            AccessorKind::Set | AccessorKind::Init => match &var.set_body {
                Some(Body::Block { statements }) => {
                    self.lower_statements(&mut ctx, statements, &mut lines)?
                }
                Some(Body::Expression { expr }) => {
                    self.lower_expression_statement(&mut ctx, expr, &mut lines)?
                }
                None => {}
            },
        }
        Ok(finish(ctx, lines))
    }

    /// Lower a non-literal variable initializer to a single expression line.
    pub fn lower_initializer(
        &self,
        class: ClassId,
        index: usize,
    ) -> Result<Option<LoweredBody>, LowerError> {
        let mut ctx = self.variable_context(class, index)?;
        let Some(init) = &self.program.variable(class, index).initializer else {
            return Ok(None);
        };
        let lowered = self.lower_expression(&mut ctx, init)?;
        if lowered.result.hoists() {
            return Err(LowerError::UnsupportedHoist {
                construct: "field initializer",
                context: ctx.location.clone(),
            });
        }
        Ok(Some(finish(ctx, vec![lowered.code])))
    }

    fn constructor_chain(
        &self,
        ctx: &mut LowerContext<'_>,
        class: ClassId,
        chain: &ConstructorInitializer,
        out: &mut Vec<String>,
    ) -> Result<(), LowerError> {
        let target = match chain.target {
            InitializerTarget::Base => self.base_class(class),
            InitializerTarget::This => Some(class),
        };
        let constructor = target
            .and_then(|c| self.program.class(c).constructor_for(chain.args.len()))
            .and_then(|f| f.remap.clone());
        let mut result = ExpressionResult::default();
        let args = self.lower_arguments(ctx, &chain.args, &mut result)?;
        let line = self
            .renderer
            .constructor_chain(chain.target, constructor.as_deref(), &args);
        self.splice(ctx, out, result, line);
        Ok(())
    }

    /// First extension that resolves to a non-interface program class.
    pub(crate) fn base_class(&self, class: ClassId) -> Option<ClassId> {
        self.program
            .class(class)
            .extensions
            .iter()
            .filter_map(|ext| self.program.find_class(ext))
            .find(|id| !self.program.class(*id).is_interface())
    }

    pub(crate) fn member_info(
        &self,
        class: ClassId,
        name: &str,
        arity: Option<usize>,
    ) -> Option<MemberInfo> {
        let info = match self.program.find_member(class, name, arity)? {
            MemberRef::Variable(owner, index) => {
                let var = self.program.variable(owner, index);
                MemberInfo {
                    emitted: var.emitted_name().to_string(),
                    is_static: var.is_static,
                    remap_class: var.remap_class.clone(),
                    owner: self.program.class(owner).name.clone(),
                    ty: Some(var.ty.clone()),
                }
            }
            MemberRef::Function(owner, index) => {
                let function = self.program.function(owner, index);
                MemberInfo {
                    emitted: function.emitted_name().to_string(),
                    is_static: function.is_static,
                    remap_class: None,
                    owner: self.program.class(owner).name.clone(),
                    ty: function.effective_return_type().cloned(),
                }
            }
        };
        Some(info)
    }

    /// Register the next declaration of `name` and report whether that local
    /// is written after declaration. Declaration sites are matched to the
    /// discovered locals by per-name position, so lowering must pass every
    /// site in source order. Unknown locals are treated as mutable.
    pub(crate) fn declare_local(&self, ctx: &mut LowerContext<'_>, name: &str) -> bool {
        let occurrence = ctx.declare(name);
        ctx.scope
            .current_function()
            .and_then(|(class, index)| {
                self.program
                    .function(class, index)
                    .declared_variable(name, occurrence)
            })
            .is_none_or(|var| var.reassigned)
    }

    /// Record a dependency on a program class other than the owner.
    pub(crate) fn reference(&self, ctx: &mut LowerContext<'_>, name: &str) {
        let owner = ctx.scope.member_owner().map(|id| self.program.class(id).name.as_str());
        if owner != Some(name) && self.program.find_class(name).is_some() {
            ctx.reference(name);
        }
    }

    pub(crate) fn map_type(&self, ctx: &mut LowerContext<'_>, ty: &VariableType) -> String {
        self.note_references(ctx, ty);
        TypeMapper::new(&self.program.type_map, self.known, self.renderer).map(ty, &mut ctx.imports)
    }

    pub(crate) fn map_syntax(&self, ctx: &mut LowerContext<'_>, ty: &TypeSyntax) -> String {
        self.map_type(ctx, &VariableType::from_syntax(ty))
    }

    fn note_references(&self, ctx: &mut LowerContext<'_>, ty: &VariableType) {
        self.reference(ctx, &ty.name);
        for arg in ty.args.iter().chain(&ty.generic_args) {
            self.note_references(ctx, arg);
        }
    }

    pub fn known(&self) -> &'a KnownClasses {
        self.known
    }

    pub(crate) fn unsupported(&self, ctx: &LowerContext<'_>, kind: &str, node: NodeId) -> LowerError {
        LowerError::Unsupported {
            kind: kind.to_string(),
            node,
            context: ctx.location.clone(),
        }
    }

    pub(crate) fn indent(&self, ctx: &LowerContext<'_>) -> String {
        self.renderer.indent_unit().repeat(ctx.depth)
    }

    pub(crate) fn emit(&self, ctx: &LowerContext<'_>, out: &mut Vec<String>, line: String) {
        out.push(format!("{}{}", self.indent(ctx), line));
    }

    /// Emit `before ++ line ++ after`.
    pub(crate) fn splice(
        &self,
        ctx: &LowerContext<'_>,
        out: &mut Vec<String>,
        result: ExpressionResult,
        line: String,
    ) {
        for before in result.before {
            self.emit(ctx, out, before);
        }
        self.emit(ctx, out, line);
        for after in result.after {
            self.emit(ctx, out, after);
        }
    }
}

fn finish(ctx: LowerContext<'_>, lines: Vec<String>) -> LoweredBody {
    let (imports, referenced_classes) = ctx.into_parts();
    LoweredBody {
        lines,
        imports,
        referenced_classes,
    }
}
