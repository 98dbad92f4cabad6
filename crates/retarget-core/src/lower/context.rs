use crate::scope::{ClassRef, ScopeStack};
use retarget_model::{ImportTracker, VariableType};
use retarget_syntax::SemanticModel;
use std::collections::HashMap;

/// Side information produced by lowering one expression.
///
/// `before` lines must run ahead of the statement containing the
/// expression, `after` lines right behind it. Sub-expressions append to
/// their parent's lists unchanged; only statements splice them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionResult {
    /// False when the expression lowers to nothing (a namespace qualifier).
    pub processed: bool,
    pub ty: Option<VariableType>,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl ExpressionResult {
    pub fn hoists(&self) -> bool {
        !self.before.is_empty() || !self.after.is_empty()
    }

    /// Append a child's hoisted lines.
    pub fn absorb(&mut self, child: ExpressionResult) {
        self.before.extend(child.before);
        self.after.extend(child.after);
    }
}

/// A lowered expression: inline code plus its [`ExpressionResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lowered {
    pub code: String,
    pub result: ExpressionResult,
}

impl Lowered {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            result: ExpressionResult {
                processed: true,
                ..ExpressionResult::default()
            },
        }
    }

    pub fn typed(mut self, ty: Option<VariableType>) -> Self {
        self.result.ty = ty;
        self
    }

    pub(crate) fn skipped() -> Self {
        Self::default()
    }
}

/// Mutable state of one lowering run.
pub struct LowerContext<'a> {
    pub scope: ScopeStack,
    pub imports: ImportTracker,
    pub(crate) semantic: &'a dyn SemanticModel,
    /// `Class.Member`, for error messages.
    pub(crate) location: String,
    pub(crate) depth: usize,
    /// Argument count of the invocation whose target is being lowered.
    pub(crate) call_arity: Option<usize>,
    /// Receiver of the innermost conditional access, for member bindings.
    pub(crate) binding_receiver: Option<ClassRef>,
    temps: usize,
    /// Declaration sites seen so far, per local name.
    declared: HashMap<String, usize>,
    referenced: Vec<String>,
}

impl<'a> LowerContext<'a> {
    pub fn new(semantic: &'a dyn SemanticModel, location: impl Into<String>) -> Self {
        Self {
            scope: ScopeStack::new(),
            imports: ImportTracker::new(),
            semantic,
            location: location.into(),
            depth: 0,
            call_arity: None,
            binding_receiver: None,
            temps: 0,
            declared: HashMap::new(),
            referenced: Vec::new(),
        }
    }

    /// Next temp name: `out_1`, `cond_2`, ... One counter per context.
    pub(crate) fn temp(&mut self, prefix: &str) -> String {
        self.temps += 1;
        format!("{}_{}", prefix, self.temps)
    }

    /// Count a declaration of `name`; returns how many came before it.
    pub(crate) fn declare(&mut self, name: &str) -> usize {
        let seen = self.declared.entry(name.to_string()).or_default();
        let occurrence = *seen;
        *seen += 1;
        occurrence
    }

    pub(crate) fn reference(&mut self, class: &str) {
        if !self.referenced.iter().any(|r| r == class) {
            self.referenced.push(class.to_string());
        }
    }

    pub fn referenced_classes(&self) -> &[String] {
        &self.referenced
    }

    pub(crate) fn into_parts(self) -> (ImportTracker, Vec<String>) {
        (self.imports, self.referenced)
    }
}
