//! Declaration discovery.
//!
//! Walks each document once and appends every non-ignored type and member
//! to the [`Program`]. Bodies are stored unlowered; a light metadata walk
//! over them records `return` types and local variables (see [`body`]).
//!
//! Anything outside the recognized member kinds is skipped without error.
//! Discovery never writes `remap` fields; naming decisions belong to
//! resolution.

mod body;

use crate::scope::{ClassRef, Frame, ScopeStack};
use body::BodyScan;
use retarget_model::{
    AccessType, Class, ClassId, DeclarationType, Function, ModelError, Parameter,
    ParameterModifiers, Program, SemanticHandle, Variable, VariableKind, VariableType,
};
use retarget_syntax::{
    AccessorKind, ConstructorDecl, DelegateDecl, Document, EventDecl, Expr, FieldDecl,
    LiteralKind, Member, MethodDecl, ParameterDecl, PropertyDecl, TypeDecl, TypeKeyword,
    UnaryOp,
};
use std::sync::Arc;

/// A document ready for discovery: its members plus the oracle that
/// answers questions about them.
#[derive(Debug)]
pub struct SourceUnit {
    pub name: String,
    pub members: Vec<Member>,
    pub semantic: SemanticHandle,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, members: Vec<Member>, semantic: SemanticHandle) -> Self {
        Self {
            name: name.into(),
            members,
            semantic,
        }
    }
}

impl From<Document> for SourceUnit {
    fn from(document: Document) -> Self {
        let semantic = SemanticHandle::new(Arc::new(document.annotations));
        Self::new(document.name, document.members, semantic)
    }
}

/// Counters reported by a discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub classes: usize,
    pub skipped_namespaces: usize,
    pub skipped_classes: usize,
    pub skipped_members: usize,
}

impl std::ops::AddAssign for DiscoveryStats {
    fn add_assign(&mut self, rhs: Self) {
        self.classes += rhs.classes;
        self.skipped_namespaces += rhs.skipped_namespaces;
        self.skipped_classes += rhs.skipped_classes;
        self.skipped_members += rhs.skipped_members;
    }
}

/// Discover every type declared in one document.
pub fn discover(program: &mut Program, unit: SourceUnit) -> Result<DiscoveryStats, ModelError> {
    let mut discovery = Discovery {
        program,
        semantic: unit.semantic,
        scope: ScopeStack::new(),
        stats: DiscoveryStats::default(),
    };
    discovery.walk(unit.members, None)?;
    tracing::debug!(
        document = %unit.name,
        classes = discovery.stats.classes,
        skipped_members = discovery.stats.skipped_members,
        "discovery complete"
    );
    Ok(discovery.stats)
}

struct Discovery<'p> {
    program: &'p mut Program,
    semantic: SemanticHandle,
    scope: ScopeStack,
    stats: DiscoveryStats,
}

/// Parsed member modifier tokens.
#[derive(Debug, Clone, Copy, Default)]
struct Modifiers {
    access: Option<AccessType>,
    is_static: bool,
    is_override: bool,
    is_async: bool,
    is_readonly: bool,
    declaration: DeclarationType,
}

impl Modifiers {
    fn parse(tokens: &[String]) -> Self {
        let mut m = Modifiers::default();
        for token in tokens {
            let access = match token.as_str() {
                "public" => Some(AccessType::Public),
                "internal" => Some(AccessType::Internal),
                "protected" => Some(AccessType::Protected),
                "private" => Some(AccessType::Private),
                "static" | "const" => {
                    m.is_static = true;
                    None
                }
                "override" => {
                    m.is_override = true;
                    None
                }
                "abstract" => {
                    m.declaration = DeclarationType::Abstract;
                    None
                }
                "virtual" => {
                    m.declaration = DeclarationType::Virtual;
                    None
                }
                "async" => {
                    m.is_async = true;
                    None
                }
                "readonly" => {
                    m.is_readonly = true;
                    None
                }
                _ => None,
            };
            // `protected internal` keeps the wider of the two.
            if let Some(access) = access {
                m.access = Some(m.access.map_or(access, |prev| prev.min(access)));
            }
        }
        m
    }

    fn access_in(&self, owner: DeclarationType) -> AccessType {
        match (self.access, owner) {
            (Some(access), _) => access,
            (None, DeclarationType::Interface) => AccessType::Public,
            (None, _) => AccessType::Private,
        }
    }
}

impl Discovery<'_> {
    fn walk(&mut self, members: Vec<Member>, namespace: Option<&str>) -> Result<(), ModelError> {
        for member in members {
            match member {
                Member::Namespace(ns) => {
                    let qualified = match namespace {
                        Some(outer) => format!("{}.{}", outer, ns.name),
                        None => ns.name.clone(),
                    };
                    if self.program.rules.ignores_namespace(&qualified) {
                        tracing::debug!(namespace = %qualified, "skipping ignored namespace");
                        self.stats.skipped_namespaces += 1;
                        continue;
                    }
                    self.walk(ns.members, Some(&qualified))?;
                }
                Member::Type(decl) => self.discover_type(decl, namespace)?,
                Member::Delegate(decl) => self.discover_delegate(decl, namespace)?,
                other => {
                    tracing::trace!(kind = other.kind_name(), "skipping namespace-level member");
                    self.stats.skipped_members += 1;
                }
            }
        }
        Ok(())
    }

    fn discover_type(&mut self, decl: TypeDecl, namespace: Option<&str>) -> Result<(), ModelError> {
        if self.program.rules.ignores_class(&decl.name) {
            tracing::debug!(class = %decl.name, "skipping ignored class");
            self.stats.skipped_classes += 1;
            return Ok(());
        }

        let modifiers = Modifiers::parse(&decl.modifiers);
        let declaration = match decl.keyword {
            TypeKeyword::Interface => DeclarationType::Interface,
            TypeKeyword::Enum => DeclarationType::Enum,
            TypeKeyword::Struct => DeclarationType::Struct,
            TypeKeyword::Class if modifiers.declaration == DeclarationType::Abstract => {
                DeclarationType::Abstract
            }
            TypeKeyword::Class => DeclarationType::Class,
        };

        let mut class = Class::new(decl.name, declaration);
        class.namespace = namespace.map(str::to_string);
        class.is_static = modifiers.is_static;
        class.generic_args = decl.generic_params;
        class.semantic = Some(self.semantic.clone());
        for base in &decl.bases {
            let Some(name) = base.ty.simple_name() else {
                continue;
            };
            let display = self
                .semantic
                .model()
                .type_of(base.id)
                .unwrap_or(&base.ty)
                .display();
            class.extensions.push(name.to_string());
            class.extension_display.push(display);
        }

        let id = self.program.add_class(class)?;
        self.stats.classes += 1;

        let mark = self.scope.mark();
        self.scope.push(Frame::Class(ClassRef::Program(id)));
        let result = self.discover_members(id, decl.members, namespace);
        self.scope.restore(mark);
        result
    }

    fn discover_members(
        &mut self,
        id: ClassId,
        members: Vec<Member>,
        namespace: Option<&str>,
    ) -> Result<(), ModelError> {
        for member in members {
            match member {
                Member::Field(field) => self.discover_field(id, field),
                Member::Property(property) => self.discover_property(id, property),
                Member::Event(event) => self.discover_event(id, event),
                Member::Method(method) => self.discover_method(id, method),
                Member::Constructor(ctor) => self.discover_constructor(id, ctor),
                Member::EnumMember(item) => {
                    let text = match item.value {
                        Some(value) => format!("{} = {}", item.name, value.trim()),
                        None => item.name,
                    };
                    self.program.class_mut(id).enum_members.push(text);
                }
                Member::Type(nested) => self.discover_type(nested, namespace)?,
                Member::Delegate(delegate) => self.discover_delegate(delegate, namespace)?,
                other => {
                    tracing::trace!(kind = other.kind_name(), "skipping member");
                    self.stats.skipped_members += 1;
                }
            }
        }
        Ok(())
    }

    fn owner_declaration(&self, id: ClassId) -> DeclarationType {
        self.program.class(id).declaration
    }

    fn discover_field(&mut self, id: ClassId, field: FieldDecl) {
        let modifiers = Modifiers::parse(&field.modifiers);
        let access = modifiers.access_in(self.owner_declaration(id));
        let ty = VariableType::from_syntax(&field.ty);
        for declarator in field.declarators {
            let mut var = Variable::new(declarator.name, ty.clone());
            var.kind = VariableKind::Field;
            var.access = access;
            var.is_static = modifiers.is_static;
            var.is_readonly = modifiers.is_readonly;
            var.has_get = true;
            var.has_set = !modifiers.is_readonly;
            set_initializer(&mut var, declarator.init);
            self.program.class_mut(id).variables.push(var);
        }
    }

    fn discover_property(&mut self, id: ClassId, property: PropertyDecl) {
        let modifiers = Modifiers::parse(&property.modifiers);
        let mut var = Variable::new(property.name, VariableType::from_syntax(&property.ty));
        var.kind = VariableKind::Property;
        var.access = modifiers.access_in(self.owner_declaration(id));
        var.declaration = modifiers.declaration;
        var.is_static = modifiers.is_static;
        var.is_override = modifiers.is_override;

        if let Some(expr) = property.expression_body {
            var.has_get = true;
            var.expression_body = Some(expr);
        }
        for accessor in property.accessors {
            match accessor.kind {
                AccessorKind::Get => {
                    var.has_get = true;
                    var.get_body = accessor.body;
                }
                AccessorKind::Set | AccessorKind::Init => {
                    var.has_set = true;
                    var.set_body = accessor.body;
                }
            }
        }
        set_initializer(&mut var, property.initializer);
        self.program.class_mut(id).variables.push(var);
    }

    fn discover_event(&mut self, id: ClassId, event: EventDecl) {
        let modifiers = Modifiers::parse(&event.modifiers);
        let access = modifiers.access_in(self.owner_declaration(id));
        let ty = VariableType::from_syntax(&event.ty);
        for name in event.names {
            let mut var = Variable::new(name, ty.clone());
            var.kind = VariableKind::Event;
            var.access = access;
            var.is_static = modifiers.is_static;
            var.has_get = true;
            var.has_set = true;
            self.program.class_mut(id).variables.push(var);
        }
    }

    fn discover_method(&mut self, id: ClassId, method: MethodDecl) {
        let modifiers = Modifiers::parse(&method.modifiers);
        let mut function = Function::new(method.name);
        function.access = modifiers.access_in(self.owner_declaration(id));
        function.declaration = modifiers.declaration;
        function.is_static = modifiers.is_static;
        function.is_async = modifiers.is_async;
        function.is_override = modifiers.is_override;
        function.generic_args = method.generic_params;
        function.parameters = method.params.into_iter().map(parameter).collect();
        let returns = VariableType::from_syntax(&method.returns);
        function.return_type = (!returns.is_void()).then_some(returns);
        function.body = method.body;
        self.push_function(id, function);
    }

    fn discover_constructor(&mut self, id: ClassId, ctor: ConstructorDecl) {
        let modifiers = Modifiers::parse(&ctor.modifiers);
        let mut function = Function::new(ctor.name);
        function.access = modifiers.access_in(self.owner_declaration(id));
        function.is_static = modifiers.is_static;
        function.is_constructor = true;
        function.parameters = ctor.params.into_iter().map(parameter).collect();
        function.chained_constructor = ctor.initializer;
        function.body = ctor.body;
        self.push_function(id, function);
    }

    /// Attach a function to its class and scan its body for metadata.
    fn push_function(&mut self, id: ClassId, mut function: Function) {
        let index = self.program.class(id).functions.len();
        let mark = self.scope.mark();
        self.scope.push(Frame::Function { class: id, index });

        if let Some(body) = &function.body {
            let mut scan = BodyScan::new(self.semantic.model());
            scan.scan_body(body, function.return_type.is_some());
            let (returns, variables) = scan.finish();
            function.analyzed_returns = returns;
            function.body_variables = variables;
        }
        self.program.class_mut(id).functions.push(function);

        self.scope.restore(mark);
    }

    fn discover_delegate(
        &mut self,
        decl: DelegateDecl,
        namespace: Option<&str>,
    ) -> Result<(), ModelError> {
        if self.program.rules.ignores_class(&decl.name) {
            self.stats.skipped_classes += 1;
            return Ok(());
        }
        let mut class = Class::new(decl.name, DeclarationType::Delegate);
        class.namespace = namespace.map(str::to_string);
        class.generic_args = decl.generic_params;
        class.semantic = Some(self.semantic.clone());

        let mut invoke = Function::new("Invoke");
        invoke.access = AccessType::Public;
        invoke.parameters = decl.params.into_iter().map(parameter).collect();
        let returns = VariableType::from_syntax(&decl.returns);
        invoke.return_type = (!returns.is_void()).then_some(returns);
        class.functions.push(invoke);

        self.program.add_class(class)?;
        self.stats.classes += 1;
        Ok(())
    }
}

fn parameter(decl: ParameterDecl) -> Parameter {
    let modifiers = decl
        .modifiers
        .iter()
        .filter_map(|m| ParameterModifiers::from_token(m))
        .fold(ParameterModifiers::empty(), |acc, m| acc | m);
    Parameter {
        ty: VariableType::from_syntax(&decl.ty),
        default: decl.default.as_ref().and_then(literal_text),
        name: decl.name,
        modifiers,
    }
}

/// Literal text of a constant-ish expression, if it is one.
fn literal_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal {
            literal: LiteralKind::String,
            text,
            ..
        } => Some(format!("\"{}\"", text)),
        Expr::Literal {
            literal: LiteralKind::Char,
            text,
            ..
        } => Some(format!("'{}'", text)),
        Expr::Literal { text, .. } => Some(text.clone()),
        Expr::PrefixUnary {
            op: UnaryOp::Minus,
            operand,
            ..
        } => literal_text(operand).map(|t| format!("-{}", t)),
        Expr::Default { .. } => Some("default".to_string()),
        _ => None,
    }
}

fn set_initializer(var: &mut Variable, init: Option<Expr>) {
    match init {
        Some(expr) => match literal_text(&expr) {
            Some(text) => var.assignment = Some(text),
            None => var.initializer = Some(expr),
        },
        None => var.assignment = var.ty.default_value().map(str::to_string),
    }
}
