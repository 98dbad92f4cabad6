//! Program IR: classes and their members.
//!
//! Classes live in one arena ([`Program::classes`]) and refer to each other
//! by name only. Extensions are resolved by lookup at the time of use, so a
//! base that is declared later, ignored, or entirely unknown never leaves a
//! dangling reference behind.

use crate::mapping::TypeMap;
use crate::rules::Rules;
use crate::types::VariableType;
use bitflags::bitflags;
use retarget_syntax::{Body, ConstructorInitializer, Expr, SemanticModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot add class `{class}`: emission order is already frozen")]
    Frozen { class: String },
}

/// Index of a class in [`Program::classes`].
///
/// Ids are positions, so they are only stable between sorts; sorting
/// happens once, after which the order is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub usize);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Tagged declaration form shared by classes and members.
///
/// Classes use every variant but `Virtual`; members use `Class` (plain),
/// `Abstract` and `Virtual`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationType {
    #[default]
    Class,
    Struct,
    Interface,
    Abstract,
    Enum,
    Delegate,
    Virtual,
}

impl DeclarationType {
    /// Emission rank: delegates, enums, interfaces, abstract classes, rest.
    pub fn sort_rank(self) -> u8 {
        match self {
            DeclarationType::Delegate => 0,
            DeclarationType::Enum => 1,
            DeclarationType::Interface => 2,
            DeclarationType::Abstract => 3,
            _ => 4,
        }
    }
}

/// Member visibility, ordered from most to least visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AccessType {
    Public,
    Internal,
    Protected,
    #[default]
    Private,
}

bitflags! {
    /// Parameter passing modifiers.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ParameterModifiers: u8 {
        const IN = 1 << 0;
        const OUT = 1 << 1;
        const REF = 1 << 2;
        const PARAMS = 1 << 3;
        const THIS = 1 << 4;
    }
}

impl ParameterModifiers {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "in" => Some(Self::IN),
            "out" => Some(Self::OUT),
            "ref" => Some(Self::REF),
            "params" => Some(Self::PARAMS),
            "this" => Some(Self::THIS),
            _ => None,
        }
    }

    /// Passed through a box the callee writes to.
    pub fn is_by_reference(self) -> bool {
        self.intersects(Self::OUT | Self::REF)
    }
}

/// Shared handle to the semantic oracle of the document a class came from.
#[derive(Debug, Clone)]
pub struct SemanticHandle(Arc<dyn SemanticModel>);

impl SemanticHandle {
    pub fn new(model: Arc<dyn SemanticModel>) -> Self {
        Self(model)
    }

    pub fn model(&self) -> &dyn SemanticModel {
        self.0.as_ref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: VariableType,
    pub modifiers: ParameterModifiers,
    /// Default-value literal as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A local declared inside a function body.
///
/// Sibling blocks may each declare a local with the same name; `occurrence`
/// counts earlier declarations of that name in source order, so each
/// declaration site has its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyVariable {
    pub name: String,
    pub occurrence: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<VariableType>,
    pub reassigned: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Function {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remap: Option<String>,
    pub access: AccessType,
    pub declaration: DeclarationType,
    pub is_static: bool,
    pub is_async: bool,
    pub is_constructor: bool,
    pub is_override: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<String>,
    pub parameters: Vec<Parameter>,
    /// Absent for void functions and constructors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<VariableType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub analyzed_returns: Vec<VariableType>,
    #[serde(skip)]
    pub body: Option<Body>,
    #[serde(skip)]
    pub chained_constructor: Option<ConstructorInitializer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body_variables: Vec<BodyVariable>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Identifier the target sees.
    pub fn emitted_name(&self) -> &str {
        self.remap.as_deref().unwrap_or(&self.name)
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Most recently declared local with this name.
    pub fn body_variable(&self, name: &str) -> Option<&BodyVariable> {
        self.body_variables.iter().rev().find(|v| v.name == name)
    }

    /// The `occurrence`-th declaration of `name` in source order.
    pub fn declared_variable(&self, name: &str, occurrence: usize) -> Option<&BodyVariable> {
        self.body_variables
            .iter()
            .find(|v| v.name == name && v.occurrence == occurrence)
    }

    /// Declared return type, unless every analyzed `return` site agrees on a
    /// different one.
    pub fn effective_return_type(&self) -> Option<&VariableType> {
        let declared = self.return_type.as_ref()?;
        let (first, rest) = match self.analyzed_returns.split_first() {
            Some(split) => split,
            None => return Some(declared),
        };
        if first != declared && rest.iter().all(|t| t == first) {
            Some(first)
        } else {
            Some(declared)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    #[default]
    Field,
    Property,
    Event,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Variable {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remap: Option<String>,
    /// Class that static access to this member is redirected to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remap_class: Option<String>,
    pub ty: VariableType,
    pub kind: VariableKind,
    pub access: AccessType,
    pub declaration: DeclarationType,
    pub is_static: bool,
    pub is_override: bool,
    pub is_readonly: bool,
    pub has_get: bool,
    pub has_set: bool,
    /// Literal initializer as written, or a default derived from the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<String>,
    /// Non-literal initializer, lowered on demand.
    #[serde(skip)]
    pub initializer: Option<Expr>,
    #[serde(skip)]
    pub get_body: Option<Body>,
    #[serde(skip)]
    pub set_body: Option<Body>,
    #[serde(skip)]
    pub expression_body: Option<Expr>,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: VariableType) -> Self {
        Self {
            name: name.into(),
            ty,
            ..Self::default()
        }
    }

    pub fn emitted_name(&self) -> &str {
        self.remap.as_deref().unwrap_or(&self.name)
    }

    /// Auto-property or field: no accessor logic to lower.
    pub fn is_plain(&self) -> bool {
        self.get_body.is_none() && self.set_body.is_none() && self.expression_body.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Class {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub declaration: DeclarationType,
    pub is_static: bool,
    /// Base and interface names, resolved lazily.
    pub extensions: Vec<String>,
    /// Source spelling of each extension, for display only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension_display: Vec<String>,
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_members: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub referenced_classes: Vec<String>,
    #[serde(skip)]
    pub semantic: Option<SemanticHandle>,
    #[serde(skip)]
    pub resolved: bool,
}

impl Class {
    pub fn new(name: impl Into<String>, declaration: DeclarationType) -> Self {
        Self {
            name: name.into(),
            declaration,
            ..Self::default()
        }
    }

    pub fn is_interface(&self) -> bool {
        self.declaration == DeclarationType::Interface
    }

    pub fn variable(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    /// Function by name, preferring an exact arity match.
    pub fn function(&self, name: &str, arity: Option<usize>) -> Option<usize> {
        let mut candidates = self
            .functions
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name == name && !f.is_constructor);
        let first = candidates.clone().next().map(|(i, _)| i);
        match arity {
            Some(arity) => candidates
                .find(|(_, f)| f.arity() == arity)
                .map(|(i, _)| i)
                .or(first),
            None => first,
        }
    }

    /// Instance constructors in declaration order.
    pub fn constructors(&self) -> impl Iterator<Item = (usize, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_constructor && !f.is_static)
    }

    /// Constructor chosen for a call with `arity` arguments.
    pub fn constructor_for(&self, arity: usize) -> Option<&Function> {
        self.constructors()
            .find(|(_, f)| f.arity() == arity)
            .or_else(|| self.constructors().next())
            .map(|(_, f)| f)
    }

    pub fn add_reference(&mut self, name: &str) {
        if name != self.name && !self.referenced_classes.iter().any(|r| r == name) {
            self.referenced_classes.push(name.to_string());
        }
    }
}

/// A member found by [`Program::find_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef {
    Function(ClassId, usize),
    Variable(ClassId, usize),
}

/// IR root.
#[derive(Debug, Default, Serialize)]
pub struct Program {
    classes: Vec<Class>,
    pub rules: Rules,
    pub type_map: TypeMap,
    #[serde(skip)]
    frozen: bool,
}

impl Program {
    pub fn new(rules: Rules, type_map: TypeMap) -> Self {
        Self {
            classes: Vec::new(),
            rules,
            type_map,
            frozen: false,
        }
    }

    /// Drop every class and unfreeze; rules and type map are kept.
    pub fn reset(&mut self) {
        self.classes.clear();
        self.frozen = false;
    }

    pub fn add_class(&mut self, class: Class) -> Result<ClassId, ModelError> {
        if self.frozen {
            return Err(ModelError::Frozen { class: class.name });
        }
        self.classes.push(class);
        Ok(ClassId(self.classes.len() - 1))
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// Mutable view; the slice can be reordered but never shrunk.
    pub fn classes_mut(&mut self) -> &mut [Class] {
        &mut self.classes
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + use<> {
        (0..self.classes.len()).map(ClassId)
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0]
    }

    pub fn get(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.classes.iter().position(|c| c.name == name).map(ClassId)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Transitive non-interface bases of a class, nearest first.
    ///
    /// Unresolvable names are skipped; a visited set stops cycles.
    pub fn base_chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut visited = BTreeSet::from([id]);
        let mut pending: Vec<ClassId> = vec![id];
        while let Some(current) = pending.pop() {
            for ext in &self.class(current).extensions {
                let Some(base) = self.find_class(ext) else {
                    continue;
                };
                if self.class(base).is_interface() || !visited.insert(base) {
                    continue;
                }
                chain.push(base);
                pending.push(base);
            }
        }
        chain
    }

    /// Look a member up on a class, then on everything it extends.
    pub fn find_member(&self, id: ClassId, name: &str, arity: Option<usize>) -> Option<MemberRef> {
        let mut visited = BTreeSet::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            let class = self.class(current);
            if let Some(index) = class.variable(name) {
                return Some(MemberRef::Variable(current, index));
            }
            if let Some(index) = class.function(name, arity) {
                return Some(MemberRef::Function(current, index));
            }
            pending.extend(
                class
                    .extensions
                    .iter()
                    .rev()
                    .filter_map(|ext| self.find_class(ext)),
            );
        }
        None
    }

    pub fn function(&self, id: ClassId, index: usize) -> &Function {
        &self.class(id).functions[index]
    }

    pub fn variable(&self, id: ClassId, index: usize) -> &Variable {
        &self.class(id).variables[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;

    fn class_with(name: &str, extensions: &[&str]) -> Class {
        let mut class = Class::new(name, DeclarationType::Class);
        class.extensions = extensions.iter().map(|e| e.to_string()).collect();
        class
    }

    #[test]
    fn base_chain_skips_interfaces_unknowns_and_cycles() {
        let mut program = Program::default();
        let a = program.add_class(class_with("A", &["C", "Missing"])).unwrap();
        program.add_class(class_with("B", &["A"])).unwrap();
        let c = program.add_class(class_with("C", &["B", "IThing"])).unwrap();
        program
            .add_class(Class::new("IThing", DeclarationType::Interface))
            .unwrap();

        let chain = program.base_chain(a);
        assert_eq!(chain.len(), 2);
        assert!(chain.contains(&c));
        assert!(!chain.contains(&a));
    }

    #[test]
    fn frozen_program_rejects_classes() {
        let mut program = Program::default();
        program.freeze();
        let err = program.add_class(class_with("Late", &[])).unwrap_err();
        assert!(err.to_string().contains("Late"));
        program.reset();
        assert!(program.add_class(class_with("Late", &[])).is_ok());
    }

    #[test]
    fn find_member_walks_extensions() {
        let mut program = Program::default();
        let mut animal = class_with("Animal", &[]);
        animal.functions.push(Function::new("Eat"));
        program.add_class(animal).unwrap();
        let dog = program.add_class(class_with("Dog", &["Animal"])).unwrap();

        let found = program.find_member(dog, "Eat", Some(0));
        assert_eq!(found, Some(MemberRef::Function(ClassId(0), 0)));
        assert_eq!(program.find_member(dog, "Bark", None), None);
    }

    #[test]
    fn function_lookup_prefers_arity() {
        let mut class = class_with("C", &[]);
        class.functions.push(Function::new("Log"));
        let mut two = Function::new("Log");
        for name in ["a", "b"] {
            two.parameters.push(Parameter {
                name: name.into(),
                ty: VariableType::new(TypeKind::Int32, "int"),
                modifiers: ParameterModifiers::empty(),
                default: None,
            });
        }
        class.functions.push(two);
        assert_eq!(class.function("Log", Some(2)), Some(1));
        assert_eq!(class.function("Log", Some(5)), Some(0));
        assert_eq!(class.function("Log", None), Some(0));
    }

    #[test]
    fn effective_return_type_precedence() {
        let int = VariableType::new(TypeKind::Int32, "int");
        let dog = VariableType::object("Dog");
        let cat = VariableType::object("Cat");
        let mut f = Function::new("Make");
        f.return_type = Some(VariableType::object("Animal"));
        assert_eq!(f.effective_return_type().map(|t| t.name.as_str()), Some("Animal"));

        f.analyzed_returns = vec![dog.clone(), dog.clone()];
        assert_eq!(f.effective_return_type(), Some(&dog));

        f.analyzed_returns = vec![dog, cat];
        assert_eq!(f.effective_return_type().map(|t| t.name.as_str()), Some("Animal"));

        f.return_type = None;
        f.analyzed_returns = vec![int];
        assert_eq!(f.effective_return_type(), None);
    }

    #[test]
    fn parameter_modifier_tokens() {
        let flags = ParameterModifiers::from_token("out").unwrap()
            | ParameterModifiers::from_token("this").unwrap();
        assert!(flags.is_by_reference());
        assert!(flags.contains(ParameterModifiers::THIS));
        assert_eq!(ParameterModifiers::from_token("readonly"), None);
    }
}
