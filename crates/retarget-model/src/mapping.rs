//! Mapping type descriptors to target syntax.
//!
//! Resolution order for a [`VariableType`]:
//!
//! 1. Container kinds (Array/List/Dictionary/Tuple) go through the
//!    backend's [`ContainerSyntax`] rules, keyed by kind.
//! 2. Callbacks go through the callback rule.
//! 3. Descriptors without generic arguments are looked up in the primitive
//!    [`TypeMap`].
//! 4. Names in the [`KnownClasses`] registry map to their target identifier
//!    and record the required import in the [`ImportTracker`].
//! 5. Anything else keeps its name, with generic arguments mapped.

use crate::types::{TypeKind, VariableType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Backend-supplied primitive name substitution table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMap {
    entries: BTreeMap<String, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(source.into(), target.into());
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Entries from `other` win.
    pub fn extend(&mut self, other: &TypeMap) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A source type the target provides through a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownClass {
    /// Source type name (`List`).
    pub name: String,
    /// Target identifier (`List`, `Map`, ...).
    pub target: String,
    /// Import the backend emits when the class is used, in the backend's
    /// own syntax.
    #[serde(default)]
    pub import: Option<String>,
    /// Generic arity this entry applies to; 0 matches any.
    #[serde(default)]
    pub arity: usize,
}

impl KnownClass {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            import: None,
            arity: 0,
        }
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = Some(import.into());
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }
}

/// Known-class registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownClasses {
    entries: Vec<KnownClass>,
}

impl KnownClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations shadow earlier ones with the same name and arity.
    pub fn register(&mut self, class: KnownClass) {
        self.entries
            .retain(|c| !(c.name == class.name && c.arity == class.arity));
        self.entries.push(class);
    }

    /// Exact-arity entries win over arity-agnostic ones.
    pub fn get(&self, name: &str, arity: usize) -> Option<&KnownClass> {
        self.entries
            .iter()
            .find(|c| c.name == name && c.arity == arity && arity > 0)
            .or_else(|| self.entries.iter().find(|c| c.name == name && c.arity == 0))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<KnownClass> for KnownClasses {
    fn from_iter<I: IntoIterator<Item = KnownClass>>(iter: I) -> Self {
        let mut classes = Self::new();
        for class in iter {
            classes.register(class);
        }
        classes
    }
}

/// Deduplicated set of import paths collected while mapping and lowering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTracker {
    imports: BTreeSet<String>,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the path was already tracked.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        self.imports.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.imports.contains(path)
    }

    pub fn merge(&mut self, other: ImportTracker) {
        self.imports.extend(other.imports);
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Take all tracked paths, sorted.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.imports).into_iter().collect()
    }
}

/// Target syntax for composite types, supplied by the backend.
pub trait ContainerSyntax {
    fn array(&self, element: &str) -> String;
    fn list(&self, element: &str) -> String;
    fn dictionary(&self, key: &str, value: &str) -> String;
    fn tuple(&self, elements: &[String]) -> String;
    fn callback(&self, params: &[String], returns: Option<&str>) -> String;
    fn generic(&self, name: &str, args: &[String]) -> String;
    fn nullable(&self, inner: &str) -> String;
    /// Spelling for types nothing is known about.
    fn unknown(&self) -> String;
}

/// Maps descriptors using one backend's tables.
pub struct TypeMapper<'a, S: ContainerSyntax + ?Sized> {
    primitives: &'a TypeMap,
    known: &'a KnownClasses,
    syntax: &'a S,
}

impl<'a, S: ContainerSyntax + ?Sized> TypeMapper<'a, S> {
    pub fn new(primitives: &'a TypeMap, known: &'a KnownClasses, syntax: &'a S) -> Self {
        Self {
            primitives,
            known,
            syntax,
        }
    }

    /// Map a descriptor, recording any import a known class requires.
    pub fn map(&self, ty: &VariableType, imports: &mut ImportTracker) -> String {
        let mapped = self.map_inner(ty, imports);
        if ty.nullable {
            self.syntax.nullable(&mapped)
        } else {
            mapped
        }
    }

    fn map_inner(&self, ty: &VariableType, imports: &mut ImportTracker) -> String {
        match ty.kind {
            TypeKind::Array => {
                let element = self.first_arg(ty, 0, imports);
                return self.syntax.array(&element);
            }
            TypeKind::List => {
                let element = self.first_arg(ty, 0, imports);
                return self.syntax.list(&element);
            }
            TypeKind::Dictionary => {
                let key = self.first_arg(ty, 0, imports);
                let value = self.first_arg(ty, 1, imports);
                return self.syntax.dictionary(&key, &value);
            }
            TypeKind::Tuple => {
                let elements = self.map_all(&ty.generic_args, imports);
                return self.syntax.tuple(&elements);
            }
            TypeKind::Callback => {
                let params = self.map_all(&ty.args, imports);
                let returns = ty.generic_args.first().map(|r| self.map(r, imports));
                return self.syntax.callback(&params, returns.as_deref());
            }
            _ => {}
        }

        if ty.generic_args.is_empty()
            && let Some(target) = self.primitives.get(&ty.name)
        {
            return target.to_string();
        }

        if ty.name.is_empty() {
            return self.syntax.unknown();
        }

        let args = self.map_all(&ty.generic_args, imports);
        let name = match self.known.get(&ty.name, ty.generic_args.len()) {
            Some(known) => {
                if let Some(import) = &known.import {
                    imports.add(import.clone());
                }
                known.target.as_str()
            }
            None => ty.name.as_str(),
        };
        if args.is_empty() {
            name.to_string()
        } else {
            self.syntax.generic(name, &args)
        }
    }

    fn first_arg(&self, ty: &VariableType, index: usize, imports: &mut ImportTracker) -> String {
        match ty.generic_args.get(index) {
            Some(arg) => self.map(arg, imports),
            None => self.syntax.unknown(),
        }
    }

    fn map_all(&self, types: &[VariableType], imports: &mut ImportTracker) -> Vec<String> {
        types.iter().map(|t| self.map(t, imports)).collect()
    }
}
