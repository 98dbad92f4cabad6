//! Member conflict resolution.
//!
//! Runs once over the complete program. This is the only pass that writes
//! `remap` fields:
//! - multiple instance constructors become `New1..NewN`
//! - same-class overloads become `Name2`, `Name3`, ...
//! - a derived method that shares a name but not an arity with a method on
//!   a non-interface base gets a numeric suffix from a per-class counter
//! - static variables of redirected classes get `remap_class`

use retarget_model::{ClassId, Program};
use std::collections::BTreeMap;

/// Counters reported by [`resolve_program`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub classes: usize,
    pub renamed: usize,
}

pub fn resolve_program(program: &mut Program) -> ResolveStats {
    let mut stats = ResolveStats::default();
    for id in program.class_ids() {
        if let Some(renamed) = resolve_class(program, id) {
            stats.classes += 1;
            stats.renamed += renamed;
        }
    }
    tracing::debug!(
        classes = stats.classes,
        renamed = stats.renamed,
        "resolution complete"
    );
    stats
}

/// Resolve one class. Returns the number of renamed members, or `None` if
/// the class was already resolved.
pub fn resolve_class(program: &mut Program, id: ClassId) -> Option<usize> {
    if program.class(id).resolved {
        return None;
    }
    let mut renamed = rename_constructors(program, id);
    renamed += rename_overloads(program, id);
    renamed += rename_inherited(program, id);
    redirect_statics(program, id);
    program.class_mut(id).resolved = true;
    Some(renamed)
}

fn rename_constructors(program: &mut Program, id: ClassId) -> usize {
    let class = program.class_mut(id);
    let indices: Vec<usize> = class.constructors().map(|(i, _)| i).collect();
    if indices.len() < 2 {
        return 0;
    }
    for (n, index) in indices.iter().enumerate() {
        let remap = format!("New{}", n + 1);
        tracing::trace!(class = %class.name, %remap, "renaming constructor");
        class.functions[*index].remap = Some(remap);
    }
    indices.len()
}

fn rename_overloads(program: &mut Program, id: ClassId) -> usize {
    let class = program.class_mut(id);
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut renamed = 0;
    for function in class.functions.iter_mut().filter(|f| !f.is_constructor) {
        let count = seen.entry(function.name.clone()).or_default();
        *count += 1;
        if *count > 1 {
            let remap = format!("{}{}", function.name, count);
            tracing::trace!(class = %class.name, %remap, "renaming overload");
            function.remap = Some(remap);
            renamed += 1;
        }
    }
    renamed
}

fn rename_inherited(program: &mut Program, id: ClassId) -> usize {
    let chain = program.base_chain(id);
    let class = program.class(id);

    if chain.is_empty() {
        let unresolved: Vec<&str> = class
            .extensions
            .iter()
            .filter(|ext| program.find_class(ext).is_none())
            .map(String::as_str)
            .collect();
        if !unresolved.is_empty() {
            tracing::debug!(
                class = %class.name,
                bases = ?unresolved,
                "unresolved extensions, no inherited conflicts checked"
            );
        }
        return 0;
    }

    // Derived methods that share a name, but no arity, with a base method.
    let conflicts: Vec<usize> = class
        .functions
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.is_constructor)
        .filter(|(_, f)| {
            let base_arities: Vec<usize> = chain
                .iter()
                .flat_map(|base| &program.class(*base).functions)
                .filter(|b| !b.is_constructor && b.name == f.name)
                .map(|b| b.arity())
                .collect();
            !base_arities.is_empty() && !base_arities.contains(&f.arity())
        })
        .map(|(i, _)| i)
        .collect();

    let class = program.class_mut(id);
    for (counter, index) in conflicts.iter().enumerate() {
        let function = &mut class.functions[*index];
        let remap = format!("{}{}", function.emitted_name(), counter + 1);
        tracing::debug!(
            class = %class.name,
            method = %function.name,
            %remap,
            "inherited member conflict"
        );
        function.remap = Some(remap);
    }
    conflicts.len()
}

fn redirect_statics(program: &mut Program, id: ClassId) {
    let Some(target) = program.rules.static_redirects.get(&program.class(id).name).cloned() else {
        return;
    };
    for var in program
        .class_mut(id)
        .variables
        .iter_mut()
        .filter(|v| v.is_static)
    {
        var.remap_class = Some(target.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_model::{
        Class, DeclarationType, Function, Parameter, ParameterModifiers, Variable, VariableType,
    };

    fn param(name: &str) -> Parameter {
        Parameter {
            name: name.into(),
            ty: VariableType::object("object"),
            modifiers: ParameterModifiers::empty(),
            default: None,
        }
    }

    fn method(name: &str, arity: usize) -> Function {
        let mut f = Function::new(name);
        f.parameters = (0..arity).map(|i| param(&format!("p{i}"))).collect();
        f
    }

    fn ctor(name: &str, arity: usize) -> Function {
        let mut f = method(name, arity);
        f.is_constructor = true;
        f
    }

    fn emitted(program: &Program, id: ClassId) -> Vec<String> {
        program
            .class(id)
            .functions
            .iter()
            .map(|f| f.emitted_name().to_string())
            .collect()
    }

    #[test]
    fn single_constructor_keeps_name() {
        let mut program = Program::default();
        let mut class = Class::new("C", DeclarationType::Class);
        class.functions.push(ctor("C", 1));
        let mut static_ctor = ctor("C", 0);
        static_ctor.is_static = true;
        class.functions.push(static_ctor);
        let id = program.add_class(class).unwrap();

        resolve_program(&mut program);
        assert_eq!(emitted(&program, id), vec!["C", "C"]);
    }

    #[test]
    fn overloads_numbered_from_two() {
        let mut program = Program::default();
        let mut class = Class::new("Log", DeclarationType::Class);
        class.functions.push(method("Write", 0));
        class.functions.push(method("Flush", 0));
        class.functions.push(method("Write", 1));
        class.functions.push(method("Write", 2));
        let id = program.add_class(class).unwrap();

        resolve_program(&mut program);
        assert_eq!(emitted(&program, id), vec!["Write", "Flush", "Write2", "Write3"]);
    }

    #[test]
    fn counter_shared_across_conflicts() {
        let mut program = Program::default();
        let mut base = Class::new("Base", DeclarationType::Class);
        base.functions.push(method("A", 0));
        base.functions.push(method("B", 0));
        base.functions.push(method("C", 1));
        program.add_class(base).unwrap();

        let mut derived = Class::new("Derived", DeclarationType::Class);
        derived.extensions.push("Base".into());
        derived.functions.push(method("A", 1));
        derived.functions.push(method("C", 1));
        derived.functions.push(method("B", 2));
        let id = program.add_class(derived).unwrap();

        resolve_program(&mut program);
        assert_eq!(emitted(&program, id), vec!["A1", "C", "B2"]);
    }

    #[test]
    fn transitive_base_and_interfaces() {
        let mut program = Program::default();
        let mut root = Class::new("Root", DeclarationType::Class);
        root.functions.push(method("Run", 0));
        program.add_class(root).unwrap();

        let mut middle = Class::new("Middle", DeclarationType::Abstract);
        middle.extensions.push("Root".into());
        program.add_class(middle).unwrap();

        let mut iface = Class::new("IRunner", DeclarationType::Interface);
        iface.functions.push(method("Go", 0));
        program.add_class(iface).unwrap();

        let mut leaf = Class::new("Leaf", DeclarationType::Class);
        leaf.extensions = vec!["Middle".into(), "IRunner".into()];
        leaf.functions.push(method("Run", 3));
        leaf.functions.push(method("Go", 2));
        let id = program.add_class(leaf).unwrap();

        resolve_program(&mut program);
        assert_eq!(emitted(&program, id), vec!["Run1", "Go"]);
    }

    #[test]
    fn unresolved_base_raises_nothing() {
        let mut program = Program::default();
        let mut class = Class::new("Widget", DeclarationType::Class);
        class.extensions.push("MonoBehaviour".into());
        class.functions.push(method("Update", 1));
        let id = program.add_class(class).unwrap();

        resolve_program(&mut program);
        assert_eq!(emitted(&program, id), vec!["Update"]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut program = Program::default();
        let mut class = Class::new("C", DeclarationType::Class);
        class.functions.push(ctor("C", 1));
        class.functions.push(ctor("C", 2));
        let id = program.add_class(class).unwrap();

        let first = resolve_program(&mut program);
        let second = resolve_program(&mut program);
        assert_eq!(first.renamed, 2);
        assert_eq!(second, ResolveStats::default());
        assert_eq!(emitted(&program, id), vec!["New1", "New2"]);
    }

    #[test]
    fn static_redirects_only_touch_statics() {
        let mut program = Program::default();
        program
            .rules
            .static_redirects
            .insert("Settings".into(), "Config".into());
        let mut class = Class::new("Settings", DeclarationType::Class);
        let mut shared = Variable::new("Shared", VariableType::object("object"));
        shared.is_static = true;
        class.variables.push(shared);
        class
            .variables
            .push(Variable::new("Local", VariableType::object("object")));
        let id = program.add_class(class).unwrap();

        resolve_program(&mut program);
        let vars = &program.class(id).variables;
        assert_eq!(vars[0].remap_class.as_deref(), Some("Config"));
        assert_eq!(vars[1].remap_class, None);
    }
}
