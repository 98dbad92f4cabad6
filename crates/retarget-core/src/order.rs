//! Deterministic emission order.
//!
//! Classes: delegates, enums, interfaces, abstract classes, then the rest;
//! ties break on extension count, then name. Variables: statics first, then
//! access level, then name. Functions: access level, then name.
//!
//! All sorts are stable, so a second pass is a no-op.

use retarget_model::{Class, Program};
use std::cmp::Ordering;

pub fn sort_program(program: &mut Program) {
    let classes = program.classes_mut();
    classes.sort_by(class_order);
    for class in classes.iter_mut() {
        sort_members(class);
    }
    program.freeze();
    tracing::debug!(classes = program.len(), "sort complete, emission order frozen");
}

fn class_order(a: &Class, b: &Class) -> Ordering {
    a.declaration
        .sort_rank()
        .cmp(&b.declaration.sort_rank())
        .then_with(|| a.extensions.len().cmp(&b.extensions.len()))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_members(class: &mut Class) {
    class
        .variables
        .sort_by(|a, b| (!a.is_static, a.access, &a.name).cmp(&(!b.is_static, b.access, &b.name)));
    class
        .functions
        .sort_by(|a, b| (a.access, &a.name).cmp(&(b.access, &b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_model::{AccessType, DeclarationType, Function, Variable, VariableType};

    fn names(program: &Program) -> Vec<&str> {
        program.classes().iter().map(|c| c.name.as_str()).collect()
    }

    fn program() -> Program {
        let mut program = Program::default();
        let mut add = |name: &str, declaration, extensions: &[&str]| {
            let mut class = Class::new(name, declaration);
            class.extensions = extensions.iter().map(|e| e.to_string()).collect();
            program.add_class(class).unwrap();
        };
        add("Zebra", DeclarationType::Class, &[]);
        add("Player", DeclarationType::Class, &["Actor", "IDamageable"]);
        add("Actor", DeclarationType::Abstract, &[]);
        add("IDamageable", DeclarationType::Interface, &[]);
        add("Callback", DeclarationType::Delegate, &[]);
        add("Color", DeclarationType::Enum, &[]);
        add("Apple", DeclarationType::Struct, &[]);
        add("IKillable", DeclarationType::Interface, &["IDamageable"]);
        program
    }

    #[test]
    fn class_ranks_and_tie_breaks() {
        let mut program = program();
        sort_program(&mut program);
        assert_eq!(
            names(&program),
            vec![
                "Callback",
                "Color",
                "IDamageable",
                "IKillable",
                "Actor",
                "Apple",
                "Zebra",
                "Player"
            ]
        );
        assert!(program.is_frozen());
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let mut program = program();
        sort_program(&mut program);
        let once: Vec<String> = names(&program).into_iter().map(String::from).collect();
        sort_program(&mut program);
        assert_eq!(names(&program), once);
    }

    #[test]
    fn members_sorted() {
        let mut class = Class::new("C", DeclarationType::Class);
        let var = |name: &str, is_static, access| {
            let mut v = Variable::new(name, VariableType::object("object"));
            v.is_static = is_static;
            v.access = access;
            v
        };
        class.variables = vec![
            var("b", false, AccessType::Public),
            var("z", true, AccessType::Private),
            var("a", false, AccessType::Private),
            var("c", false, AccessType::Public),
            var("y", true, AccessType::Public),
        ];
        let func = |name: &str, access| {
            let mut f = Function::new(name);
            f.access = access;
            f
        };
        class.functions = vec![
            func("Update", AccessType::Private),
            func("Start", AccessType::Public),
            func("Awake", AccessType::Protected),
            func("Reset", AccessType::Public),
        ];

        sort_members(&mut class);
        let vars: Vec<&str> = class.variables.iter().map(|v| v.name.as_str()).collect();
        let funcs: Vec<&str> = class.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(vars, vec!["y", "z", "b", "c", "a"]);
        assert_eq!(funcs, vec!["Reset", "Start", "Awake", "Update"]);
    }
}
