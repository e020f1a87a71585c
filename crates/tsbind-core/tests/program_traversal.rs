//! Inheritance traversal over a hand-built program

use pretty_assertions::assert_eq;
use tsbind_core::{ClassOrInterface, EntityId, NamespaceTree, Program};

/// A extends {B, C}; B extends D; C extends D
fn diamond() -> (Program, EntityId) {
    let mut program = Program::new();
    let ns = NamespaceTree::ROOT;
    let a = program.get_or_create_interface(ns, "A", "");
    let b = program.get_or_create_interface(ns, "B", "");
    let c = program.get_or_create_interface(ns, "C", "");
    let d = program.get_or_create_interface(ns, "D", "");

    let (b_ref, c_ref, d_ref) = (
        program.interface_ref(b),
        program.interface_ref(c),
        program.interface_ref(d),
    );
    program.interface_mut(a).add_direct_impl(b_ref);
    program.interface_mut(a).add_direct_impl(c_ref);
    program.interface_mut(b).add_direct_impl(d_ref.clone());
    program.interface_mut(c).add_direct_impl(d_ref);

    (program, EntityId::Interface(a))
}

#[test]
fn diamond_visits_shared_ancestor_once_and_first() {
    let (program, a) = diamond();
    let mut order = Vec::new();
    program.for_each_super_impl(a, |_, iface| order.push(iface.name.clone()));
    assert_eq!(order, vec!["D", "B", "C", "A"]);
}

#[test]
fn class_traversal_starts_at_direct_impls() {
    let (mut program, a) = diamond();
    let EntityId::Interface(a_id) = a else {
        unreachable!()
    };
    let class = program.get_or_create_class(NamespaceTree::ROOT, "Impl", "");
    let a_ref = program.interface_ref(a_id);
    program.class_mut(class).add_direct_impl(a_ref);

    let mut order = Vec::new();
    program.for_each_super_impl(EntityId::Class(class), |_, iface| {
        order.push(iface.name.clone())
    });
    assert_eq!(order, vec!["D", "B", "C", "A"]);
}

#[test]
fn program_serializes_resolved_names() {
    use tsbind_core::{FunctionType, NamedFunction, Type, Variable};

    let mut program = Program::new();
    let ns = program.namespaces.namespace_at(&["Foo"]).unwrap();
    let class = program.get_or_create_class(ns, "Foo", "");
    let methods = &mut program.class_mut(class).methods;
    methods.add(NamedFunction::new(
        "bar",
        FunctionType::new(vec![Variable::new("x", "number", Type::Number)], Type::Void),
    ));
    methods.add(NamedFunction::new(
        "bar",
        FunctionType::new(
            vec![
                Variable::new("x", "string", Type::String),
                Variable::new("y", "number", Type::Number),
            ],
            Type::Void,
        ),
    ));

    let json = serde_json::to_value(&program).unwrap();
    let names: Vec<&str> = json["classes"][0]["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["bar", "bar_2"]);
}
