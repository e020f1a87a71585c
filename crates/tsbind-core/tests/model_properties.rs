//! Property tests for the type order and the overload resolver

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use tsbind_core::overloads::num_to_abc;
use tsbind_core::{
    cmp_types, ClassId, EntityRef, FunctionType, InterfaceId, ListOfFunctions, NamedFunction,
    Type, Variable,
};

fn primitive() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Any),
        Just(Type::Unknown),
        Just(Type::Number),
        Just(Type::String),
        Just(Type::Bool),
        Just(Type::Symbol),
        Just(Type::Undefined),
        Just(Type::Null),
        Just(Type::Void),
        Just(Type::Never),
    ]
}

fn entity() -> impl Strategy<Value = Type> {
    let names = prop::sample::select(vec!["Sprite", "Container", "Point"]);
    (names, 0usize..3, any::<bool>()).prop_map(|(name, id, is_class)| {
        let qualified_name = format!("pixi::{}", name);
        if is_class {
            Type::Class(EntityRef {
                id: ClassId(id),
                name: name.to_string(),
                qualified_name,
            })
        } else {
            Type::Interface(EntityRef {
                id: InterfaceId(id),
                name: name.to_string(),
                qualified_name,
            })
        }
    })
}

fn any_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![primitive(), entity()];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Type::Optional(Box::new(t))),
            (
                prop::collection::vec(
                    (prop::sample::select(vec!["a", "b"]), inner.clone()),
                    0..3
                ),
                inner
            )
                .prop_map(|(params, ret)| {
                    let params = params
                        .into_iter()
                        .map(|(name, ty)| Variable::new(name, "", ty))
                        .collect();
                    Type::Function(Arc::new(FunctionType::new(params, ret)))
                }),
        ]
    })
}

fn named_function() -> impl Strategy<Value = NamedFunction> {
    let names = prop::sample::select(vec!["on", "off", "emit", "on_1", "emit_2a"]);
    (names, prop::collection::vec(primitive(), 0..3), primitive()).prop_map(
        |(name, params, ret)| {
            let params = params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| Variable::new(format!("arg{}", i), "", ty))
                .collect();
            NamedFunction::new(name, FunctionType::new(params, ret))
        },
    )
}

proptest! {
    #[test]
    fn cmp_types_is_reflexive(a in any_type()) {
        prop_assert_eq!(cmp_types(&a, &a), Ordering::Equal);
    }

    #[test]
    fn cmp_types_is_antisymmetric(a in any_type(), b in any_type()) {
        prop_assert_eq!(cmp_types(&a, &b), cmp_types(&b, &a).reverse());
    }

    #[test]
    fn cmp_types_is_transitive(a in any_type(), b in any_type(), c in any_type()) {
        let mut sorted = vec![a, b, c];
        sorted.sort();
        prop_assert_ne!(cmp_types(&sorted[0], &sorted[1]), Ordering::Greater);
        prop_assert_ne!(cmp_types(&sorted[1], &sorted[2]), Ordering::Greater);
        prop_assert_ne!(cmp_types(&sorted[0], &sorted[2]), Ordering::Greater);
        if cmp_types(&sorted[0], &sorted[1]) == Ordering::Equal
            && cmp_types(&sorted[1], &sorted[2]) == Ordering::Equal
        {
            prop_assert_eq!(cmp_types(&sorted[0], &sorted[2]), Ordering::Equal);
        }
    }

    #[test]
    fn optional_of_undefinable_is_noop(a in any_type()) {
        let wrapped = a.clone().optional();
        if a.can_be_undefined() {
            prop_assert_eq!(wrapped, a);
        } else {
            prop_assert_eq!(wrapped.clone().optional(), wrapped);
        }
    }

    #[test]
    fn num_to_abc_is_injective(n in 0usize..100_000, m in 0usize..100_000) {
        prop_assume!(n != m);
        prop_assert_ne!(num_to_abc(n), num_to_abc(m));
    }

    #[test]
    fn resolved_names_are_unique(functions in prop::collection::vec(named_function(), 0..12)) {
        let mut list = ListOfFunctions::new();
        for f in functions {
            list.add(f);
        }
        let resolved = list.resolved_functions().unwrap();
        prop_assert_eq!(resolved.len(), list.len());
        let names: HashSet<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(names.len(), resolved.len());
        prop_assert!(names.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn resolution_ignores_insertion_order(
        functions in prop::collection::vec(named_function(), 0..12),
        seed in any::<u64>(),
    ) {
        let mut shuffled = functions.clone();
        // Deterministic rotation + reversal in place of a random shuffle
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
        }
        if seed % 2 == 0 {
            shuffled.reverse();
        }

        let mut a = ListOfFunctions::new();
        let mut b = ListOfFunctions::new();
        functions.into_iter().for_each(|f| { a.add(f); });
        shuffled.into_iter().for_each(|f| { b.add(f); });

        let names_a: Vec<(String, String)> = a
            .resolved_functions()
            .unwrap()
            .into_iter()
            .map(|r| (r.name, r.function.signature.short_name()))
            .collect();
        let names_b: Vec<(String, String)> = b
            .resolved_functions()
            .unwrap()
            .into_iter()
            .map(|r| (r.name, r.function.signature.short_name()))
            .collect();
        prop_assert_eq!(names_a, names_b);
    }
}

#[test]
fn num_to_abc_small_values() {
    let first: Vec<String> = (0..3).map(num_to_abc).collect();
    assert_eq!(first, ["a", "b", "c"]);
    assert_eq!(num_to_abc(25), "z");
    assert_eq!(num_to_abc(26), "ba");
}
