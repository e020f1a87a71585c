//! Core binding model for tsbind: types, namespaces, overload resolution

pub mod closures;
pub mod error;
pub mod fqn;
pub mod ir;
pub mod namespace;
pub mod naming;
pub mod overloads;
pub mod types;

pub use closures::ClosureRegistry;
pub use error::ModelError;
pub use fqn::QualifiedName;
pub use ir::{ClassOrInterface, ClassType, EntityId, InterfaceType, Program};
pub use namespace::{Namespace, NamespaceTree};
pub use overloads::{ListOfFunctions, ResolvedFunction};
pub use types::{
    cmp_types, types_are_same, ClassId, EntityRef, FunctionType, InterfaceId, NamedFunction,
    NamespaceId, Type, Variable,
};
