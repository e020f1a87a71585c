//! Intermediate representation handed from the collector to emitters

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::closures::ClosureRegistry;
use crate::namespace::NamespaceTree;
use crate::naming::type_ident;
use crate::overloads::ListOfFunctions;
use crate::types::{ClassId, EntityRef, InterfaceId, NamespaceId, Variable};

/// Data shared by classes and interfaces
pub trait ClassOrInterface {
    fn name(&self) -> &str;
    fn namespace(&self) -> NamespaceId;
    fn documentation(&self) -> &str;
    fn direct_impls(&self) -> &[EntityRef<InterfaceId>];
    fn methods(&self) -> &ListOfFunctions;
    fn methods_mut(&mut self) -> &mut ListOfFunctions;
    fn properties(&self) -> &[Variable];
    fn properties_mut(&mut self) -> &mut Vec<Variable>;
    fn direct_impls_mut(&mut self) -> &mut Vec<EntityRef<InterfaceId>>;

    /// Record a directly implemented interface; duplicates (by name) are ignored
    fn add_direct_impl(&mut self, iface: EntityRef<InterfaceId>) -> bool {
        if self
            .direct_impls()
            .iter()
            .any(|existing| existing.qualified_name == iface.qualified_name)
        {
            return false;
        }
        self.direct_impls_mut().push(iface);
        true
    }

    /// Append a property unless an equal one is already present
    fn add_property(&mut self, property: Variable) -> bool {
        if self.properties().contains(&property) {
            return false;
        }
        self.properties_mut().push(property);
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassType {
    pub name: String,
    pub ident: String,
    pub qualified_name: String,
    #[serde(skip)]
    pub namespace: NamespaceId,
    pub documentation: String,
    pub super_class: Option<EntityRef<ClassId>>,
    pub direct_impls: Vec<EntityRef<InterfaceId>>,
    pub constructors: ListOfFunctions,
    pub methods: ListOfFunctions,
    pub static_methods: ListOfFunctions,
    pub properties: Vec<Variable>,
    pub static_properties: Vec<Variable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceType {
    pub name: String,
    pub ident: String,
    pub qualified_name: String,
    #[serde(skip)]
    pub namespace: NamespaceId,
    pub documentation: String,
    pub direct_impls: Vec<EntityRef<InterfaceId>>,
    pub methods: ListOfFunctions,
    pub properties: Vec<Variable>,
}

macro_rules! impl_class_or_interface {
    ($ty:ty) => {
        impl ClassOrInterface for $ty {
            fn name(&self) -> &str {
                &self.name
            }
            fn namespace(&self) -> NamespaceId {
                self.namespace
            }
            fn documentation(&self) -> &str {
                &self.documentation
            }
            fn direct_impls(&self) -> &[EntityRef<InterfaceId>] {
                &self.direct_impls
            }
            fn methods(&self) -> &ListOfFunctions {
                &self.methods
            }
            fn methods_mut(&mut self) -> &mut ListOfFunctions {
                &mut self.methods
            }
            fn properties(&self) -> &[Variable] {
                &self.properties
            }
            fn properties_mut(&mut self) -> &mut Vec<Variable> {
                &mut self.properties
            }
            fn direct_impls_mut(&mut self) -> &mut Vec<EntityRef<InterfaceId>> {
                &mut self.direct_impls
            }
        }
    };
}

impl_class_or_interface!(ClassType);
impl_class_or_interface!(InterfaceType);

/// Either kind of first-class entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Class(ClassId),
    Interface(InterfaceId),
}

/// The collected API surface: namespace tree, entity arenas, closure shapes
#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub namespaces: NamespaceTree,
    pub classes: Vec<ClassType>,
    pub interfaces: Vec<InterfaceType>,
    pub closures: ClosureRegistry,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self, id: ClassId) -> &ClassType {
        &self.classes[id.0]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassType {
        &mut self.classes[id.0]
    }

    pub fn interface(&self, id: InterfaceId) -> &InterfaceType {
        &self.interfaces[id.0]
    }

    pub fn interface_mut(&mut self, id: InterfaceId) -> &mut InterfaceType {
        &mut self.interfaces[id.0]
    }

    pub fn entity(&self, id: EntityId) -> &dyn ClassOrInterface {
        match id {
            EntityId::Class(id) => self.class(id),
            EntityId::Interface(id) => self.interface(id),
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut dyn ClassOrInterface {
        match id {
            EntityId::Class(id) => self.class_mut(id),
            EntityId::Interface(id) => self.interface_mut(id),
        }
    }

    pub fn class_ref(&self, id: ClassId) -> EntityRef<ClassId> {
        let class = self.class(id);
        EntityRef {
            id,
            name: class.name.clone(),
            qualified_name: class.qualified_name.clone(),
        }
    }

    pub fn interface_ref(&self, id: InterfaceId) -> EntityRef<InterfaceId> {
        let iface = self.interface(id);
        EntityRef {
            id,
            name: iface.name.clone(),
            qualified_name: iface.qualified_name.clone(),
        }
    }

    /// Look up a class by name in `namespace`, creating it if absent
    ///
    /// Returns the existing node when called again with the same name; the
    /// documentation of the first call wins.
    pub fn get_or_create_class(&mut self, namespace: NamespaceId, name: &str, docs: &str) -> ClassId {
        let ident = type_ident(name);
        if let Some(existing) = self.namespaces.get(namespace).classes.get(&ident) {
            return *existing;
        }

        let id = ClassId(self.classes.len());
        let qualified_name = self.namespaces.qualified_item(namespace, &ident);
        debug!("Program: new class {}", qualified_name);
        self.classes.push(ClassType {
            name: name.to_string(),
            ident: ident.clone(),
            qualified_name,
            namespace,
            documentation: docs.to_string(),
            super_class: None,
            direct_impls: Vec::new(),
            constructors: ListOfFunctions::new(),
            methods: ListOfFunctions::new(),
            static_methods: ListOfFunctions::new(),
            properties: Vec::new(),
            static_properties: Vec::new(),
        });
        self.namespaces.get_mut(namespace).classes.insert(ident, id);
        id
    }

    /// Interface counterpart of [`Program::get_or_create_class`]
    pub fn get_or_create_interface(
        &mut self,
        namespace: NamespaceId,
        name: &str,
        docs: &str,
    ) -> InterfaceId {
        let ident = type_ident(name);
        if let Some(existing) = self.namespaces.get(namespace).interfaces.get(&ident) {
            return *existing;
        }

        let id = InterfaceId(self.interfaces.len());
        let qualified_name = self.namespaces.qualified_item(namespace, &ident);
        debug!("Program: new interface {}", qualified_name);
        self.interfaces.push(InterfaceType {
            name: name.to_string(),
            ident: ident.clone(),
            qualified_name,
            namespace,
            documentation: docs.to_string(),
            direct_impls: Vec::new(),
            methods: ListOfFunctions::new(),
            properties: Vec::new(),
        });
        self.namespaces.get_mut(namespace).interfaces.insert(ident, id);
        id
    }

    /// Visit the superclass chain of `class`, nearest ancestor first
    ///
    /// Superclass links are acyclic, so no visited set is kept.
    pub fn for_each_super_class<F>(&self, class: ClassId, mut f: F)
    where
        F: FnMut(ClassId, &ClassType),
    {
        let mut current = self.class(class).super_class.as_ref().map(|s| s.id);
        while let Some(id) = current {
            let super_class = self.class(id);
            f(id, super_class);
            current = super_class.super_class.as_ref().map(|s| s.id);
        }
    }

    /// Visit every interface reachable from `entity` exactly once, deepest
    /// ancestors first
    ///
    /// For an interface the traversal includes the interface itself, visited
    /// last. For a class it starts from the class's direct implementations.
    pub fn for_each_super_impl<F>(&self, entity: EntityId, mut f: F)
    where
        F: FnMut(InterfaceId, &InterfaceType),
    {
        let roots: Vec<InterfaceId> = match entity {
            EntityId::Interface(id) => vec![id],
            EntityId::Class(id) => self.class(id).direct_impls.iter().map(|i| i.id).collect(),
        };
        let mut visited = HashSet::new();
        for root in roots {
            self.visit_impls(root, &mut visited, &mut f);
        }
    }

    fn visit_impls<F>(&self, id: InterfaceId, visited: &mut HashSet<InterfaceId>, f: &mut F)
    where
        F: FnMut(InterfaceId, &InterfaceType),
    {
        if !visited.insert(id) {
            return;
        }
        let iface = self.interface(id);
        for base in &iface.direct_impls {
            self.visit_impls(base.id, visited, f);
        }
        f(id, iface);
    }

    /// Shortest Rust path from code in `from` to a class
    pub fn path_to_class(&self, from: NamespaceId, class: ClassId) -> String {
        let class = self.class(class);
        self.namespaces.rust_path_to(from, class.namespace, &class.ident)
    }

    /// Shortest Rust path from code in `from` to an interface
    pub fn path_to_interface(&self, from: NamespaceId, iface: InterfaceId) -> String {
        let iface = self.interface(iface);
        self.namespaces.rust_path_to(from, iface.namespace, &iface.ident)
    }
}
