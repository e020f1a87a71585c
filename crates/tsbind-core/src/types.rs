//! Closed type model using algebraic data types
//!
//! [`Type`] is value-like: primitives compare structurally, classes and
//! interfaces compare by qualified name, functions by arity and then element
//! by element. The ordering is a total order, which the overload resolver
//! relies on to sort functions into one canonical sequence.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::naming::member_ident;

/// Index of a namespace in the program's namespace tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NamespaceId(pub usize);

/// Index of a class in the program's class arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClassId(pub usize);

/// Index of an interface in the program's interface arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct InterfaceId(pub usize);

/// Nominal reference to a class or interface node
#[derive(Debug, Clone, Serialize)]
pub struct EntityRef<I> {
    pub id: I,
    /// Display name of the entity (e.g. "Sprite")
    pub name: String,
    /// Unique path of the entity in the namespace tree (e.g. "pixi::Sprite")
    pub qualified_name: String,
}

/// Core type representation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum Type {
    Any,
    Unknown,
    Number,
    String,
    Bool,
    Symbol,
    Undefined,
    Null,
    /// Unit return type
    Void,
    Never,
    Optional(Box<Type>),
    Class(EntityRef<ClassId>),
    Interface(EntityRef<InterfaceId>),
    Function(Arc<FunctionType>),
}

impl Type {
    /// Fixed per-kind discriminant; the first key of the total order
    fn discriminant(&self) -> u8 {
        match self {
            Type::Any => 0,
            Type::Unknown => 1,
            Type::Number => 2,
            Type::String => 3,
            Type::Bool => 4,
            Type::Symbol => 5,
            Type::Undefined => 6,
            Type::Null => 7,
            Type::Void => 8,
            Type::Never => 9,
            Type::Optional(_) => 10,
            Type::Class(_) => 11,
            Type::Interface(_) => 12,
            Type::Function(_) => 13,
        }
    }

    /// Whether a value of this type may already be `undefined`
    pub fn can_be_undefined(&self) -> bool {
        matches!(
            self,
            Type::Any | Type::Unknown | Type::Undefined | Type::Void | Type::Optional(_)
        )
    }

    /// Wrap in `Optional` unless the type already admits `undefined`
    pub fn optional(self) -> Type {
        if self.can_be_undefined() {
            self
        } else {
            Type::Optional(Box::new(self))
        }
    }

    /// Compact label used to build synthetic names such as closure type names
    pub fn short_name(&self) -> String {
        match self {
            Type::Any => "Any".to_string(),
            Type::Unknown => "Unknown".to_string(),
            Type::Number => "Number".to_string(),
            Type::String => "String".to_string(),
            Type::Bool => "Bool".to_string(),
            Type::Symbol => "Symbol".to_string(),
            Type::Undefined => "Undefined".to_string(),
            Type::Null => "Null".to_string(),
            Type::Void => "Void".to_string(),
            Type::Never => "Never".to_string(),
            Type::Optional(inner) => format!("Opt{}", inner.short_name()),
            Type::Class(class) => class.name.clone(),
            Type::Interface(iface) => iface.name.clone(),
            Type::Function(func) => func.short_name(),
        }
    }
}

impl Ord for Type {
    fn cmp(&self, other: &Self) -> Ordering {
        self.discriminant()
            .cmp(&other.discriminant())
            .then_with(|| match (self, other) {
                (Type::Optional(a), Type::Optional(b)) => a.cmp(b),
                (Type::Class(a), Type::Class(b)) => a.qualified_name.cmp(&b.qualified_name),
                (Type::Interface(a), Type::Interface(b)) => {
                    a.qualified_name.cmp(&b.qualified_name)
                }
                (Type::Function(a), Type::Function(b)) => a.as_ref().cmp(b.as_ref()),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Optional(inner) => write!(f, "Option<{}>", inner),
            Type::Class(class) => f.write_str(&class.qualified_name),
            Type::Interface(iface) => f.write_str(&iface.qualified_name),
            Type::Function(func) => f.write_str(&func.short_name()),
            other => f.write_str(&other.short_name()),
        }
    }
}

/// Total-order comparator over types
pub fn cmp_types(a: &Type, b: &Type) -> Ordering {
    a.cmp(b)
}

pub fn types_are_same(a: &Type, b: &Type) -> bool {
    cmp_types(a, b) == Ordering::Equal
}

/// A parameter or property
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    /// Name as written in the declaration
    pub name: String,
    /// Type as rendered by the checker, kept for diagnostics
    pub type_display: String,
    /// Output identifier
    pub ident: String,
    pub ty: Type,
    pub optional: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, type_display: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        Self {
            ident: member_ident(&name),
            name,
            type_display: type_display.into(),
            ty,
            optional: false,
        }
    }

    /// Mark as optional at its use site, wrapping the type accordingly
    pub fn into_optional(mut self) -> Self {
        self.optional = true;
        self.ty = self.ty.optional();
        self
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ident
            .cmp(&other.ident)
            .then_with(|| self.ty.cmp(&other.ty))
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Variable {}

/// A call signature
#[derive(Debug, Clone, Serialize)]
pub struct FunctionType {
    /// Parameters in call order
    pub params: Vec<Variable>,
    pub return_type: Type,
    pub return_display: String,
    /// A rest parameter was dropped from `params`
    pub has_variadic_tail: bool,
}

impl FunctionType {
    pub fn new(params: Vec<Variable>, return_type: Type) -> Self {
        let return_display = return_type.to_string();
        Self {
            params,
            return_type,
            return_display,
            has_variadic_tail: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `Fn<argc>` followed by the argument short names and the return short name
    pub fn short_name(&self) -> String {
        let mut name = format!("Fn{}", self.arity());
        for param in &self.params {
            name.push_str(&param.ty.short_name());
        }
        name.push_str(&self.return_type.short_name());
        name
    }
}

impl Ord for FunctionType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.arity()
            .cmp(&other.arity())
            .then_with(|| self.params.cmp(&other.params))
            .then_with(|| self.return_type.cmp(&other.return_type))
            .then_with(|| self.has_variadic_tail.cmp(&other.has_variadic_tail))
    }
}

impl PartialOrd for FunctionType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FunctionType {}

/// A function, method or constructor with its output identifier
#[derive(Debug, Clone, Serialize)]
pub struct NamedFunction {
    /// Name as written in the declaration
    pub name: String,
    /// Output identifier; not necessarily unique within its container
    pub ident: String,
    pub signature: FunctionType,
    pub documentation: String,
}

impl NamedFunction {
    pub fn new(name: impl Into<String>, signature: FunctionType) -> Self {
        let name = name.into();
        Self {
            ident: member_ident(&name),
            name,
            signature,
            documentation: String::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn arity(&self) -> usize {
        self.signature.arity()
    }
}

impl Ord for NamedFunction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ident
            .cmp(&other.ident)
            .then_with(|| self.signature.cmp(&other.signature))
    }
}

impl PartialOrd for NamedFunction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NamedFunction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NamedFunction {}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, qualified: &str, id: usize) -> Type {
        Type::Class(EntityRef {
            id: ClassId(id),
            name: name.to_string(),
            qualified_name: qualified.to_string(),
        })
    }

    #[test]
    fn test_optional_does_not_double_wrap() {
        let once = Type::String.optional();
        assert_eq!(once, Type::Optional(Box::new(Type::String)));
        assert_eq!(once.clone().optional(), once);
        assert_eq!(Type::Any.optional(), Type::Any);
        assert_eq!(Type::Undefined.optional(), Type::Undefined);
        assert_eq!(Type::Null.optional(), Type::Optional(Box::new(Type::Null)));
    }

    #[test]
    fn test_classes_compare_by_qualified_name() {
        // Same qualified name, different arena slots: still the same type
        assert!(types_are_same(
            &class("Sprite", "pixi::Sprite", 0),
            &class("Sprite", "pixi::Sprite", 7)
        ));
        assert!(!types_are_same(
            &class("Sprite", "pixi::Sprite", 0),
            &class("Sprite", "other::Sprite", 0)
        ));
    }

    #[test]
    fn test_kind_order_comes_first() {
        assert_eq!(cmp_types(&Type::Any, &Type::Number), Ordering::Less);
        assert_eq!(
            cmp_types(&Type::Optional(Box::new(Type::Any)), &Type::Never),
            Ordering::Greater
        );
    }

    #[test]
    fn test_function_order_is_arity_first() {
        let unary = FunctionType::new(
            vec![Variable::new("x", "string", Type::String)],
            Type::Void,
        );
        let binary = FunctionType::new(
            vec![
                Variable::new("a", "number", Type::Number),
                Variable::new("b", "number", Type::Number),
            ],
            Type::Void,
        );
        assert_eq!(unary.cmp(&binary), Ordering::Less);
    }

    #[test]
    fn test_variable_equality_ignores_display() {
        let a = Variable::new("delta", "number", Type::Number);
        let b = Variable::new("delta", "float", Type::Number);
        assert_eq!(a, b);
        assert_ne!(a, Variable::new("dt", "number", Type::Number));
    }

    #[test]
    fn test_short_names() {
        let callback = FunctionType::new(
            vec![Variable::new("delta", "number", Type::Number)],
            Type::Void,
        );
        assert_eq!(callback.short_name(), "Fn1NumberVoid");
        assert_eq!(
            Type::Function(Arc::new(callback)).optional().short_name(),
            "OptFn1NumberVoid"
        );
        assert_eq!(class("Sprite", "pixi::Sprite", 0).short_name(), "Sprite");
    }

    #[test]
    fn test_named_function_idents() {
        let f = NamedFunction::new("fromImage", FunctionType::new(vec![], Type::Void));
        assert_eq!(f.ident, "from_image");
        assert_eq!(f.name, "fromImage");
    }
}
