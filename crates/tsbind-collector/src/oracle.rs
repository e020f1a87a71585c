//! Capabilities the collector needs from a TypeScript type checker
//!
//! The collector never parses declaration files itself. Everything it knows
//! about symbols and types comes through [`TypeOracle`], which a driver backs
//! with a live checker or with a recorded [`crate::snapshot::DeclarationSnapshot`].
//!
//! Unknown ids answer "nothing": `None`, empty lists or empty flag sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Opaque checker handle for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Opaque checker handle for a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

bitflags! {
    /// Kind bits of a checker type
    ///
    /// The object kinds `CLASS` and `INTERFACE` are folded into the same set
    /// so that one mask describes a type completely.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeFlags: u32 {
        const ANY = 1 << 0;
        const UNKNOWN = 1 << 1;
        const STRING = 1 << 2;
        const NUMBER = 1 << 3;
        const BOOLEAN = 1 << 4;
        const ENUM = 1 << 5;
        const BIG_INT = 1 << 6;
        const STRING_LITERAL = 1 << 7;
        const NUMBER_LITERAL = 1 << 8;
        const BOOLEAN_LITERAL = 1 << 9;
        const ENUM_LITERAL = 1 << 10;
        const BIG_INT_LITERAL = 1 << 11;
        const ES_SYMBOL = 1 << 12;
        const UNIQUE_ES_SYMBOL = 1 << 13;
        const VOID = 1 << 14;
        const UNDEFINED = 1 << 15;
        const NULL = 1 << 16;
        const NEVER = 1 << 17;
        const TYPE_PARAMETER = 1 << 18;
        const OBJECT = 1 << 19;
        const UNION = 1 << 20;
        const INTERSECTION = 1 << 21;
        const TEMPLATE_LITERAL = 1 << 22;
        const CLASS = 1 << 23;
        const INTERFACE = 1 << 24;
    }
}

impl TypeFlags {
    pub const STRING_LIKE: Self = Self::from_bits_retain(
        Self::STRING.bits() | Self::STRING_LITERAL.bits() | Self::TEMPLATE_LITERAL.bits(),
    );
    pub const NUMBER_LIKE: Self = Self::from_bits_retain(
        Self::NUMBER.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::ENUM.bits()
            | Self::ENUM_LITERAL.bits()
            | Self::BIG_INT.bits()
            | Self::BIG_INT_LITERAL.bits(),
    );
    pub const BOOLEAN_LIKE: Self =
        Self::from_bits_retain(Self::BOOLEAN.bits() | Self::BOOLEAN_LITERAL.bits());
    pub const ES_SYMBOL_LIKE: Self =
        Self::from_bits_retain(Self::ES_SYMBOL.bits() | Self::UNIQUE_ES_SYMBOL.bits());
    /// Branches stripped from a union before it is collapsed
    pub const NULLABLE: Self = Self::from_bits_retain(Self::UNDEFINED.bits() | Self::NULL.bits());
}

bitflags! {
    /// What a symbol declares
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const PROPERTY = 1 << 1;
        const METHOD = 1 << 2;
        const FUNCTION = 1 << 3;
        const CLASS = 1 << 4;
        const INTERFACE = 1 << 5;
        const ENUM = 1 << 6;
        const NAMESPACE = 1 << 7;
        const TYPE_ALIAS = 1 << 8;
        const GET_ACCESSOR = 1 << 9;
        const SET_ACCESSOR = 1 << 10;
        const CONSTRUCTOR = 1 << 11;
        const PARAMETER = 1 << 12;
        const OPTIONAL = 1 << 13;
        const PROTOTYPE = 1 << 14;
        /// Re-export of another symbol
        const ALIAS = 1 << 15;
    }
}

impl SymbolFlags {
    pub const ACCESSOR: Self =
        Self::from_bits_retain(Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits());
    /// Members that become data properties
    pub const DATA: Self = Self::from_bits_retain(
        Self::PROPERTY.bits() | Self::VARIABLE.bits() | Self::ACCESSOR.bits(),
    );
    pub const ENTITY: Self = Self::from_bits_retain(Self::CLASS.bits() | Self::INTERFACE.bits());
}

bitflags! {
    /// Declaration modifiers relevant to binding generation
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ModifierFlags: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const READONLY = 1 << 4;
        const ABSTRACT = 1 << 5;
        const EXPORT = 1 << 6;
    }
}

impl ModifierFlags {
    pub const NON_PUBLIC: Self =
        Self::from_bits_retain(Self::PRIVATE.bits() | Self::PROTECTED.bits());
}

/// One declaration site of a symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration file the site lives in
    pub file: String,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    /// `...rest` parameter declaration
    #[serde(default)]
    pub rest: bool,
    /// Types named in a class's `implements` clause
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeId>,
}

impl Declaration {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }
}

/// A call or construct signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Parameter symbols in call order
    pub parameters: Vec<SymbolId>,
    pub return_type: TypeId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,
}

impl Signature {
    pub fn new(parameters: Vec<SymbolId>, return_type: TypeId) -> Self {
        Self {
            parameters,
            return_type,
            documentation: String::new(),
        }
    }
}

/// Module name of a declaration file path
///
/// `./pixi.js.d.ts`, `pixi.js.d.ts` and `pixi.js` all name the same module, so
/// entry files, declaration sites and ambient module names are compared
/// through this key.
pub fn module_key(name: &str) -> &str {
    let name = name.strip_prefix("./").unwrap_or(name);
    [".d.ts", ".ts"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

/// Read-only view of a checked program
pub trait TypeOracle {
    /// Exported symbols of a declaration file
    fn file_exports(&self, file: &str) -> Vec<SymbolId>;

    /// Ambient modules (`declare module "name"`) declared inside a file
    fn ambient_modules(&self, file: &str) -> Vec<SymbolId>;

    /// Exported members of a module or namespace symbol
    fn module_exports(&self, module: SymbolId) -> Vec<SymbolId>;

    fn symbol_name(&self, symbol: SymbolId) -> Option<String>;

    /// Dot-separated path as rendered by the checker, e.g. `"pixi.js".PIXI.Sprite`
    fn qualified_name(&self, symbol: SymbolId) -> Option<String>;

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags;

    fn declarations(&self, symbol: SymbolId) -> Vec<Declaration>;

    fn documentation(&self, symbol: SymbolId) -> String;

    /// Type a symbol declares (the instance side of a class)
    fn declared_type(&self, symbol: SymbolId) -> Option<TypeId>;

    /// Type of the symbol's value at its declaration (the static side of a class)
    fn type_at_declaration(&self, symbol: SymbolId) -> Option<TypeId>;

    /// Target of an alias symbol
    fn aliased_symbol(&self, _symbol: SymbolId) -> Option<SymbolId> {
        None
    }

    fn type_flags(&self, ty: TypeId) -> TypeFlags;

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    /// Type as the checker would print it
    fn type_display(&self, ty: TypeId) -> String;

    fn call_signatures(&self, ty: TypeId) -> Vec<Signature>;

    fn construct_signatures(&self, ty: TypeId) -> Vec<Signature>;

    /// Direct base types, `extends` clauses first
    fn base_types(&self, ty: TypeId) -> Vec<TypeId>;

    fn properties(&self, ty: TypeId) -> Vec<SymbolId>;

    fn union_members(&self, ty: TypeId) -> Vec<TypeId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_type_flags() {
        assert!(TypeFlags::NUMBER_LIKE.contains(TypeFlags::ENUM));
        assert!(TypeFlags::NUMBER_LIKE.contains(TypeFlags::BIG_INT_LITERAL));
        assert!(TypeFlags::STRING_LIKE.contains(TypeFlags::TEMPLATE_LITERAL));
        assert!(!TypeFlags::STRING_LIKE.intersects(TypeFlags::NUMBER_LIKE));
    }

    #[test]
    fn test_flags_serialize_as_names() {
        let flags = TypeFlags::STRING | TypeFlags::UNION;
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "\"STRING | UNION\"");
        let back: TypeFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn test_module_key() {
        assert_eq!(module_key("./pixi.js.d.ts"), "pixi.js");
        assert_eq!(module_key("pixi.js.d.ts"), "pixi.js");
        assert_eq!(module_key("lib/index.ts"), "lib/index");
        assert_eq!(module_key("events"), "events");
    }

    #[test]
    fn test_declaration_defaults() {
        let decl: Declaration = serde_json::from_str(r#"{"file": "pixi.d.ts"}"#).unwrap();
        assert_eq!(decl, Declaration::new("pixi.d.ts"));
        assert!(decl.modifiers.is_empty());
    }
}
