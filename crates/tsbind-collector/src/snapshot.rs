//! Recorded checker answers, replayable as a [`TypeOracle`]
//!
//! A snapshot is a JSON document holding everything the collector asks a
//! checker about one declaration set. Symbols and types are stored in two
//! arrays; a [`SymbolId`] or [`TypeId`] is the position of its record.
//!
//! ```json
//! {
//!   "files": [{ "path": "pixi.d.ts", "exports": [0] }],
//!   "symbols": [{ "name": "bar", "flags": "FUNCTION", "value_type": 1,
//!                 "declarations": [{ "file": "pixi.d.ts" }] }],
//!   "types": [{ "flags": "NUMBER", "display": "number" },
//!             { "flags": "OBJECT", "call_signatures": [...] }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tsbind_core::QualifiedName;

use crate::error::CollectError;
use crate::oracle::{
    module_key, Declaration, ModifierFlags, Signature, SymbolFlags, SymbolId, TypeFlags, TypeId, TypeOracle,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSnapshot {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub symbols: Vec<SymbolRecord>,
    #[serde(default)]
    pub types: Vec<TypeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    #[serde(default)]
    pub exports: Vec<SymbolId>,
    #[serde(default)]
    pub ambient_modules: Vec<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    /// Defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub flags: SymbolFlags,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TypeId>,
    /// Members of a namespace or module symbol
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<SymbolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    #[serde(default)]
    pub flags: TypeFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    #[serde(default)]
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_signatures: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct_signatures: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<TypeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union_members: Vec<TypeId>,
}

/// [`TypeOracle`] answering from a [`DeclarationSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotOracle {
    snapshot: DeclarationSnapshot,
}

impl SnapshotOracle {
    pub fn new(snapshot: DeclarationSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> Result<Self, CollectError> {
        let snapshot: DeclarationSnapshot = serde_json::from_str(json)?;
        debug!(
            "SnapshotOracle: {} files, {} symbols, {} types",
            snapshot.files.len(),
            snapshot.symbols.len(),
            snapshot.types.len()
        );
        Ok(Self::new(snapshot))
    }

    pub fn from_path(path: &Path) -> Result<Self, CollectError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn snapshot(&self) -> &DeclarationSnapshot {
        &self.snapshot
    }

    fn symbol(&self, id: SymbolId) -> Option<&SymbolRecord> {
        self.snapshot.symbols.get(id.0 as usize)
    }

    fn ty(&self, id: TypeId) -> Option<&TypeRecord> {
        self.snapshot.types.get(id.0 as usize)
    }

    fn file(&self, path: &str) -> Option<&FileRecord> {
        let key = module_key(path);
        self.snapshot
            .files
            .iter()
            .find(|f| module_key(&f.path) == key)
    }
}

impl TypeOracle for SnapshotOracle {
    fn file_exports(&self, file: &str) -> Vec<SymbolId> {
        self.file(file).map(|f| f.exports.clone()).unwrap_or_default()
    }

    fn ambient_modules(&self, file: &str) -> Vec<SymbolId> {
        self.file(file)
            .map(|f| f.ambient_modules.clone())
            .unwrap_or_default()
    }

    fn module_exports(&self, module: SymbolId) -> Vec<SymbolId> {
        self.symbol(module)
            .map(|s| s.exports.clone())
            .unwrap_or_default()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Option<String> {
        self.symbol(symbol).map(|s| s.name.clone())
    }

    fn qualified_name(&self, symbol: SymbolId) -> Option<String> {
        self.symbol(symbol)
            .map(|s| s.qualified_name.clone().unwrap_or_else(|| s.name.clone()))
    }

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags {
        self.symbol(symbol).map(|s| s.flags).unwrap_or_default()
    }

    fn declarations(&self, symbol: SymbolId) -> Vec<Declaration> {
        self.symbol(symbol)
            .map(|s| s.declarations.clone())
            .unwrap_or_default()
    }

    fn documentation(&self, symbol: SymbolId) -> String {
        self.symbol(symbol)
            .map(|s| s.documentation.clone())
            .unwrap_or_default()
    }

    fn declared_type(&self, symbol: SymbolId) -> Option<TypeId> {
        self.symbol(symbol).and_then(|s| s.declared_type)
    }

    fn type_at_declaration(&self, symbol: SymbolId) -> Option<TypeId> {
        self.symbol(symbol).and_then(|s| s.value_type)
    }

    fn aliased_symbol(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.symbol(symbol).and_then(|s| s.alias_of)
    }

    fn type_flags(&self, ty: TypeId) -> TypeFlags {
        self.ty(ty).map(|t| t.flags).unwrap_or_default()
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.ty(ty).and_then(|t| t.symbol)
    }

    fn type_display(&self, ty: TypeId) -> String {
        self.ty(ty).map(|t| t.display.clone()).unwrap_or_default()
    }

    fn call_signatures(&self, ty: TypeId) -> Vec<Signature> {
        self.ty(ty)
            .map(|t| t.call_signatures.clone())
            .unwrap_or_default()
    }

    fn construct_signatures(&self, ty: TypeId) -> Vec<Signature> {
        self.ty(ty)
            .map(|t| t.construct_signatures.clone())
            .unwrap_or_default()
    }

    fn base_types(&self, ty: TypeId) -> Vec<TypeId> {
        self.ty(ty).map(|t| t.base_types.clone()).unwrap_or_default()
    }

    fn properties(&self, ty: TypeId) -> Vec<SymbolId> {
        self.ty(ty).map(|t| t.properties.clone()).unwrap_or_default()
    }

    fn union_members(&self, ty: TypeId) -> Vec<TypeId> {
        self.ty(ty)
            .map(|t| t.union_members.clone())
            .unwrap_or_default()
    }
}

/// Handles of a class: its symbol plus instance and static-side types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassHandle {
    pub symbol: SymbolId,
    pub instance: TypeId,
    pub constructor: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceHandle {
    pub symbol: SymbolId,
    pub ty: TypeId,
}

/// Programmatic construction of snapshots
///
/// Names passed to the builder are qualified names as a checker renders
/// them; the symbol name is their last component.
///
/// ```
/// use tsbind_collector::snapshot::SnapshotBuilder;
/// use tsbind_collector::oracle::{Signature, TypeFlags};
///
/// let mut b = SnapshotBuilder::new();
/// let number = b.primitive(TypeFlags::NUMBER, "number");
/// let void = b.primitive(TypeFlags::VOID, "void");
/// let x = b.param("x", number);
/// let bar = b.function("pixi.d.ts", "bar", vec![Signature::new(vec![x], void)]);
/// b.export("pixi.d.ts", bar);
/// let snapshot = b.build();
/// assert_eq!(snapshot.files[0].exports, vec![bar]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: DeclarationSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, record: SymbolRecord) -> SymbolId {
        let id = SymbolId(self.snapshot.symbols.len() as u32);
        self.snapshot.symbols.push(record);
        id
    }

    pub fn add_type(&mut self, record: TypeRecord) -> TypeId {
        let id = TypeId(self.snapshot.types.len() as u32);
        self.snapshot.types.push(record);
        id
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut SymbolRecord {
        &mut self.snapshot.symbols[id.0 as usize]
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut TypeRecord {
        &mut self.snapshot.types[id.0 as usize]
    }

    fn file_mut(&mut self, path: &str) -> &mut FileRecord {
        let idx = match self.snapshot.files.iter().position(|f| f.path == path) {
            Some(idx) => idx,
            None => {
                self.snapshot.files.push(FileRecord {
                    path: path.to_string(),
                    ..FileRecord::default()
                });
                self.snapshot.files.len() - 1
            }
        };
        &mut self.snapshot.files[idx]
    }

    fn declared(&mut self, file: &str, qualified_name: &str, flags: SymbolFlags) -> SymbolId {
        let name = QualifiedName::parse(qualified_name)
            .map(|fqn| fqn.item().to_string())
            .unwrap_or_else(|_| qualified_name.to_string());
        self.add_symbol(SymbolRecord {
            name,
            qualified_name: Some(qualified_name.to_string()),
            flags,
            declarations: vec![Declaration::new(file)],
            ..SymbolRecord::default()
        })
    }

    pub fn primitive(&mut self, flags: TypeFlags, display: &str) -> TypeId {
        self.add_type(TypeRecord {
            flags,
            display: display.to_string(),
            ..TypeRecord::default()
        })
    }

    pub fn class(&mut self, file: &str, qualified_name: &str) -> ClassHandle {
        let symbol = self.declared(file, qualified_name, SymbolFlags::CLASS);
        let name = self.snapshot.symbols[symbol.0 as usize].name.clone();
        let instance = self.add_type(TypeRecord {
            flags: TypeFlags::OBJECT | TypeFlags::CLASS,
            symbol: Some(symbol),
            display: name.clone(),
            ..TypeRecord::default()
        });
        let constructor = self.add_type(TypeRecord {
            flags: TypeFlags::OBJECT,
            display: format!("typeof {}", name),
            ..TypeRecord::default()
        });
        let record = self.symbol_mut(symbol);
        record.declared_type = Some(instance);
        record.value_type = Some(constructor);
        ClassHandle {
            symbol,
            instance,
            constructor,
        }
    }

    pub fn interface(&mut self, file: &str, qualified_name: &str) -> InterfaceHandle {
        let symbol = self.declared(file, qualified_name, SymbolFlags::INTERFACE);
        let name = self.snapshot.symbols[symbol.0 as usize].name.clone();
        let ty = self.add_type(TypeRecord {
            flags: TypeFlags::OBJECT | TypeFlags::INTERFACE,
            symbol: Some(symbol),
            display: name,
            ..TypeRecord::default()
        });
        self.symbol_mut(symbol).declared_type = Some(ty);
        InterfaceHandle { symbol, ty }
    }

    /// Add a direct base type (`extends`)
    pub fn extends(&mut self, ty: TypeId, base: TypeId) {
        self.type_mut(ty).base_types.push(base);
    }

    /// Add a type to the `implements` clause of a class's first declaration
    pub fn implements(&mut self, class: SymbolId, iface: TypeId) {
        let record = self.symbol_mut(class);
        if record.declarations.is_empty() {
            record.declarations.push(Declaration::default());
        }
        record.declarations[0].implements.push(iface);
    }

    pub fn constructor(&mut self, class: &ClassHandle, signature: Signature) {
        self.type_mut(class.constructor)
            .construct_signatures
            .push(signature);
    }

    /// Attach a property or method symbol to an object type
    pub fn member(&mut self, owner: TypeId, member: SymbolId) {
        self.type_mut(owner).properties.push(member);
    }

    pub fn property(&mut self, file: &str, name: &str, ty: TypeId) -> SymbolId {
        let symbol = self.declared(file, name, SymbolFlags::PROPERTY);
        self.symbol_mut(symbol).value_type = Some(ty);
        symbol
    }

    pub fn method(&mut self, file: &str, name: &str, signatures: Vec<Signature>) -> SymbolId {
        let ty = self.function_type(signatures, &format!("typeof {}", name));
        let symbol = self.declared(file, name, SymbolFlags::METHOD);
        self.symbol_mut(symbol).value_type = Some(ty);
        symbol
    }

    pub fn function(&mut self, file: &str, qualified_name: &str, signatures: Vec<Signature>) -> SymbolId {
        let ty = self.function_type(signatures, &format!("typeof {}", qualified_name));
        let symbol = self.declared(file, qualified_name, SymbolFlags::FUNCTION);
        self.symbol_mut(symbol).value_type = Some(ty);
        symbol
    }

    pub fn variable(&mut self, file: &str, qualified_name: &str, ty: TypeId) -> SymbolId {
        let symbol = self.declared(file, qualified_name, SymbolFlags::VARIABLE);
        self.symbol_mut(symbol).value_type = Some(ty);
        symbol
    }

    /// Anonymous object type with the given call signatures
    pub fn function_type(&mut self, signatures: Vec<Signature>, display: &str) -> TypeId {
        self.add_type(TypeRecord {
            flags: TypeFlags::OBJECT,
            display: display.to_string(),
            call_signatures: signatures,
            ..TypeRecord::default()
        })
    }

    pub fn union(&mut self, members: Vec<TypeId>, display: &str) -> TypeId {
        self.add_type(TypeRecord {
            flags: TypeFlags::UNION,
            display: display.to_string(),
            union_members: members,
            ..TypeRecord::default()
        })
    }

    pub fn param(&mut self, name: &str, ty: TypeId) -> SymbolId {
        self.add_symbol(SymbolRecord {
            name: name.to_string(),
            flags: SymbolFlags::PARAMETER,
            value_type: Some(ty),
            ..SymbolRecord::default()
        })
    }

    pub fn optional_param(&mut self, name: &str, ty: TypeId) -> SymbolId {
        let symbol = self.param(name, ty);
        self.optional(symbol)
    }

    pub fn rest_param(&mut self, name: &str, ty: TypeId) -> SymbolId {
        let symbol = self.param(name, ty);
        self.symbol_mut(symbol).declarations.push(Declaration {
            rest: true,
            ..Declaration::default()
        });
        symbol
    }

    pub fn optional(&mut self, symbol: SymbolId) -> SymbolId {
        self.symbol_mut(symbol).flags |= SymbolFlags::OPTIONAL;
        symbol
    }

    /// Apply modifiers to every declaration of `symbol`
    pub fn modifiers(&mut self, symbol: SymbolId, modifiers: ModifierFlags) -> SymbolId {
        for decl in &mut self.symbol_mut(symbol).declarations {
            decl.modifiers |= modifiers;
        }
        symbol
    }

    pub fn documentation(&mut self, symbol: SymbolId, docs: &str) -> SymbolId {
        self.symbol_mut(symbol).documentation = docs.to_string();
        symbol
    }

    pub fn namespace(&mut self, file: &str, qualified_name: &str) -> SymbolId {
        self.declared(file, qualified_name, SymbolFlags::NAMESPACE)
    }

    pub fn namespace_member(&mut self, namespace: SymbolId, member: SymbolId) {
        self.symbol_mut(namespace).exports.push(member);
    }

    /// `declare module "name"` inside `file`
    pub fn ambient_module(&mut self, file: &str, name: &str) -> SymbolId {
        let symbol = self.add_symbol(SymbolRecord {
            name: format!("\"{}\"", name),
            flags: SymbolFlags::NAMESPACE,
            declarations: vec![Declaration::new(file)],
            ..SymbolRecord::default()
        });
        self.file_mut(file).ambient_modules.push(symbol);
        symbol
    }

    pub fn alias(&mut self, file: &str, name: &str, target: SymbolId) -> SymbolId {
        let symbol = self.declared(file, name, SymbolFlags::ALIAS);
        self.symbol_mut(symbol).alias_of = Some(target);
        symbol
    }

    pub fn export(&mut self, file: &str, symbol: SymbolId) {
        self.file_mut(file).exports.push(symbol);
    }

    pub fn build(self) -> DeclarationSnapshot {
        self.snapshot
    }

    pub fn into_oracle(self) -> SnapshotOracle {
        SnapshotOracle::new(self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_qualified_names() {
        let mut b = SnapshotBuilder::new();
        let sprite = b.class("pixi.d.ts", "\"pixi.js\".PIXI.Sprite");
        let oracle = b.into_oracle();
        assert_eq!(oracle.symbol_name(sprite.symbol).as_deref(), Some("Sprite"));
        assert_eq!(
            oracle.qualified_name(sprite.symbol).as_deref(),
            Some("\"pixi.js\".PIXI.Sprite")
        );
        assert_eq!(oracle.declared_type(sprite.symbol), Some(sprite.instance));
        assert_eq!(oracle.type_symbol(sprite.instance), Some(sprite.symbol));
        assert_eq!(oracle.type_symbol(sprite.constructor), None);
    }

    #[test]
    fn test_unknown_ids_answer_nothing() {
        let oracle = SnapshotOracle::default();
        assert_eq!(oracle.symbol_name(SymbolId(7)), None);
        assert!(oracle.declarations(SymbolId(7)).is_empty());
        assert!(oracle.type_flags(TypeId(3)).is_empty());
        assert!(oracle.call_signatures(TypeId(3)).is_empty());
        assert!(oracle.file_exports("missing.d.ts").is_empty());
    }

    #[test]
    fn test_json_round_trip_preserves_answers() {
        let mut b = SnapshotBuilder::new();
        let number = b.primitive(TypeFlags::NUMBER, "number");
        let x = b.optional_param("x", number);
        let f = b.function("a.d.ts", "f", vec![Signature::new(vec![x], number)]);
        b.export("a.d.ts", f);
        let snapshot = b.build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let oracle = SnapshotOracle::from_json(&json).unwrap();
        assert_eq!(oracle.snapshot(), &snapshot);
        assert_eq!(oracle.file_exports("a.d.ts"), vec![f]);
        assert!(oracle.symbol_flags(x).contains(SymbolFlags::OPTIONAL));
    }

    #[test]
    fn test_hand_written_json() {
        let oracle = SnapshotOracle::from_json(
            r#"{
                "files": [{ "path": "a.d.ts", "exports": [0] }],
                "symbols": [{ "name": "VERSION", "flags": "VARIABLE", "value_type": 0,
                              "declarations": [{ "file": "a.d.ts" }] }],
                "types": [{ "flags": "STRING", "display": "string" }]
            }"#,
        )
        .unwrap();
        assert_eq!(oracle.qualified_name(SymbolId(0)).as_deref(), Some("VERSION"));
        assert_eq!(oracle.type_at_declaration(SymbolId(0)), Some(TypeId(0)));
        assert_eq!(oracle.type_flags(TypeId(0)), TypeFlags::STRING);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = SnapshotOracle::from_json("{ \"files\": 3 }").unwrap_err();
        assert!(matches!(err, CollectError::Snapshot(_)));
    }
}
