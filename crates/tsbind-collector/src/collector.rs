//! Memoized walk from checker symbols to the binding model
//!
//! The collector starts at the exports of every entry file (and of the ambient
//! modules those files declare) and resolves each symbol it meets into the
//! [`Program`]. Two memo tables keyed by checker identity make every class and
//! interface a single node no matter how often or how cyclically it is
//! referenced. A class or interface is registered in both tables before its
//! bases and members are resolved, so self-references hit the memo.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, trace};
use tsbind_core::{
    types_are_same, ClassId, ClassOrInterface, EntityId, FunctionType, InterfaceId, NamedFunction,
    NamespaceId, Program, QualifiedName, Type, Variable,
};

use crate::classify::{classify, PrimitiveKind};
use crate::config::{CollectorConfig, ExpansionPolicy, UnionPolicy, SUPERCLASS_LIMIT};
use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSink, Severity};
use crate::error::CollectError;
use crate::oracle::{
    module_key, ModifierFlags, Signature, SymbolFlags, SymbolId, TypeFlags, TypeId, TypeOracle,
};

/// Result of a collection run
#[derive(Debug, Serialize)]
pub struct Collection {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Collection {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Methods and data properties gathered from one object type
#[derive(Debug, Default)]
struct Members {
    methods: Vec<NamedFunction>,
    properties: Vec<Variable>,
}

pub struct Collector<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    config: &'a CollectorConfig,
    /// Entry file paths as module names, without extension
    entry_modules: HashSet<String>,
    program: Program,
    types: HashMap<TypeId, Type>,
    symbols: HashMap<SymbolId, Type>,
    closures_in_progress: HashSet<TypeId>,
    /// Closure types the re-entry guard fired for, in order
    reentries: Vec<TypeId>,
    visited_modules: HashSet<SymbolId>,
    diagnostics: DiagnosticSink,
}

impl<'a, O: TypeOracle + ?Sized> Collector<'a, O> {
    pub fn new(oracle: &'a O, config: &'a CollectorConfig) -> Self {
        Self {
            oracle,
            config,
            entry_modules: config
                .entry_files
                .iter()
                .map(|file| module_key(file).to_string())
                .collect(),
            program: Program::new(),
            types: HashMap::new(),
            symbols: HashMap::new(),
            closures_in_progress: HashSet::new(),
            reentries: Vec::new(),
            visited_modules: HashSet::new(),
            diagnostics: DiagnosticSink::default(),
        }
    }

    /// Program collected so far
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Walk every entry file and finish
    #[instrument(skip(self), level = "debug")]
    pub fn collect(mut self) -> Result<Collection, CollectError> {
        self.collect_entries()?;
        self.finish()
    }

    /// Exports of the entry files and of the ambient modules they declare
    pub fn collect_entries(&mut self) -> Result<(), CollectError> {
        self.config.validate()?;
        let config = self.config;
        for file in &config.entry_files {
            debug!("Collector: collecting exports of {}", file);
            for symbol in self.oracle.file_exports(file) {
                self.collect_export(symbol)?;
            }
            for module in self.oracle.ambient_modules(file) {
                self.collect_module(module)?;
            }
        }
        Ok(())
    }

    /// Check that every overload set resolves, then hand out the program
    pub fn finish(self) -> Result<Collection, CollectError> {
        self.check_overloads()?;
        debug!(
            "Collector: {} namespaces, {} classes, {} interfaces, {} closures",
            self.program.namespaces.len(),
            self.program.classes.len(),
            self.program.interfaces.len(),
            self.program.closures.len()
        );
        Ok(Collection {
            program: self.program,
            diagnostics: self.diagnostics.into_entries(),
        })
    }

    fn check_overloads(&self) -> Result<(), CollectError> {
        for (_, namespace) in self.program.namespaces.iter() {
            namespace.functions.resolved_functions()?;
        }
        for class in &self.program.classes {
            class.constructors.resolved_functions()?;
            class.methods.resolved_functions()?;
            class.static_methods.resolved_functions()?;
        }
        for iface in &self.program.interfaces {
            iface.methods.resolved_functions()?;
        }
        self.program.closures.named()?;
        Ok(())
    }

    fn collect_export(&mut self, symbol: SymbolId) -> Result<(), CollectError> {
        let symbol = self.resolve_alias(symbol);
        let flags = self.oracle.symbol_flags(symbol);
        trace!("Collector: export {:?} ({:?})", symbol, flags);

        // Merged declarations carry several flags; each side is collected
        if flags.intersects(SymbolFlags::ENTITY | SymbolFlags::TYPE_ALIAS) {
            self.resolve_symbol(symbol)?;
        }
        if flags.contains(SymbolFlags::FUNCTION) {
            self.collect_function(symbol)?;
        }
        if flags.contains(SymbolFlags::VARIABLE) {
            self.collect_variable(symbol)?;
        }
        if flags.contains(SymbolFlags::NAMESPACE) {
            self.collect_module(symbol)?;
        }
        Ok(())
    }

    fn resolve_alias(&self, mut symbol: SymbolId) -> SymbolId {
        let mut seen = HashSet::new();
        while self.oracle.symbol_flags(symbol).contains(SymbolFlags::ALIAS) && seen.insert(symbol) {
            match self.oracle.aliased_symbol(symbol) {
                Some(target) => symbol = target,
                None => break,
            }
        }
        symbol
    }

    fn collect_module(&mut self, module: SymbolId) -> Result<(), CollectError> {
        if !self.visited_modules.insert(module) {
            return Ok(());
        }
        if let Some(fqn) = self.qualified_name(module) {
            let mut path = self.namespace_components(&fqn);
            let is_entry_module = path.is_empty()
                && fqn.as_str().starts_with(['"', '\''])
                && self.is_entry_module(fqn.item());
            if !is_entry_module {
                path.push(fqn.item().to_string());
            }
            self.program.namespaces.namespace_at(&path)?;
        }
        for member in self.oracle.module_exports(module) {
            self.collect_export(member)?;
        }
        Ok(())
    }

    fn collect_function(&mut self, symbol: SymbolId) -> Result<(), CollectError> {
        let Some((namespace, fqn)) = self.locate(symbol)? else {
            return Ok(());
        };
        self.scoped(fqn.as_str(), |c| c.collect_function_in(symbol, namespace, fqn.item()))
    }

    fn collect_function_in(
        &mut self,
        symbol: SymbolId,
        namespace: NamespaceId,
        name: &str,
    ) -> Result<(), CollectError> {
        let Some(ty) = self.oracle.type_at_declaration(symbol) else {
            self.diagnostics.warn(
                DiagnosticCategory::MissingValueDeclaration,
                format!("function '{}' has no value type; skipped", name),
            );
            return Ok(());
        };
        let signatures = self.oracle.call_signatures(ty);
        if signatures.is_empty() {
            self.diagnostics.warn(
                DiagnosticCategory::MissingDeclaration,
                format!("function '{}' has no call signatures", name),
            );
        }

        let docs = self.oracle.documentation(symbol);
        for signature in signatures {
            let function = self.resolve_signature(&signature)?;
            let docs = if signature.documentation.is_empty() {
                docs.clone()
            } else {
                signature.documentation
            };
            let function = NamedFunction::new(name, function).with_documentation(docs);
            self.program.namespaces.get_mut(namespace).functions.add(function);
        }
        Ok(())
    }

    fn collect_variable(&mut self, symbol: SymbolId) -> Result<(), CollectError> {
        let Some((namespace, fqn)) = self.locate(symbol)? else {
            return Ok(());
        };
        let (ty, display) = self.scoped(fqn.as_str(), |c| c.value_type(symbol))?;
        let mut variable = Variable::new(fqn.item(), display, ty);
        if self.oracle.symbol_flags(symbol).contains(SymbolFlags::OPTIONAL) {
            variable = variable.into_optional();
        }
        self.program.namespaces.get_mut(namespace).add_variable(variable);
        Ok(())
    }

    /// Resolve the type a symbol declares
    pub fn resolve_symbol(&mut self, symbol: SymbolId) -> Result<Type, CollectError> {
        if let Some(resolved) = self.symbols.get(&symbol) {
            trace!("Collector: cache hit for symbol {:?}", symbol);
            return Ok(resolved.clone());
        }

        let resolved = match self.oracle.declared_type(symbol) {
            Some(ty) => self.resolve_type(ty)?,
            None => {
                self.diagnostics.warn(
                    DiagnosticCategory::MissingDeclaration,
                    format!("'{}' declares no type; using Unknown", self.display_symbol(symbol)),
                );
                Type::Unknown
            }
        };
        self.symbols.insert(symbol, resolved.clone());
        Ok(resolved)
    }

    pub fn resolve_type(&mut self, ty: TypeId) -> Result<Type, CollectError> {
        if let Some(resolved) = self.types.get(&ty) {
            trace!("Collector: cache hit for type {:?}", ty);
            return Ok(resolved.clone());
        }
        if self.closures_in_progress.contains(&ty) {
            // Not memoized: only this inner position degrades
            self.reentries.push(ty);
            self.diagnostics.warn(
                DiagnosticCategory::RecursiveClosure,
                format!(
                    "function type '{}' refers to itself; using Unknown",
                    self.oracle.type_display(ty)
                ),
            );
            return Ok(Type::Unknown);
        }

        let mark = self.reentries.len();
        let resolved = self.resolve_uncached(ty)?;
        // A shape that saw a still-open closure depends on where it was reached from
        let context_dependent = self.reentries[mark..]
            .iter()
            .any(|open| self.closures_in_progress.contains(open));
        if context_dependent {
            trace!("Collector: {:?} degraded by an enclosing closure; not memoized", ty);
        } else {
            self.types.insert(ty, resolved.clone());
        }
        Ok(resolved)
    }

    fn resolve_uncached(&mut self, ty: TypeId) -> Result<Type, CollectError> {
        let flags = self.oracle.type_flags(ty);
        if flags.contains(TypeFlags::UNION) {
            return self.resolve_union(ty, flags);
        }

        if let Some(signature) = self.closure_signature(ty) {
            return self.resolve_closure(ty, &signature);
        }

        let symbol = self.oracle.type_symbol(ty);
        let symbol_flags = symbol
            .map(|s| self.oracle.symbol_flags(s))
            .unwrap_or_default();
        let is_entity = symbol_flags.intersects(SymbolFlags::ENTITY)
            || flags.intersects(TypeFlags::CLASS | TypeFlags::INTERFACE);

        if let Some(symbol) = symbol {
            if is_entity {
                if self.is_first_class(symbol) {
                    return self.resolve_entity(ty, symbol, symbol_flags, flags);
                }
                self.diagnostics.info(
                    DiagnosticCategory::ExternalType,
                    format!(
                        "'{}' is declared outside the entry files; not expanded",
                        self.display_symbol(symbol)
                    ),
                );
            }
            if let Some(kind) = self.known_type(symbol) {
                trace!("Collector: {:?} is a known external type", symbol);
                return Ok(kind.to_type());
            }
        }
        Ok(classify(flags))
    }

    /// The single call signature of a closure shape
    ///
    /// Exactly one call signature makes a type a closure, even when a named
    /// interface declares it. A callable type that also has properties stays a
    /// class or interface so its members are kept.
    fn closure_signature(&self, ty: TypeId) -> Option<Signature> {
        let mut signatures = self.oracle.call_signatures(ty);
        if signatures.len() != 1 || !self.oracle.properties(ty).is_empty() {
            return None;
        }
        signatures.pop()
    }

    fn is_first_class(&self, symbol: SymbolId) -> bool {
        let declarations = self.oracle.declarations(symbol);
        match self.config.expansion {
            ExpansionPolicy::EntryFiles => declarations
                .iter()
                .any(|d| self.entry_modules.contains(module_key(&d.file))),
            ExpansionPolicy::AllDeclared => !declarations.is_empty(),
        }
    }

    fn known_type(&self, symbol: SymbolId) -> Option<PrimitiveKind> {
        let name = self.oracle.qualified_name(symbol)?;
        self.config.known_types.get(&name).copied()
    }

    fn resolve_closure(&mut self, ty: TypeId, signature: &Signature) -> Result<Type, CollectError> {
        self.closures_in_progress.insert(ty);
        let resolved = self.resolve_signature(signature);
        self.closures_in_progress.remove(&ty);
        let closure = self.program.closures.add_or_get(resolved?);
        Ok(Type::Function(closure))
    }

    fn resolve_union(&mut self, ty: TypeId, flags: TypeFlags) -> Result<Type, CollectError> {
        let members = self.oracle.union_members(ty);
        if members.is_empty() {
            return Ok(classify(flags));
        }

        let mut branches = Vec::with_capacity(members.len());
        let mut present = Vec::with_capacity(members.len());
        for member in members {
            let nullable = self.oracle.type_flags(member).intersects(TypeFlags::NULLABLE);
            let branch = self.resolve_type(member)?;
            if !nullable {
                present.push(branch.clone());
            }
            branches.push(branch);
        }

        if let Some(same) = collapse(&branches) {
            return Ok(same);
        }
        if self.config.unions == UnionPolicy::StripNullable && present.len() < branches.len() {
            if present.is_empty() {
                return Ok(Type::Undefined);
            }
            if let Some(same) = collapse(&present) {
                return Ok(same.optional());
            }
        }
        trace!(
            "Collector: union '{}' does not collapse",
            self.oracle.type_display(ty)
        );
        Ok(Type::Unknown)
    }

    #[instrument(skip(self), level = "trace")]
    fn resolve_entity(
        &mut self,
        ty: TypeId,
        symbol: SymbolId,
        symbol_flags: SymbolFlags,
        flags: TypeFlags,
    ) -> Result<Type, CollectError> {
        // Another type id of an already registered entity
        if let Some(existing) = self.symbols.get(&symbol) {
            trace!("Collector: cache hit for symbol {:?}", symbol);
            return Ok(existing.clone());
        }
        let Some((namespace, fqn)) = self.locate(symbol)? else {
            return Ok(classify(flags));
        };

        let docs = self.oracle.documentation(symbol);
        let declared = self.oracle.declared_type(symbol).unwrap_or(ty);
        let is_class = symbol_flags.contains(SymbolFlags::CLASS)
            || (!symbol_flags.contains(SymbolFlags::INTERFACE) && flags.contains(TypeFlags::CLASS));

        if is_class {
            let id = self.program.get_or_create_class(namespace, fqn.item(), &docs);
            let resolved = Type::Class(self.program.class_ref(id));
            self.register(ty, symbol, &resolved);
            self.entity_scope(fqn.as_str(), |c| c.populate_class(id, declared, symbol))?;
            Ok(resolved)
        } else {
            let id = self
                .program
                .get_or_create_interface(namespace, fqn.item(), &docs);
            let resolved = Type::Interface(self.program.interface_ref(id));
            self.register(ty, symbol, &resolved);
            self.entity_scope(fqn.as_str(), |c| c.populate_interface(id, declared))?;
            Ok(resolved)
        }
    }

    fn register(&mut self, ty: TypeId, symbol: SymbolId, resolved: &Type) {
        self.types.insert(ty, resolved.clone());
        self.symbols.insert(symbol, resolved.clone());
    }

    fn populate_class(&mut self, id: ClassId, instance: TypeId, symbol: SymbolId) -> Result<(), CollectError> {
        let entity = EntityId::Class(id);

        let mut super_classes = Vec::new();
        for base in self.oracle.base_types(instance) {
            match self.resolve_type(base)? {
                Type::Class(class) => super_classes.push(class),
                Type::Interface(iface) => {
                    self.program.entity_mut(entity).add_direct_impl(iface);
                }
                other => self.unresolved_base(base, &other),
            }
        }
        let extra = super_classes.split_off(SUPERCLASS_LIMIT.min(super_classes.len()));
        if let Some(first) = super_classes.into_iter().next() {
            let class = self.program.class_mut(id);
            if class.super_class.is_none() {
                class.super_class = Some(first);
            }
        }
        for dropped in extra {
            self.diagnostics.warn(
                DiagnosticCategory::ExtraBaseClass,
                format!("base class '{}' ignored; only the first is kept", dropped.name),
            );
        }

        for declaration in self.oracle.declarations(symbol) {
            for implemented in declaration.implements {
                match self.resolve_type(implemented)? {
                    Type::Interface(iface) => {
                        self.program.entity_mut(entity).add_direct_impl(iface);
                    }
                    other => self.unresolved_base(implemented, &other),
                }
            }
        }

        let members = self.collect_members(instance, false)?;

        let mut constructors = Vec::new();
        let mut statics = Members::default();
        match self.oracle.type_at_declaration(symbol) {
            Some(static_side) => {
                for signature in self.oracle.construct_signatures(static_side) {
                    let function = self.resolve_signature(&signature)?;
                    constructors.push(
                        NamedFunction::new("new", function).with_documentation(signature.documentation),
                    );
                }
                statics = self.collect_members(static_side, true)?;
            }
            None => self.diagnostics.warn(
                DiagnosticCategory::MissingValueDeclaration,
                "class has no static side; constructors and static members skipped",
            ),
        }

        let class = self.program.class_mut(id);
        for constructor in constructors {
            class.constructors.add(constructor);
        }
        for method in members.methods {
            class.methods.add(method);
        }
        for property in members.properties {
            class.add_property(property);
        }
        for method in statics.methods {
            class.static_methods.add(method);
        }
        for property in statics.properties {
            if !class.static_properties.contains(&property) {
                class.static_properties.push(property);
            }
        }
        Ok(())
    }

    fn populate_interface(&mut self, id: InterfaceId, ty: TypeId) -> Result<(), CollectError> {
        for base in self.oracle.base_types(ty) {
            match self.resolve_type(base)? {
                Type::Interface(iface) => {
                    self.program.interface_mut(id).add_direct_impl(iface);
                }
                other => self.unresolved_base(base, &other),
            }
        }

        let members = self.collect_members(ty, false)?;
        let iface = self.program.interface_mut(id);
        for method in members.methods {
            iface.methods.add(method);
        }
        for property in members.properties {
            iface.add_property(property);
        }
        Ok(())
    }

    fn unresolved_base(&mut self, base: TypeId, resolved: &Type) {
        self.diagnostics.warn(
            DiagnosticCategory::UnresolvedBase,
            format!(
                "base '{}' resolved to {}; dropped",
                self.oracle.type_display(base),
                resolved
            ),
        );
    }

    fn collect_members(&mut self, ty: TypeId, static_side: bool) -> Result<Members, CollectError> {
        let mut members = Members::default();
        for member in self.oracle.properties(ty) {
            let flags = self.oracle.symbol_flags(member);
            let Some(name) = self.oracle.symbol_name(member) else {
                self.diagnostics.warn(
                    DiagnosticCategory::MissingDeclaration,
                    format!("member {:?} has no name; skipped", member),
                );
                continue;
            };
            if flags.contains(SymbolFlags::PROTOTYPE) || (static_side && name == "prototype") {
                continue;
            }
            if !self.is_public(member) {
                trace!("Collector: skipping non-public member '{}'", name);
                continue;
            }
            self.scoped(&name, |c| c.collect_member(member, &name, flags, &mut members))?;
        }
        Ok(members)
    }

    fn collect_member(
        &mut self,
        member: SymbolId,
        name: &str,
        flags: SymbolFlags,
        members: &mut Members,
    ) -> Result<(), CollectError> {
        if flags.contains(SymbolFlags::METHOD) {
            let Some(ty) = self.oracle.type_at_declaration(member) else {
                self.diagnostics.warn(
                    DiagnosticCategory::MissingValueDeclaration,
                    format!("method '{}' has no value type; skipped", name),
                );
                return Ok(());
            };
            let docs = self.oracle.documentation(member);
            for signature in self.oracle.call_signatures(ty) {
                let function = self.resolve_signature(&signature)?;
                members
                    .methods
                    .push(NamedFunction::new(name, function).with_documentation(docs.clone()));
            }
        } else if flags.intersects(SymbolFlags::DATA) {
            let (ty, display) = self.value_type(member)?;
            let mut property = Variable::new(name, display, ty);
            if flags.contains(SymbolFlags::OPTIONAL) {
                property = property.into_optional();
            }
            members.properties.push(property);
        } else {
            trace!("Collector: member '{}' ({:?}) is neither method nor data", name, flags);
        }
        Ok(())
    }

    fn is_public(&self, symbol: SymbolId) -> bool {
        !self
            .oracle
            .declarations(symbol)
            .iter()
            .any(|d| d.modifiers.intersects(ModifierFlags::NON_PUBLIC))
    }

    /// Resolve parameters and return type; a rest parameter ends the list
    pub fn resolve_signature(&mut self, signature: &Signature) -> Result<FunctionType, CollectError> {
        let mut params = Vec::with_capacity(signature.parameters.len());
        let mut has_variadic_tail = false;
        for (idx, &param) in signature.parameters.iter().enumerate() {
            if self.oracle.declarations(param).iter().any(|d| d.rest) {
                has_variadic_tail = true;
                break;
            }
            let name = self
                .oracle
                .symbol_name(param)
                .unwrap_or_else(|| format!("arg{}", idx));
            let (ty, display) = self.value_type(param)?;
            let mut variable = Variable::new(name, display, ty);
            if self.oracle.symbol_flags(param).contains(SymbolFlags::OPTIONAL) {
                variable = variable.into_optional();
            }
            params.push(variable);
        }

        let return_type = self.resolve_type(signature.return_type)?;
        let mut function = FunctionType::new(params, return_type);
        let display = self.oracle.type_display(signature.return_type);
        if !display.is_empty() {
            function.return_display = display;
        }
        function.has_variadic_tail = has_variadic_tail;
        Ok(function)
    }

    /// Resolved value type of a symbol plus the checker's rendering of it
    fn value_type(&mut self, symbol: SymbolId) -> Result<(Type, String), CollectError> {
        match self.oracle.type_at_declaration(symbol) {
            Some(ty) => {
                let resolved = self.resolve_type(ty)?;
                Ok((resolved, self.oracle.type_display(ty)))
            }
            None => {
                self.diagnostics.warn(
                    DiagnosticCategory::MissingValueDeclaration,
                    format!("'{}' has no value type; using Unknown", self.display_symbol(symbol)),
                );
                Ok((Type::Unknown, String::new()))
            }
        }
    }

    fn display_symbol(&self, symbol: SymbolId) -> String {
        self.oracle
            .symbol_name(symbol)
            .unwrap_or_else(|| format!("{:?}", symbol))
    }

    fn qualified_name(&mut self, symbol: SymbolId) -> Option<QualifiedName> {
        let raw = self
            .oracle
            .qualified_name(symbol)
            .or_else(|| self.oracle.symbol_name(symbol));
        let Some(raw) = raw else {
            self.diagnostics.warn(
                DiagnosticCategory::MissingDeclaration,
                format!("symbol {:?} has no name", symbol),
            );
            return None;
        };
        match QualifiedName::parse(&raw) {
            Ok(fqn) => Some(fqn),
            Err(err) => {
                self.diagnostics.warn(DiagnosticCategory::InvalidName, err.to_string());
                None
            }
        }
    }

    /// Owning namespace of a symbol, created on first sight
    fn locate(&mut self, symbol: SymbolId) -> Result<Option<(NamespaceId, QualifiedName)>, CollectError> {
        let Some(fqn) = self.qualified_name(symbol) else {
            return Ok(None);
        };
        let path = self.namespace_components(&fqn);
        let namespace = self.program.namespaces.namespace_at(&path)?;
        Ok(Some((namespace, fqn)))
    }

    /// Namespace chain of a name; the module of an entry file is the root
    fn namespace_components(&self, fqn: &QualifiedName) -> Vec<String> {
        let skip = match fqn.module() {
            Some(module) if self.is_entry_module(module) => 1,
            _ => 0,
        };
        fqn.namespaces()[skip..].to_vec()
    }

    fn is_entry_module(&self, name: &str) -> bool {
        self.entry_modules.contains(module_key(name))
    }

    fn scoped<T>(
        &mut self,
        scope: &str,
        f: impl FnOnce(&mut Self) -> Result<T, CollectError>,
    ) -> Result<T, CollectError> {
        self.diagnostics.enter(scope);
        let result = f(self);
        self.diagnostics.leave();
        result
    }

    /// Like [`Self::scoped`] but locations restart at the entity
    fn entity_scope<T>(
        &mut self,
        scope: &str,
        f: impl FnOnce(&mut Self) -> Result<T, CollectError>,
    ) -> Result<T, CollectError> {
        let outer = self.diagnostics.replace_context(vec![scope.to_string()]);
        let result = f(self);
        self.diagnostics.replace_context(outer);
        result
    }
}

/// The common type when every branch is the same
fn collapse(branches: &[Type]) -> Option<Type> {
    let (first, rest) = branches.split_first()?;
    rest.iter()
        .all(|branch| types_are_same(first, branch))
        .then(|| first.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse() {
        assert_eq!(collapse(&[Type::Number, Type::Number]), Some(Type::Number));
        assert_eq!(collapse(&[Type::Number, Type::String]), None);
        assert_eq!(collapse(&[]), None);
    }
}
