//! Registry of anonymous function types (callback shapes)

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::ModelError;
use crate::overloads::{ListOfFunctions, ResolvedFunction};
use crate::types::{FunctionType, NamedFunction};

/// Flat list of distinct closure signatures, deduplicated structurally
///
/// Expected cardinality is small (tens of shapes), so lookups are linear.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ClosureRegistry {
    closures: Vec<Arc<FunctionType>>,
}

impl ClosureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical shared instance for this signature's shape,
    /// registering it on first sight
    pub fn add_or_get(&mut self, signature: FunctionType) -> Arc<FunctionType> {
        if let Some(existing) = self.closures.iter().find(|c| ***c == signature) {
            return Arc::clone(existing);
        }
        debug!("ClosureRegistry: new closure shape {}", signature.short_name());
        let shared = Arc::new(signature);
        self.closures.push(Arc::clone(&shared));
        shared
    }

    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionType>> {
        self.closures.iter()
    }

    /// Unique synthetic type names for every registered closure
    ///
    /// Names start from [`FunctionType::short_name`]; shapes that only differ
    /// in parameter names share a short name and are disambiguated the same
    /// way overloads are.
    pub fn named(&self) -> Result<Vec<ResolvedFunction>, ModelError> {
        let mut names = ListOfFunctions::new();
        for closure in &self.closures {
            let short = closure.short_name();
            names.add(NamedFunction {
                name: short.clone(),
                ident: short,
                signature: FunctionType::clone(closure),
                documentation: String::new(),
            });
        }
        names.resolved_functions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Type, Variable};

    fn callback(param: &str, ty: Type) -> FunctionType {
        FunctionType::new(vec![Variable::new(param, ty.short_name(), ty)], Type::Void)
    }

    #[test]
    fn test_same_shape_is_shared() {
        let mut registry = ClosureRegistry::new();
        let a = registry.add_or_get(callback("delta", Type::Number));
        let b = registry.add_or_get(callback("delta", Type::Number));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_shapes_are_kept() {
        let mut registry = ClosureRegistry::new();
        registry.add_or_get(callback("delta", Type::Number));
        registry.add_or_get(callback("delta", Type::String));
        registry.add_or_get(callback("dt", Type::Number));
        assert_eq!(registry.len(), 3);

        let names: Vec<String> = registry
            .named()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Fn1NumberVoid", "Fn1NumberVoid_1a", "Fn1StringVoid"]);
    }
}
