//! Deterministic output names for overload sets
//!
//! A container (class, interface or namespace) may hold several functions that
//! share an identifier. [`ListOfFunctions::resolved_functions`] assigns every
//! function a unique output name. The assignment depends only on the set of
//! functions, never on insertion order: functions are sorted canonically and
//! then claim names round by round from a fixed candidate sequence.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::error::ModelError;
use crate::types::NamedFunction;

/// A function together with its unique output name
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFunction {
    pub name: String,
    pub function: NamedFunction,
}

/// Bag of functions belonging to one container
#[derive(Debug, Clone, Default)]
pub struct ListOfFunctions {
    functions: Vec<NamedFunction>,
    resolved: RefCell<Option<Vec<ResolvedFunction>>>,
}

impl ListOfFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function; returns `false` if an identical function (same
    /// identifier and signature) is already present
    pub fn add(&mut self, function: NamedFunction) -> bool {
        if self.functions.contains(&function) {
            trace!("ListOfFunctions: duplicate '{}' ignored", function.ident);
            return false;
        }
        self.functions.push(function);
        *self.resolved.get_mut() = None;
        true
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &NamedFunction> {
        self.functions.iter()
    }

    /// Unique output names for every function, in canonical order
    pub fn resolved_functions(&self) -> Result<Vec<ResolvedFunction>, ModelError> {
        if let Some(cached) = self.resolved.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let resolved = resolve_names(&self.functions)?;
        *self.resolved.borrow_mut() = Some(resolved.clone());
        Ok(resolved)
    }

    /// Resolved output name -> function
    pub fn by_resolved_name(&self) -> Result<BTreeMap<String, NamedFunction>, ModelError> {
        Ok(self
            .resolved_functions()?
            .into_iter()
            .map(|r| (r.name, r.function))
            .collect())
    }

    /// Original identifier -> every function sharing it
    pub fn by_identifier(&self) -> BTreeMap<&str, Vec<&NamedFunction>> {
        let mut map: BTreeMap<&str, Vec<&NamedFunction>> = BTreeMap::new();
        for function in &self.functions {
            map.entry(function.ident.as_str()).or_default().push(function);
        }
        map
    }

    /// Whether any function uses `ident` as its original identifier
    pub fn has_identifier(&self, ident: &str) -> bool {
        self.functions.iter().any(|f| f.ident == ident)
    }
}

impl Serialize for ListOfFunctions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let resolved = self
            .resolved_functions()
            .map_err(serde::ser::Error::custom)?;
        resolved.serialize(serializer)
    }
}

/// Letter suffix for an integer: base-26 digits written with `a`..`z`
///
/// Distinct integers never map to the same string.
///
/// ```
/// use tsbind_core::overloads::num_to_abc;
/// assert_eq!(num_to_abc(0), "a");
/// assert_eq!(num_to_abc(25), "z");
/// assert_eq!(num_to_abc(26), "ba");
/// ```
pub fn num_to_abc(n: usize) -> String {
    let mut letters = Vec::new();
    let mut rest = n;
    loop {
        letters.push(char::from(b'a' + (rest % 26) as u8));
        rest /= 26;
        if rest == 0 {
            break;
        }
    }
    letters.iter().rev().collect()
}

/// Candidate output name number `attempt` for a function
///
/// Attempt 0 is the bare identifier, attempt 1 appends the argument count and
/// later attempts add a letter suffix. When `skip_arity` is set, another
/// function shares both identifier and argument count, so the arity-only
/// candidate cannot tell them apart and lettered candidates start at attempt 1.
pub fn candidate_name(ident: &str, arity: usize, attempt: usize, skip_arity: bool) -> String {
    match (attempt, skip_arity) {
        (0, _) => ident.to_string(),
        (1, false) => format!("{}_{}", ident, arity),
        (n, false) => format!("{}_{}{}", ident, arity, num_to_abc(n - 2)),
        (n, true) => format!("{}_{}{}", ident, arity, num_to_abc(n - 1)),
    }
}

fn resolve_names(functions: &[NamedFunction]) -> Result<Vec<ResolvedFunction>, ModelError> {
    let mut sorted: Vec<&NamedFunction> = functions.iter().collect();
    sorted.sort();

    let mut shapes: HashMap<(&str, usize), usize> = HashMap::new();
    for function in &sorted {
        *shapes
            .entry((function.ident.as_str(), function.arity()))
            .or_default() += 1;
    }

    let mut attempts = vec![0usize; sorted.len()];
    let mut names: Vec<Option<String>> = vec![None; sorted.len()];
    let mut taken: HashSet<String> = HashSet::new();
    let mut pending: Vec<usize> = (0..sorted.len()).collect();

    // Each function's candidates are distinct and at most len() names are ever
    // claimed, so every function settles within len() + 1 rounds.
    let limit = sorted.len() + 2;
    let mut rounds = 0;

    while !pending.is_empty() {
        if rounds > limit {
            let identifier = sorted[pending[0]].ident.clone();
            return Err(ModelError::OverloadResolution { identifier, rounds });
        }
        pending.retain(|&idx| {
            let function = sorted[idx];
            let skip_arity = shapes
                .get(&(function.ident.as_str(), function.arity()))
                .map_or(false, |count| *count > 1);
            let candidate =
                candidate_name(&function.ident, function.arity(), attempts[idx], skip_arity);
            if taken.insert(candidate.clone()) {
                trace!("ListOfFunctions: '{}' -> '{}'", function.ident, candidate);
                names[idx] = Some(candidate);
                false
            } else {
                attempts[idx] += 1;
                true
            }
        });
        rounds += 1;
    }

    sorted
        .into_iter()
        .zip(names)
        .map(|(function, name)| match name {
            Some(name) => Ok(ResolvedFunction {
                name,
                function: function.clone(),
            }),
            None => Err(ModelError::Internal(format!(
                "no name assigned to '{}'",
                function.ident
            ))),
        })
        .collect()
}
