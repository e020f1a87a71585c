//! Fully-qualified declaration names as reported by the type checker
//!
//! The checker renders a symbol's qualified name as dot-separated components.
//! Module names declared with string literals keep their quotes and may contain
//! dots themselves:
//!
//! - `Sprite`
//! - `PIXI.loaders.Loader`
//! - `"pixi.js".PIXI.Sprite`
//!
//! ```
//! use tsbind_core::QualifiedName;
//! let fqn = QualifiedName::parse("\"pixi.js\".PIXI.Sprite").unwrap();
//! assert_eq!(fqn.item(), "Sprite");
//! assert_eq!(fqn.namespaces(), ["pixi.js", "PIXI"]);
//! ```

use std::fmt;

use serde::Serialize;

/// A parsed qualified name: enclosing namespaces plus the item name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedName {
    original: String,
    namespaces: Vec<String>,
    item: String,
    /// The outermost namespace was a quoted module name
    module_head: bool,
}

/// Errors that can occur while parsing a qualified name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FqnError {
    #[error("Empty qualified name")]
    Empty,

    #[error("Empty component in qualified name: {0}")]
    EmptyComponent(String),

    #[error("Unterminated quoted module name in: {0}")]
    UnterminatedQuote(String),
}

impl QualifiedName {
    pub fn parse(fqn: &str) -> Result<Self, FqnError> {
        if fqn.trim().is_empty() {
            return Err(FqnError::Empty);
        }

        let mut components = Vec::new();
        let mut current = String::new();
        let mut chars = fqn.chars();
        // Quote character of the component being read, if it is quoted
        let mut quote: Option<char> = None;
        let mut module_head = false;

        while let Some(c) = chars.next() {
            match c {
                '"' | '\'' if current.is_empty() && quote.is_none() => quote = Some(c),
                c if quote == Some(c) => {
                    quote = None;
                    // A quoted component must be followed by a separator or the end
                    match chars.next() {
                        None => {}
                        Some('.') => {
                            module_head |= components.is_empty();
                            components.push(std::mem::take(&mut current));
                            continue;
                        }
                        Some(_) => return Err(FqnError::UnterminatedQuote(fqn.to_string())),
                    }
                }
                '.' if quote.is_none() => {
                    if current.is_empty() {
                        return Err(FqnError::EmptyComponent(fqn.to_string()));
                    }
                    components.push(std::mem::take(&mut current));
                }
                c => current.push(c),
            }
        }

        if quote.is_some() {
            return Err(FqnError::UnterminatedQuote(fqn.to_string()));
        }
        if current.is_empty() {
            return Err(FqnError::EmptyComponent(fqn.to_string()));
        }

        Ok(Self {
            original: fqn.to_string(),
            namespaces: components,
            item: current,
            module_head,
        })
    }

    /// The declared item's own name (last component)
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Enclosing namespace components, outermost first
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Quoted module name the declaration lives in, if any
    pub fn module(&self) -> Option<&str> {
        if self.module_head {
            self.namespaces.first().map(String::as_str)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
