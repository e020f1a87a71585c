//! Recoverable problems found while collecting
//!
//! A position whose declaration info is missing or unusable degrades to a
//! fallback type and leaves a [`Diagnostic`] behind instead of failing the run.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something was dropped or replaced by a fallback
    Warning,
    /// Collection continued as expected but a reader may want to know
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCategory {
    /// Symbol has no declaration or no name
    MissingDeclaration,
    /// No value type where one was needed
    MissingValueDeclaration,
    /// A base type did not resolve to a class or interface
    UnresolvedBase,
    /// Base classes beyond the superclass limit
    ExtraBaseClass,
    /// Function type that refers to itself
    RecursiveClosure,
    /// Qualified name the checker reported could not be parsed
    InvalidName,
    /// Class or interface left opaque because it lives outside the entry files
    ExternalType,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::MissingDeclaration => write!(f, "MISSING_DECLARATION"),
            DiagnosticCategory::MissingValueDeclaration => write!(f, "MISSING_VALUE_DECLARATION"),
            DiagnosticCategory::UnresolvedBase => write!(f, "UNRESOLVED_BASE"),
            DiagnosticCategory::ExtraBaseClass => write!(f, "EXTRA_BASE_CLASS"),
            DiagnosticCategory::RecursiveClosure => write!(f, "RECURSIVE_CLOSURE"),
            DiagnosticCategory::InvalidName => write!(f, "INVALID_NAME"),
            DiagnosticCategory::ExternalType => write!(f, "EXTERNAL_TYPE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: DiagnosticCategory,
    /// Entity and member being collected, e.g. `PIXI.Sprite::anchor`
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {}: {}", self.category, self.location, self.message)
    }
}

/// Accumulates diagnostics and tracks where the collector currently is
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    entries: Vec<Diagnostic>,
    context: Vec<String>,
}

impl DiagnosticSink {
    pub(crate) fn enter(&mut self, scope: impl Into<String>) {
        self.context.push(scope.into());
    }

    pub(crate) fn leave(&mut self) {
        self.context.pop();
    }

    /// Swap in a fresh context, returning the previous one
    pub(crate) fn replace_context(&mut self, context: Vec<String>) -> Vec<String> {
        std::mem::replace(&mut self.context, context)
    }

    fn location(&self) -> String {
        if self.context.is_empty() {
            "<top level>".to_string()
        } else {
            self.context.join("::")
        }
    }

    pub(crate) fn warn(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Severity::Warning, category, message.into());
    }

    pub(crate) fn info(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Severity::Info, category, message.into());
    }

    fn push(&mut self, severity: Severity, category: DiagnosticCategory, message: String) {
        let diagnostic = Diagnostic {
            severity,
            category,
            location: self.location(),
            message,
        };
        match severity {
            Severity::Warning => warn!("{}", diagnostic),
            Severity::Info => info!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
