//! Declaration collection: turns a type checker's view of a set of `.d.ts`
//! files into the tsbind [`Program`](tsbind_core::Program)

pub mod classify;
pub mod collector;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod oracle;
pub mod snapshot;

pub use classify::{classify, PrimitiveKind};
pub use collector::{Collection, Collector};
pub use config::{CollectorConfig, ExpansionPolicy, UnionPolicy, SUPERCLASS_LIMIT};
pub use diagnostics::{Diagnostic, DiagnosticCategory, Severity};
pub use error::{CollectError, ConfigError};
pub use oracle::{module_key, Declaration, Signature, SymbolFlags, SymbolId, TypeFlags, TypeId, TypeOracle};
pub use snapshot::{DeclarationSnapshot, SnapshotBuilder, SnapshotOracle};

/// Collect everything reachable from the configured entry files
pub fn collect<O: TypeOracle + ?Sized>(
    oracle: &O,
    config: &CollectorConfig,
) -> Result<Collection, CollectError> {
    Collector::new(oracle, config).collect()
}
