//! Collector configuration, loaded from TOML
//!
//! ```toml
//! entry_files = ["pixi.js.d.ts"]
//! expansion = "entry-files"
//! unions = "strip-nullable"
//!
//! [known_types]
//! Date = "any"
//! "\"events\".EventEmitter" = "any"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::PrimitiveKind;
use crate::error::ConfigError;

/// At most this many base classes are honoured per class; the rest are
/// reported and dropped
pub const SUPERCLASS_LIMIT: usize = 1;

/// Which declarations become first-class classes and interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionPolicy {
    /// Only declarations living in an entry file
    #[default]
    EntryFiles,
    /// Every declaration the checker knows about
    AllDeclared,
}

/// How a union whose branches disagree is collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnionPolicy {
    /// `undefined` and `null` branches are dropped first. If the rest agree the
    /// union is optional of that type; if nothing is left it is `undefined`
    #[default]
    StripNullable,
    /// Any disagreement degrades to `Unknown`
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Declaration files whose exports seed the collection
    pub entry_files: Vec<String>,

    #[serde(default)]
    pub expansion: ExpansionPolicy,

    #[serde(default)]
    pub unions: UnionPolicy,

    /// External types mapped to a primitive by qualified name
    #[serde(default)]
    pub known_types: BTreeMap<String, PrimitiveKind>,
}

impl CollectorConfig {
    pub fn new<S: Into<String>>(entry_files: impl IntoIterator<Item = S>) -> Self {
        Self {
            entry_files: entry_files.into_iter().map(Into::into).collect(),
            expansion: ExpansionPolicy::default(),
            unions: UnionPolicy::default(),
            known_types: BTreeMap::new(),
        }
    }

    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_union_policy(mut self, unions: UnionPolicy) -> Self {
        self.unions = unions;
        self
    }

    pub fn with_known_type(mut self, qualified_name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.known_types.insert(qualified_name.into(), kind);
        self
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("CollectorConfig: loaded {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_files.is_empty() {
            return Err(ConfigError::NoEntryFiles);
        }
        if let Some(idx) = self.entry_files.iter().position(|f| f.trim().is_empty()) {
            return Err(ConfigError::EmptyEntryFile(idx));
        }
        Ok(())
    }
}
