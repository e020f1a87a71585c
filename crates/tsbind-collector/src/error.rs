use std::path::PathBuf;

use thiserror::Error;
use tsbind_core::ModelError;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No entry files configured")]
    NoEntryFiles,

    #[error("Entry file #{0} is empty")]
    EmptyEntryFile(usize),
}
