use thiserror::Error;

use crate::fqn::FqnError;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Malformed namespace: unnamed namespace under '{parent}'")]
    MalformedNamespace { parent: String },

    #[error("Overload resolution for '{identifier}' did not settle after {rounds} rounds")]
    OverloadResolution { identifier: String, rounds: usize },

    #[error("Invalid qualified name: {0}")]
    QualifiedName(#[from] FqnError),

    #[error("Internal error: {0}")]
    Internal(String),
}
