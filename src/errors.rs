use thiserror::Error;

/// Failures raised by name-based lookups on a [`crate::budget::Budget`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

/// Failures raised while decoding a tagged [`crate::budget::BudgetUnit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("budget unit must be a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a string")]
    NotAString(&'static str),
    #[error("unknown budget unit type `{0}`")]
    UnknownTag(String),
    #[error("invalid JSON: {0}")]
    Syntax(String),
}

/// Error type that captures snapshot persistence failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
