use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Entity not found: {entity}")]
    NotFound { entity: String },

    #[error("Uniqueness conflict: {field}")]
    Uniqueness { field: String },

    #[error("Panel is read-only")]
    NotEditable,

    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },
}
