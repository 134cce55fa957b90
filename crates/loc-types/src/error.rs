use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown lifecycle status: {0}")]
    UnknownStatus(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("caller identity {0:?} does not name an organization")]
    UnattributedIdentity(String),

    #[error("utc offset out of range: {0} minutes")]
    InvalidOffset(i32),

    #[error("serialization error: {0}")]
    Serialization(String),
}
