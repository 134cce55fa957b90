use loc_types::{LocStatus, Role};
use thiserror::Error;

/// The error surfaced to the ledger platform.
///
/// Every variant names the operation and, where one is involved, the record
/// identifier. Lower-level causes are carried as short strings only. The
/// platform aborts the transaction on any of these, so none of them leaves
/// a write or an event behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("{op}[{id}]: letter of credit does not exist")]
    NotFound { op: &'static str, id: String },

    #[error("{op}[{id}]: letter of credit already exists")]
    AlreadyExists { op: &'static str, id: String },

    #[error("{op}[{id}]: status is {current}, expected one of [{}]", join_statuses(.expected))]
    InvalidState {
        op: &'static str,
        id: String,
        current: LocStatus,
        expected: Vec<LocStatus>,
    },

    #[error("{op}[{id}]: {caller:?} is not the {role}")]
    Unauthorized {
        op: &'static str,
        id: String,
        caller: String,
        role: Role,
    },

    #[error("{op}[{id}]: serialization failed: {cause}")]
    Serialization {
        op: &'static str,
        id: String,
        cause: String,
    },

    #[error("{op}[{id}]: ledger access failed: {cause}")]
    Persistence {
        op: &'static str,
        id: String,
        cause: String,
    },

    #[error("{op}: query failed: {cause}")]
    Query { op: &'static str, cause: String },

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("{op}: invalid arguments: {cause}")]
    InvalidArguments { op: &'static str, cause: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ContractResult<T> = Result<T, ContractError>;

fn join_statuses(statuses: &[LocStatus]) -> String {
    statuses
        .iter()
        .map(LocStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContractError {
    pub(crate) fn serialization(op: &'static str, id: &str, cause: impl ToString) -> Self {
        Self::Serialization {
            op,
            id: id.to_string(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn persistence(op: &'static str, id: &str, cause: impl ToString) -> Self {
        Self::Persistence {
            op,
            id: id.to_string(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn query(op: &'static str, cause: impl ToString) -> Self {
        Self::Query {
            op,
            cause: cause.to_string(),
        }
    }

    /// The operation the error was raised in, when known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { op, .. }
            | Self::AlreadyExists { op, .. }
            | Self::InvalidState { op, .. }
            | Self::Unauthorized { op, .. }
            | Self::Serialization { op, .. }
            | Self::Persistence { op, .. }
            | Self::Query { op, .. }
            | Self::InvalidArguments { op, .. } => Some(*op),
            Self::UnknownOperation(_) | Self::Config(_) => None,
        }
    }
}
