/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("ledger is read-only")]
    ReadOnly,

    #[error("key must not be empty")]
    EmptyKey,

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("read conflict on {key}: read version {read}, committed version {committed}")]
    ReadConflict { key: String, read: u64, committed: u64 },
}
