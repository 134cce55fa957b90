//! Ledger platform boundary for the LoC ledger.
//!
//! The contract never talks to a concrete ledger. It sees one transaction
//! at a time through the traits in [`traits`]:
//! - [`WorldState`]: keyed reads and buffered writes
//! - [`RichQuery`]: selector scans over the JSON state index
//! - [`KeyHistory`]: every committed version of a key
//! - [`EventSink`]: the single named event a transaction emits
//! - [`ClientIdentity`]: verified submitter identity and transaction metadata
//!
//! [`InMemoryLedger`] implements all of them for tests and embedding: writes
//! and the event are buffered in a [`LedgerTransaction`] and applied
//! atomically on commit, after an optimistic read-set check.

pub mod error;
pub mod event;
pub mod memory;
pub mod selector;
pub mod traits;

pub use error::LedgerError;
pub use event::{ChaincodeEvent, CommittedEvent};
pub use memory::{CommitReceipt, InMemoryLedger, LedgerTransaction};
pub use selector::Selector;
pub use traits::{
    ClientIdentity, EventSink, KeyHistory, KeyModification, QueryResult, RichQuery,
    TransactionContext, WorldState,
};
