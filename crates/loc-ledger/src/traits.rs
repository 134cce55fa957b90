use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::event::ChaincodeEvent;
use crate::selector::Selector;

/// A value returned by a rich query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResult {
    pub key: String,
    pub value: Vec<u8>,
}

/// One committed version of a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: Vec<u8>,
}

/// Keyed access to the world state within one transaction.
pub trait WorldState {
    /// Returns `Ok(None)` when the key holds no value.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Buffer a write. It becomes visible to other transactions only on commit.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;
}

/// Selector scans over the JSON state index.
pub trait RichQuery {
    /// Matching values in the index's natural order.
    fn query(&self, selector: &Selector) -> Result<Vec<QueryResult>, LedgerError>;
}

/// Version history of individual keys.
pub trait KeyHistory {
    /// Every committed version of `key`, oldest first.
    fn history(&self, key: &str) -> Result<Vec<KeyModification>, LedgerError>;
}

/// Event emission for the current transaction.
pub trait EventSink {
    /// Set the transaction's event. A transaction carries at most one event;
    /// a later call replaces the earlier one.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError>;

    /// The event that will be published if the transaction commits.
    fn pending_event(&self) -> Option<&ChaincodeEvent>;
}

/// Verified submitter identity and transaction metadata.
pub trait ClientIdentity {
    /// Membership-service identifier of the submitter, e.g. `Org1MSP`.
    fn msp_id(&self) -> &str;

    fn tx_id(&self) -> &str;

    /// Timestamp chosen by the submitter; identical on every endorsing peer.
    fn tx_timestamp(&self) -> DateTime<Utc>;
}

/// Everything the contract may touch during one invocation.
pub trait TransactionContext:
    WorldState + RichQuery + KeyHistory + EventSink + ClientIdentity
{
}

impl<T> TransactionContext for T where
    T: WorldState + RichQuery + KeyHistory + EventSink + ClientIdentity
{
}
