use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::event::{ChaincodeEvent, CommittedEvent};
use crate::selector::Selector;
use crate::traits::{
    ClientIdentity, EventSink, KeyHistory, KeyModification, QueryResult, RichQuery, WorldState,
};

const TX_DOMAIN: &[u8] = b"loc-tx-v1:";

/// In-memory ledger for tests, local demos, and embedding.
///
/// Work happens in a [`LedgerTransaction`]. Reads see committed state
/// overlaid with the transaction's own writes. Writes and the event are
/// buffered until [`LedgerTransaction::commit`] applies them atomically,
/// after checking that nothing the transaction read has changed since.
/// A dropped transaction leaves no trace.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
    next_tx: AtomicU64,
    read_only: AtomicBool,
}

#[derive(Default)]
struct LedgerState {
    world: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    events: Vec<CommittedEvent>,
}

impl LedgerState {
    fn version(&self, key: &str) -> u64 {
        self.history.get(key).map_or(0, |h| h.len() as u64)
    }
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: String,
    /// Keys written, in key order.
    pub keys: Vec<String>,
    pub event: Option<CommittedEvent>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            next_tx: AtomicU64::new(1),
            read_only: AtomicBool::new(false),
        }
    }

    /// Start a transaction submitted by `msp_id`, stamped with the wall clock.
    pub fn begin(&self, msp_id: &str) -> LedgerTransaction<'_> {
        self.begin_at(msp_id, Utc::now())
    }

    /// Start a transaction with an explicit submitter timestamp.
    pub fn begin_at(&self, msp_id: &str, timestamp: DateTime<Utc>) -> LedgerTransaction<'_> {
        let seq = self.next_tx.fetch_add(1, Ordering::Relaxed);
        let tx_id = derive_tx_id(seq, msp_id, &timestamp);
        debug!(tx_id = %tx_id, msp_id, "transaction started");
        LedgerTransaction {
            ledger: self,
            msp_id: msp_id.to_string(),
            tx_id,
            timestamp,
            writes: BTreeMap::new(),
            reads: RefCell::new(BTreeMap::new()),
            event: None,
        }
    }

    /// Reject every write and commit while set. Used to simulate a ledger
    /// that cannot persist.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::Relaxed)
    }

    /// Committed value of `key`, outside any transaction.
    pub fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.world.get(key).cloned())
    }

    /// Number of keys holding a value.
    pub fn key_count(&self) -> Result<usize, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.world.len())
    }

    /// Every published event, in commit order.
    pub fn events(&self) -> Result<Vec<CommittedEvent>, LedgerError> {
        self.events_since(0)
    }

    /// Events with a sequence number greater than `seq`.
    pub fn events_since(&self, seq: u64) -> Result<Vec<CommittedEvent>, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state
            .events
            .iter()
            .filter(|e| e.seq > seq)
            .cloned()
            .collect())
    }

    fn check_writable(&self) -> Result<(), LedgerError> {
        if self.is_read_only() {
            return Err(LedgerError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = self.key_count().unwrap_or(0);
        f.debug_struct("InMemoryLedger")
            .field("keys", &keys)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

fn derive_tx_id(seq: u64, msp_id: &str, timestamp: &DateTime<Utc>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(TX_DOMAIN);
    hasher.update(&seq.to_le_bytes());
    hasher.update(msp_id.as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hex::encode(hasher.finalize().as_bytes())
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// One invocation's view of an [`InMemoryLedger`].
pub struct LedgerTransaction<'a> {
    ledger: &'a InMemoryLedger,
    msp_id: String,
    tx_id: String,
    timestamp: DateTime<Utc>,
    writes: BTreeMap<String, Vec<u8>>,
    /// Key -> version observed at first read.
    reads: RefCell<BTreeMap<String, u64>>,
    event: Option<ChaincodeEvent>,
}

impl LedgerTransaction<'_> {
    /// Apply buffered writes and publish the event.
    ///
    /// Fails with [`LedgerError::ReadConflict`] if any key read by this
    /// transaction was committed by another transaction in the meantime;
    /// nothing is applied in that case.
    pub fn commit(self) -> Result<CommitReceipt, LedgerError> {
        self.ledger.check_writable()?;
        let mut state = self
            .ledger
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;

        for (key, &read) in self.reads.borrow().iter() {
            let committed = state.version(key);
            if committed != read {
                return Err(LedgerError::ReadConflict {
                    key: key.clone(),
                    read,
                    committed,
                });
            }
        }

        let keys: Vec<String> = self.writes.keys().cloned().collect();
        for (key, value) in self.writes {
            state
                .history
                .entry(key.clone())
                .or_default()
                .push(KeyModification {
                    tx_id: self.tx_id.clone(),
                    timestamp: self.timestamp,
                    value: value.clone(),
                });
            state.world.insert(key, value);
        }

        let event = self.event.map(|event| {
            let committed = CommittedEvent {
                seq: state.events.len() as u64 + 1,
                tx_id: self.tx_id.clone(),
                event,
            };
            state.events.push(committed.clone());
            committed
        });

        info!(
            tx_id = %self.tx_id,
            msp_id = %self.msp_id,
            keys = keys.len(),
            event = event.as_ref().map(|e| e.event.name.as_str()),
            "transaction committed"
        );

        Ok(CommitReceipt {
            tx_id: self.tx_id,
            keys,
            event,
        })
    }

    /// Discard the transaction.
    pub fn rollback(self) {
        debug!(tx_id = %self.tx_id, writes = self.writes.len(), "transaction rolled back");
    }
}

impl WorldState for LedgerTransaction<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }
        let state = self
            .ledger
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        self.reads
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| state.version(key));
        Ok(state.world.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        self.ledger.check_writable()?;
        self.writes.insert(key.to_string(), value);
        Ok(())
    }
}

impl RichQuery for LedgerTransaction<'_> {
    fn query(&self, selector: &Selector) -> Result<Vec<QueryResult>, LedgerError> {
        let state = self
            .ledger
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state
            .world
            .iter()
            .filter(|(_, value)| selector.matches_bytes(value))
            .map(|(key, value)| QueryResult {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }
}

impl KeyHistory for LedgerTransaction<'_> {
    fn history(&self, key: &str) -> Result<Vec<KeyModification>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let state = self
            .ledger
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.history.get(key).cloned().unwrap_or_default())
    }
}

impl EventSink for LedgerTransaction<'_> {
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError> {
        self.event = Some(ChaincodeEvent::new(name, payload));
        Ok(())
    }

    fn pending_event(&self) -> Option<&ChaincodeEvent> {
        self.event.as_ref()
    }
}

impl ClientIdentity for LedgerTransaction<'_> {
    fn msp_id(&self) -> &str {
        &self.msp_id
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 11, 6, minute, 0).unwrap()
    }

    fn json(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    // -----------------------------------------------------------------------
    // Reads and writes
    // -----------------------------------------------------------------------

    #[test]
    fn writes_are_visible_only_to_their_transaction_until_commit() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("Org1MSP");
        tx.put_state("L1", b"v1".to_vec()).unwrap();

        assert_eq!(tx.get_state("L1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(ledger.begin("Org2MSP").get_state("L1").unwrap(), None);
        assert_eq!(ledger.get_committed("L1").unwrap(), None);

        let receipt = tx.commit().unwrap();
        assert_eq!(receipt.keys, vec!["L1".to_string()]);
        assert_eq!(ledger.get_committed("L1").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let ledger = InMemoryLedger::new();
        {
            let mut tx = ledger.begin("Org1MSP");
            tx.put_state("L1", b"v1".to_vec()).unwrap();
            tx.set_event("LoCIssued", b"{}".to_vec()).unwrap();
        }
        let mut tx = ledger.begin("Org1MSP");
        tx.put_state("L2", b"v2".to_vec()).unwrap();
        tx.rollback();

        assert_eq!(ledger.key_count().unwrap(), 0);
        assert!(ledger.events().unwrap().is_empty());
    }

    #[test]
    fn empty_key_is_rejected() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("Org1MSP");
        assert_eq!(tx.get_state(""), Err(LedgerError::EmptyKey));
        assert_eq!(tx.put_state("", vec![]), Err(LedgerError::EmptyKey));
    }

    #[test]
    fn read_only_ledger_refuses_writes() {
        let ledger = InMemoryLedger::new();
        ledger.set_read_only(true);
        let mut tx = ledger.begin("Org1MSP");
        assert_eq!(tx.put_state("L1", vec![1]), Err(LedgerError::ReadOnly));
        assert_eq!(tx.commit(), Err(LedgerError::ReadOnly));
    }

    // -----------------------------------------------------------------------
    // Optimistic concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn stale_read_fails_commit() {
        let ledger = InMemoryLedger::new();
        let mut seed = ledger.begin("Org1MSP");
        seed.put_state("L1", b"v1".to_vec()).unwrap();
        seed.commit().unwrap();

        let mut first = ledger.begin("Org1MSP");
        let mut second = ledger.begin("Org2MSP");
        first.get_state("L1").unwrap();
        second.get_state("L1").unwrap();
        first.put_state("L1", b"a".to_vec()).unwrap();
        second.put_state("L1", b"b".to_vec()).unwrap();

        first.commit().unwrap();
        let err = second.commit().unwrap_err();
        assert_eq!(
            err,
            LedgerError::ReadConflict {
                key: "L1".into(),
                read: 1,
                committed: 2
            }
        );
        assert_eq!(ledger.get_committed("L1").unwrap(), Some(b"a".to_vec()));
    }

    #[test]
    fn absent_key_read_conflicts_with_creation() {
        let ledger = InMemoryLedger::new();
        let mut first = ledger.begin("Org1MSP");
        let mut second = ledger.begin("Org1MSP");
        assert_eq!(first.get_state("L1").unwrap(), None);
        assert_eq!(second.get_state("L1").unwrap(), None);
        first.put_state("L1", b"a".to_vec()).unwrap();
        second.put_state("L1", b"b".to_vec()).unwrap();

        first.commit().unwrap();
        assert!(matches!(
            second.commit(),
            Err(LedgerError::ReadConflict { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Queries and history
    // -----------------------------------------------------------------------

    #[test]
    fn query_returns_matches_in_key_order() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("Org1MSP");
        tx.put_state("B", json(serde_json::json!({"doc_type": "LoC", "bank": "Org1"})))
            .unwrap();
        tx.put_state("A", json(serde_json::json!({"doc_type": "LoC", "bank": "Org1"})))
            .unwrap();
        tx.put_state("C", json(serde_json::json!({"doc_type": "LoC", "bank": "Org2"})))
            .unwrap();
        tx.put_state("D", b"opaque".to_vec()).unwrap();
        tx.commit().unwrap();

        let tx = ledger.begin("Org1MSP");
        let selector = Selector::new().field_eq("doc_type", "LoC").field_eq("bank", "Org1");
        let keys: Vec<_> = tx
            .query(&selector)
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn history_is_oldest_first() {
        let ledger = InMemoryLedger::new();
        for (minute, value) in [(0, "v1"), (5, "v2"), (9, "v3")] {
            let mut tx = ledger.begin_at("Org1MSP", at(minute));
            tx.put_state("L1", value.as_bytes().to_vec()).unwrap();
            tx.commit().unwrap();
        }

        let tx = ledger.begin("Org1MSP");
        let history = tx.history("L1").unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value, b"v1");
        assert_eq!(history[2].value, b"v3");
        assert_eq!(history[1].timestamp, at(5));
        assert!(tx.history("missing").unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Events and identity
    // -----------------------------------------------------------------------

    #[test]
    fn last_event_wins_and_is_sequenced() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("Org1MSP");
        tx.put_state("L1", vec![1]).unwrap();
        tx.set_event("First", vec![]).unwrap();
        tx.set_event("Second", vec![2]).unwrap();
        assert_eq!(tx.pending_event().map(|e| e.name.as_str()), Some("Second"));
        let receipt = tx.commit().unwrap();
        assert_eq!(receipt.event.as_ref().map(|e| e.seq), Some(1));

        let mut tx = ledger.begin("Org1MSP");
        tx.put_state("L2", vec![1]).unwrap();
        tx.set_event("Third", vec![]).unwrap();
        tx.commit().unwrap();

        let events = ledger.events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.name, "Second");
        assert_eq!(ledger.events_since(1).unwrap()[0].event.name, "Third");
    }

    #[test]
    fn transaction_ids_are_unique() {
        let ledger = InMemoryLedger::new();
        let a = ledger.begin_at("Org1MSP", at(0));
        let b = ledger.begin_at("Org1MSP", at(0));
        assert_ne!(a.tx_id(), b.tx_id());
        assert_eq!(a.tx_id().len(), 64);
        assert_eq!(a.msp_id(), "Org1MSP");
        assert_eq!(a.tx_timestamp(), at(0));
    }

    #[test]
    fn concurrent_transactions_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let ledger = Arc::new(InMemoryLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let mut tx = ledger.begin("Org1MSP");
                    tx.put_state(&format!("L{i}"), vec![i as u8]).unwrap();
                    tx.commit().unwrap();
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(ledger.key_count().unwrap(), 8);
    }
}
