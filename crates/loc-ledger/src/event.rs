use serde::{Deserialize, Serialize};

/// A named event attached to a transaction.
///
/// The payload is opaque to the ledger; contracts put the JSON of the record
/// they just wrote there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

impl ChaincodeEvent {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl std::fmt::Display for ChaincodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.payload.len())
    }
}

/// An event published by a committed transaction.
///
/// `seq` is assigned at commit and increases by one per published event, so
/// subscribers can resume with [`crate::InMemoryLedger::events_since`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedEvent {
    pub seq: u64,
    pub tx_id: String,
    pub event: ChaincodeEvent,
}

impl std::fmt::Display for CommittedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} tx:{}", self.seq, self.event, short(&self.tx_id))
    }
}

fn short(tx_id: &str) -> &str {
    tx_id.get(..8).unwrap_or(tx_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_compact() {
        let event = CommittedEvent {
            seq: 3,
            tx_id: "0123456789abcdef".into(),
            event: ChaincodeEvent::new("LoCIssued", b"{}".to_vec()),
        };
        assert_eq!(event.to_string(), "#3 LoCIssued (2 bytes) tx:01234567");
    }

    #[test]
    fn short_tx_id_is_kept_whole() {
        assert_eq!(short("abc"), "abc");
    }
}
