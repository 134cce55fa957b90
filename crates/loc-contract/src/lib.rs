//! Letter of credit contract.
//!
//! [`LocContract`] is the entry point the ledger platform calls, once per
//! transaction, with a [`TransactionContext`](loc_ledger::TransactionContext).
//! It owns the lifecycle transitions, the role-relative listings, record
//! history, the demonstration seed and operation dispatch.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use loc_contract::LocContract;
//! use loc_ledger::InMemoryLedger;
//!
//! let ledger = InMemoryLedger::new();
//! let contract = LocContract::default();
//! let at = Utc.with_ymd_and_hms(2022, 4, 11, 6, 16, 0).unwrap();
//!
//! let mut tx = ledger.begin_at("Org1MSP", at);
//! let loc = contract
//!     .issue(&mut tx, br#"{"ID":"L1","applicant_bank":"Org1","advise_through_bank":"Org2","negotiating_bank":"Org2","amount":1000}"#)
//!     .unwrap();
//! tx.commit().unwrap();
//!
//! assert_eq!(loc.status_log, vec!["LoC issued by Org1 on Apr 11, 2022 at 11:46 AM"]);
//! ```

pub mod bootstrap;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod query;

pub use bootstrap::{sample_record, SAMPLE_ID};
pub use config::ContractConfig;
pub use contract::LocContract;
pub use dispatch::Operation;
pub use error::{ContractError, ContractResult};
pub use query::HistoryEntry;

// Re-export key types
pub use loc_types::{LetterOfCredit, LocStatus, OrgId, Role, Transition};
