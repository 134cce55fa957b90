//! Foundation types for the LoC ledger.
//!
//! This crate provides the record, lifecycle, and identity types shared by
//! every other crate in the workspace. It has no knowledge of the ledger
//! platform; everything here is pure data and pure functions.
//!
//! # Key Types
//!
//! - [`LetterOfCredit`]: The persisted letter of credit record
//! - [`LocStatus`]: Lifecycle status enumeration (forward-only)
//! - [`Transition`]: The transition table: source states, target, role, event
//! - [`Role`] / [`OrgId`]: Party roles and verified organization identifiers
//! - [`StatusClock`]: Audit timestamp formatting in an explicit UTC offset

pub mod clock;
pub mod error;
pub mod party;
pub mod record;
pub mod status;
pub mod transition;

pub use clock::StatusClock;
pub use error::TypeError;
pub use party::{OrgId, Role};
pub use record::{LetterOfCredit, DOC_TYPE};
pub use status::LocStatus;
pub use transition::Transition;
