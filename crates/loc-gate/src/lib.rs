//! Transition gate for the LoC ledger.
//!
//! Every lifecycle transition passes through the gate before its effects
//! are computed. The gate runs a pipeline of stages (precondition, then
//! role) against the record as it currently stands and produces an
//! accept/deny decision with a per-stage audit trail.
//!
//! # Quick Start
//!
//! ```rust
//! use loc_gate::{TransitionGate, TransitionProposal};
//! use loc_types::{LetterOfCredit, OrgId, Transition};
//!
//! let record = LetterOfCredit {
//!     id: "L1".into(),
//!     applicant_bank: "Org1".into(),
//!     advise_through_bank: "Org2".into(),
//!     ..Default::default()
//! };
//! let gate = TransitionGate::with_default_stages();
//! let proposal = TransitionProposal::new(
//!     Transition::AcknowledgeIssuance,
//!     "L1",
//!     OrgId::new("Org2"),
//! );
//! let result = gate.evaluate(&proposal, &record).unwrap();
//! assert!(result.is_accepted());
//! ```

pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use error::GateError;
pub use gate::{GateResult, TransitionGate};
pub use stage::{Denial, GateContext, GateStage, StageDecision, StageResult, TransitionProposal};
pub use stages::{PreconditionStage, RoleStage};
