use std::fmt;
use std::time::Duration;

use loc_types::{LetterOfCredit, LocStatus, OrgId, Role, Transition};
use serde::{Deserialize, Serialize};

use crate::error::GateError;

// ---------------------------------------------------------------------------
// TransitionProposal
// ---------------------------------------------------------------------------

/// A request to apply one transition to one record, evaluated by the gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionProposal {
    pub transition: Transition,
    /// Identifier of the record the transition targets.
    pub id: String,
    /// Verified organization of the submitter.
    pub caller: OrgId,
}

impl TransitionProposal {
    pub fn new(transition: Transition, id: impl Into<String>, caller: OrgId) -> Self {
        Self {
            transition,
            id: id.into(),
            caller,
        }
    }
}

// ---------------------------------------------------------------------------
// Denial
// ---------------------------------------------------------------------------

/// Why a proposal was turned away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denial {
    /// The record is not in a status the transition may start from.
    InvalidState {
        current: LocStatus,
        expected: Vec<LocStatus>,
    },
    /// The caller does not hold the role the transition requires.
    Unauthorized {
        caller: OrgId,
        role: Role,
        /// Organization the record names for `role`.
        holder: String,
    },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { current, expected } => {
                let expected: Vec<&str> = expected.iter().map(LocStatus::as_str).collect();
                write!(f, "status is {current}, expected one of [{}]", expected.join(", "))
            }
            Self::Unauthorized {
                caller,
                role,
                holder,
            } => write!(f, "{caller} is not the {role} ({holder:?})"),
        }
    }
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage refused the proposal.
    Deny(Denial),
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Populated when the stage denied the proposal.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// What every stage may inspect besides the proposal itself.
pub struct GateContext<'a> {
    /// The record as it stands before the transition. For issuance this is
    /// the submitted record.
    pub record: &'a LetterOfCredit,
    /// Results from stages that have already run in this evaluation.
    pub previous_stages: Vec<StageResult>,
}

impl<'a> GateContext<'a> {
    pub fn new(record: &'a LetterOfCredit) -> Self {
        Self {
            record,
            previous_stages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in the gate pipeline.
///
/// The trait is object-safe and `Send + Sync` so stages can be stored in
/// a `Vec<Box<dyn GateStage>>`.
pub trait GateStage: Send + Sync {
    /// Short name of this stage (e.g. "precondition", "role").
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        proposal: &TransitionProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError>;
}
