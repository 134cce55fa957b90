use std::time::{Duration, Instant};

use loc_types::LetterOfCredit;
use tracing::{debug, trace};

use crate::error::GateError;
use crate::stage::{Denial, GateContext, GateStage, StageDecision, StageResult, TransitionProposal};
use crate::stages::{PreconditionStage, RoleStage};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// The outcome of running a proposal through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    /// `None` when every stage passed.
    pub denial: Option<Denial>,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    /// Returns `true` if the proposal was accepted.
    pub fn is_accepted(&self) -> bool {
        self.denial.is_none()
    }

    /// The denial, if any, as an error.
    pub fn into_result(self) -> Result<(), Denial> {
        match self.denial {
            None => Ok(()),
            Some(denial) => Err(denial),
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionGate
// ---------------------------------------------------------------------------

/// A pipeline of stages every transition must pass before its effects are
/// computed.
pub struct TransitionGate {
    stages: Vec<Box<dyn GateStage>>,
}

impl TransitionGate {
    /// Create a gate with an empty pipeline. Use [`Self::add_stage`] to add
    /// stages, or [`Self::with_default_stages`] for the standard pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create a gate with the default stage pipeline:
    /// Precondition -> Role
    ///
    /// A transition on a record in the wrong status is therefore reported
    /// as such even when the caller also lacks the role.
    pub fn with_default_stages() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(PreconditionStage));
        gate.add_stage(Box::new(RoleStage));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a proposal against the record it targets.
    ///
    /// The pipeline is **fail-fast**: the first stage that denies stops
    /// evaluation. An empty pipeline is a configuration error rather than an
    /// unconditional accept.
    pub fn evaluate(
        &self,
        proposal: &TransitionProposal,
        record: &LetterOfCredit,
    ) -> Result<GateResult, GateError> {
        if self.stages.is_empty() {
            return Err(GateError::Config("gate has no stages".into()));
        }

        let pipeline_start = Instant::now();
        let mut context = GateContext::new(record);
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(proposal, &context)?;
            let elapsed = stage_start.elapsed();

            let reason = match &decision {
                StageDecision::Pass => None,
                StageDecision::Deny(denial) => Some(denial.to_string()),
            };
            trace!(
                stage = stage.name(),
                transition = %proposal.transition,
                id = %proposal.id,
                passed = reason.is_none(),
                "gate stage evaluated"
            );

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: reason.is_none(),
                reason,
                elapsed,
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Deny(denial) = decision {
                debug!(
                    stage = stage.name(),
                    transition = %proposal.transition,
                    id = %proposal.id,
                    caller = %proposal.caller,
                    reason = %denial,
                    "gate denied transition"
                );
                return Ok(GateResult {
                    denial: Some(denial),
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            denial: None,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl Default for TransitionGate {
    fn default() -> Self {
        Self::with_default_stages()
    }
}
