use crate::error::GateError;
use crate::stage::{Denial, GateContext, GateStage, StageDecision, TransitionProposal};

/// Lifecycle precondition stage.
///
/// Passes when the record's current status is one of the transition's
/// source statuses. Issuance has no source status and always passes here;
/// whether the identifier is free is the caller's concern.
pub struct PreconditionStage;

impl GateStage for PreconditionStage {
    fn name(&self) -> &str {
        "precondition"
    }

    fn evaluate(
        &self,
        proposal: &TransitionProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let sources = proposal.transition.sources();
        if sources.is_empty() {
            return Ok(StageDecision::Pass);
        }

        let current = context.record.current_status;
        if proposal.transition.applies_to(current) {
            Ok(StageDecision::Pass)
        } else {
            Ok(StageDecision::Deny(Denial::InvalidState {
                current,
                expected: sources.to_vec(),
            }))
        }
    }
}
