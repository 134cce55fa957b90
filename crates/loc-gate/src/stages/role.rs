use crate::error::GateError;
use crate::stage::{Denial, GateContext, GateStage, StageDecision, TransitionProposal};

/// Role authorization stage.
///
/// The caller's organization must equal the party field the transition's
/// role designates on the record. An empty party field matches nobody.
pub struct RoleStage;

impl GateStage for RoleStage {
    fn name(&self) -> &str {
        "role"
    }

    fn evaluate(
        &self,
        proposal: &TransitionProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let role = proposal.transition.role();
        let holder = context.record.party(role);

        if !holder.is_empty() && proposal.caller == holder {
            return Ok(StageDecision::Pass);
        }

        Ok(StageDecision::Deny(Denial::Unauthorized {
            caller: proposal.caller.clone(),
            role,
            holder: holder.to_string(),
        }))
    }
}
