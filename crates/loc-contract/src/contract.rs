use loc_gate::{Denial, TransitionGate, TransitionProposal};
use loc_ledger::{ClientIdentity, EventSink, TransactionContext, WorldState};
use loc_types::{LetterOfCredit, OrgId, Role, StatusClock, Transition};
use tracing::{info, warn};

use crate::config::ContractConfig;
use crate::error::{ContractError, ContractResult};

/// The letter of credit lifecycle contract.
///
/// Each method is one ledger transaction: a single read of the record, the
/// gate's precondition and role checks, the mutation, one write under the
/// same key, and one event carrying the written record. Nothing reaches the
/// context until every check has passed, so a failed call leaves no write
/// and no event.
pub struct LocContract {
    config: ContractConfig,
    clock: StatusClock,
    gate: TransitionGate,
}

impl LocContract {
    pub fn new(config: ContractConfig) -> ContractResult<Self> {
        config.validate()?;
        let clock = config.clock()?;
        Ok(Self {
            config,
            clock,
            gate: TransitionGate::with_default_stages(),
        })
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn clock(&self) -> &StatusClock {
        &self.clock
    }

    // ---- Issuance ----

    /// Create a letter of credit from a client-submitted JSON record.
    ///
    /// Lifecycle fields in the submission are ignored: the record starts
    /// active, with no documents and a single audit entry.
    pub fn issue<C: TransactionContext>(
        &self,
        ctx: &mut C,
        record_json: &[u8],
    ) -> ContractResult<LetterOfCredit> {
        let op = Transition::Issue.name();
        let mut loc = LetterOfCredit::from_json(record_json)
            .map_err(|e| ContractError::serialization(op, "", e))?;
        loc.validate_for_issue()
            .map_err(|e| ContractError::InvalidArguments {
                op,
                cause: e.to_string(),
            })?;
        let id = loc.id.clone();
        let caller = self.caller_org(&*ctx, op, &id, Transition::Issue.role())?;

        if ctx
            .get_state(&id)
            .map_err(|e| ContractError::persistence(op, &id, e))?
            .is_some()
        {
            warn!(op, id = %id, caller = %caller, "issuance refused: identifier in use");
            return Err(ContractError::AlreadyExists { op, id });
        }

        self.check(&*ctx, Transition::Issue, &id, &caller, &loc)?;

        let ts = self.stamp(&*ctx);
        loc.doc_type = self.config.doc_type.clone();
        loc.current_status = Transition::Issue.target();
        loc.is_active = true;
        loc.docs_urls = Vec::new();
        loc.status_log = Vec::new();
        loc.record_status(format!("LoC issued by {} on {ts}", loc.applicant_bank));

        self.persist(ctx, Transition::Issue, &loc)?;
        Ok(loc)
    }

    // ---- Transitions on existing records ----

    pub fn acknowledge_issuance<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::AcknowledgeIssuance, id, |loc, ts| {
            let entry = format!(
                "LoC issuance acknowledged by {} on {ts}",
                loc.advise_through_bank
            );
            loc.record_status(entry);
        })
    }

    /// Replace the credit amount. The audit entry keeps the prior value.
    pub fn amend_amount<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        amount: i64,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::AmendAmount, id, |loc, ts| {
            let entry = format!(
                "LoC amount amended by {} from {} to {amount} on {ts}",
                loc.applicant_bank, loc.amount
            );
            loc.amount = amount;
            loc.record_status(entry);
        })
    }

    /// Acknowledge the amendment and move straight on to awaiting documents.
    pub fn acknowledge_amendment<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::AcknowledgeAmendment, id, |loc, ts| {
            let acknowledged = format!(
                "LoC amendment acknowledged by {} on {ts}",
                loc.advise_through_bank
            );
            let awaiting = format!(
                "{} awaiting documents from {}",
                loc.applicant_bank, loc.negotiating_bank
            );
            loc.record_status(acknowledged);
            loc.record_status(awaiting);
        })
    }

    /// Attach the presented documents. Any earlier list is replaced.
    pub fn submit_documents<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        docs_urls: Vec<String>,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::SubmitDocuments, id, move |loc, ts| {
            let entry = format!(
                "Document(s) submitted by {} to {} on {ts}",
                loc.negotiating_bank, loc.applicant_bank
            );
            loc.docs_urls = docs_urls;
            loc.record_status(entry);
        })
    }

    pub fn accept_documents<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::AcceptDocuments, id, |loc, ts| {
            let entry = format!(
                "Documents accepted by {} from {} on {ts}",
                loc.applicant_bank, loc.negotiating_bank
            );
            loc.record_status(entry);
        })
    }

    pub fn confirm_payment<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::ConfirmPayment, id, |loc, ts| {
            let entry = format!(
                "Payment confirmed from {} to {} on {ts}",
                loc.applicant_bank, loc.negotiating_bank
            );
            loc.record_status(entry);
        })
    }

    pub fn acknowledge_payment<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::AcknowledgePayment, id, |loc, ts| {
            let entry = format!(
                "Payment acknowledged from {} to {} on {ts}",
                loc.applicant_bank, loc.negotiating_bank
            );
            loc.record_status(entry);
        })
    }

    /// Close the credit. The record stays on the ledger, inactive.
    pub fn close<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        self.advance(ctx, Transition::Close, id, |loc, ts| {
            loc.is_active = false;
            let entry = format!("LoC closed by {} on {ts}", loc.applicant_bank);
            loc.record_status(entry);
        })
    }

    // ---- Shared steps ----

    /// Read, check, mutate, write, emit.
    fn advance<C, F>(
        &self,
        ctx: &mut C,
        transition: Transition,
        id: &str,
        mutate: F,
    ) -> ContractResult<LetterOfCredit>
    where
        C: TransactionContext,
        F: FnOnce(&mut LetterOfCredit, &str),
    {
        let op = transition.name();
        let caller = self.caller_org(&*ctx, op, id, transition.role())?;
        let mut loc = self.load(&*ctx, op, id)?;

        self.check(&*ctx, transition, id, &caller, &loc)?;

        let ts = self.stamp(&*ctx);
        mutate(&mut loc, &ts);
        loc.current_status = transition.target();

        self.persist(ctx, transition, &loc)?;
        Ok(loc)
    }

    /// Run the gate and turn a denial into the matching error.
    fn check<C: ClientIdentity>(
        &self,
        ctx: &C,
        transition: Transition,
        id: &str,
        caller: &OrgId,
        loc: &LetterOfCredit,
    ) -> ContractResult<()> {
        let op = transition.name();
        let proposal = TransitionProposal::new(transition, id, caller.clone());
        let result = self
            .gate
            .evaluate(&proposal, loc)
            .map_err(|e| ContractError::Config(format!("{op}[{id}]: {e}")))?;

        let Some(denial) = result.denial else {
            return Ok(());
        };
        warn!(op, id, caller = %caller, tx_id = ctx.tx_id(), reason = %denial, "transition denied");
        Err(match denial {
            Denial::InvalidState { current, expected } => ContractError::InvalidState {
                op,
                id: id.to_string(),
                current,
                expected,
            },
            Denial::Unauthorized { caller, role, .. } => ContractError::Unauthorized {
                op,
                id: id.to_string(),
                caller: caller.to_string(),
                role,
            },
        })
    }

    /// Serialize, write back under the record's key, and set the event.
    fn persist<C: WorldState + EventSink + ClientIdentity>(
        &self,
        ctx: &mut C,
        transition: Transition,
        loc: &LetterOfCredit,
    ) -> ContractResult<()> {
        let op = transition.name();
        let bytes = loc
            .to_json()
            .map_err(|e| ContractError::serialization(op, &loc.id, e))?;
        ctx.put_state(&loc.id, bytes.clone())
            .map_err(|e| ContractError::persistence(op, &loc.id, e))?;
        ctx.set_event(transition.event_name(), bytes)
            .map_err(|e| ContractError::persistence(op, &loc.id, e))?;

        info!(
            op,
            id = %loc.id,
            tx_id = ctx.tx_id(),
            status = %loc.current_status,
            event = transition.event_name(),
            "transition applied"
        );
        Ok(())
    }

    /// Read and decode a record; absent is [`ContractError::NotFound`].
    ///
    /// A blank identifier can never name a record, so it is reported as
    /// absent without touching the ledger.
    pub(crate) fn load<C: WorldState>(
        &self,
        ctx: &C,
        op: &'static str,
        id: &str,
    ) -> ContractResult<LetterOfCredit> {
        if id.trim().is_empty() {
            return Err(ContractError::NotFound {
                op,
                id: id.to_string(),
            });
        }
        let bytes = ctx
            .get_state(id)
            .map_err(|e| ContractError::persistence(op, id, e))?
            .ok_or_else(|| ContractError::NotFound {
                op,
                id: id.to_string(),
            })?;
        LetterOfCredit::from_json(&bytes).map_err(|e| ContractError::serialization(op, id, e))
    }

    /// Organization of the submitter. An identity that leaves nothing once
    /// the suffix is stripped cannot hold any role.
    pub(crate) fn caller_org<C: ClientIdentity>(
        &self,
        ctx: &C,
        op: &'static str,
        id: &str,
        role: Role,
    ) -> ContractResult<OrgId> {
        OrgId::from_msp_id(ctx.msp_id(), &self.config.msp_suffix).map_err(|_| {
            warn!(op, id, msp_id = ctx.msp_id(), "caller identity names no organization");
            ContractError::Unauthorized {
                op,
                id: id.to_string(),
                caller: ctx.msp_id().to_string(),
                role,
            }
        })
    }

    fn stamp<C: ClientIdentity>(&self, ctx: &C) -> String {
        self.clock.status_stamp(&ctx.tx_timestamp())
    }
}

impl Default for LocContract {
    fn default() -> Self {
        let config = ContractConfig::default();
        Self {
            clock: StatusClock::default(),
            config,
            gate: TransitionGate::with_default_stages(),
        }
    }
}
