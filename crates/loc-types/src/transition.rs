use std::fmt;

use serde::{Deserialize, Serialize};

use crate::party::Role;
use crate::status::LocStatus;

/// One step of the letter of credit lifecycle.
///
/// Each transition fixes the statuses it may start from, the status it
/// produces, the single role allowed to invoke it, and the event it emits.
///
/// ```text
/// Issue ─→ ISSUED ─→ AcknowledgeIssuance ─→ ISSUANCE_ACKNOWLEDGED
///            │                                     │
///            └──────────── AmendAmount ←───────────┘ (also from AMENDED)
///                              │
///                        AMENDED ─→ AcknowledgeAmendment ─→ AWAITING_DOCUMENTS
///                                                               │
///   SubmitDocuments ─→ AcceptDocuments ─→ ConfirmPayment ─→ AcknowledgePayment ─→ Close
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Issue,
    AcknowledgeIssuance,
    AmendAmount,
    AcknowledgeAmendment,
    SubmitDocuments,
    AcceptDocuments,
    ConfirmPayment,
    AcknowledgePayment,
    Close,
}

impl Transition {
    pub const ALL: [Transition; 9] = [
        Self::Issue,
        Self::AcknowledgeIssuance,
        Self::AmendAmount,
        Self::AcknowledgeAmendment,
        Self::SubmitDocuments,
        Self::AcceptDocuments,
        Self::ConfirmPayment,
        Self::AcknowledgePayment,
        Self::Close,
    ];

    /// Operation name as invoked by clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::AcknowledgeIssuance => "AcknowledgeIssuance",
            Self::AmendAmount => "AmendAmount",
            Self::AcknowledgeAmendment => "AcknowledgeAmendment",
            Self::SubmitDocuments => "SubmitDocuments",
            Self::AcceptDocuments => "AcceptDocuments",
            Self::ConfirmPayment => "ConfirmPayment",
            Self::AcknowledgePayment => "AcknowledgePayment",
            Self::Close => "Close",
        }
    }

    /// Name of the event emitted when the transition commits.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Issue => "LoCIssued",
            Self::AcknowledgeIssuance => "LoCIssuanceAcknowledged",
            Self::AmendAmount => "LoCAmountAmended",
            Self::AcknowledgeAmendment => "LoCAmendmentAcknowledged",
            Self::SubmitDocuments => "DocumentsSubmitted",
            Self::AcceptDocuments => "DocumentsAccepted",
            Self::ConfirmPayment => "PaymentConfirmed",
            Self::AcknowledgePayment => "PaymentAcknowledged",
            Self::Close => "LoCClosed",
        }
    }

    /// The only role permitted to invoke this transition.
    pub fn role(&self) -> Role {
        match self {
            Self::Issue
            | Self::AmendAmount
            | Self::AcceptDocuments
            | Self::ConfirmPayment
            | Self::Close => Role::ApplicantBank,
            Self::AcknowledgeIssuance | Self::AcknowledgeAmendment => Role::AdvisingBank,
            Self::SubmitDocuments | Self::AcknowledgePayment => Role::NegotiatingBank,
        }
    }

    /// Statuses the record must be in for this transition to apply.
    ///
    /// Empty for [`Transition::Issue`], which creates the record.
    pub fn sources(&self) -> &'static [LocStatus] {
        match self {
            Self::Issue => &[],
            Self::AcknowledgeIssuance => &[LocStatus::IssuedByApplicantBank],
            Self::AmendAmount => &[
                LocStatus::IssuedByApplicantBank,
                LocStatus::IssuanceAcknowledgedByAdvisingBank,
                LocStatus::AmendedByApplicantBank,
            ],
            Self::AcknowledgeAmendment => &[LocStatus::AmendedByApplicantBank],
            Self::SubmitDocuments => &[LocStatus::AwaitingDocuments],
            Self::AcceptDocuments => &[LocStatus::DocumentsSubmittedByNegotiatingBank],
            Self::ConfirmPayment => &[LocStatus::DocumentsAcceptedByApplicantBank],
            Self::AcknowledgePayment => {
                &[LocStatus::PaymentDoneFromApplicantBankToNegotiatingBank]
            }
            Self::Close => &[LocStatus::PaymentAcknowledgedFromApplicantBankToNegotiatingBank],
        }
    }

    /// Status the record holds once the transition commits.
    pub fn target(&self) -> LocStatus {
        match self {
            Self::Issue => LocStatus::IssuedByApplicantBank,
            Self::AcknowledgeIssuance => LocStatus::IssuanceAcknowledgedByAdvisingBank,
            Self::AmendAmount => LocStatus::AmendedByApplicantBank,
            Self::AcknowledgeAmendment => LocStatus::AwaitingDocuments,
            Self::SubmitDocuments => LocStatus::DocumentsSubmittedByNegotiatingBank,
            Self::AcceptDocuments => LocStatus::DocumentsAcceptedByApplicantBank,
            Self::ConfirmPayment => LocStatus::PaymentDoneFromApplicantBankToNegotiatingBank,
            Self::AcknowledgePayment => {
                LocStatus::PaymentAcknowledgedFromApplicantBankToNegotiatingBank
            }
            Self::Close => LocStatus::ClosedByApplicantBank,
        }
    }

    /// Returns `true` if the transition may start from `status`.
    pub fn applies_to(&self, status: LocStatus) -> bool {
        self.sources().contains(&status)
    }

    /// Number of audit entries the transition appends.
    pub fn log_entries(&self) -> usize {
        match self {
            Self::AcknowledgeAmendment => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_transition_moves_forward() {
        for transition in Transition::ALL {
            for source in transition.sources() {
                assert!(
                    transition.target().rank() >= source.rank(),
                    "{transition} moves {source} backwards"
                );
            }
        }
    }

    #[test]
    fn only_close_reaches_terminal() {
        for transition in Transition::ALL {
            assert_eq!(
                transition.target().is_terminal(),
                transition == Transition::Close
            );
        }
    }

    #[test]
    fn nothing_leaves_closed() {
        for transition in Transition::ALL {
            assert!(!transition.applies_to(LocStatus::ClosedByApplicantBank));
        }
    }

    #[test]
    fn issue_has_no_sources() {
        assert!(Transition::Issue.sources().is_empty());
        for status in LocStatus::ALL {
            assert!(!Transition::Issue.applies_to(status));
        }
    }

    #[test]
    fn roles_match_table() {
        assert_eq!(Transition::AcknowledgeIssuance.role(), Role::AdvisingBank);
        assert_eq!(Transition::SubmitDocuments.role(), Role::NegotiatingBank);
        assert_eq!(Transition::AcknowledgePayment.role(), Role::NegotiatingBank);
        assert_eq!(Transition::Close.role(), Role::ApplicantBank);
    }

    #[test]
    fn amendment_acknowledgement_writes_two_entries() {
        assert_eq!(Transition::AcknowledgeAmendment.log_entries(), 2);
        assert_eq!(Transition::AmendAmount.log_entries(), 1);
    }

    #[test]
    fn amendment_window_closes_once_documents_are_awaited() {
        let amend = Transition::AmendAmount;
        assert!(amend.applies_to(LocStatus::IssuedByApplicantBank));
        assert!(amend.applies_to(LocStatus::IssuanceAcknowledgedByAdvisingBank));
        assert!(amend.applies_to(LocStatus::AmendedByApplicantBank));
        assert!(!amend.applies_to(LocStatus::AwaitingDocuments));
        assert!(!amend.applies_to(LocStatus::ClosedByApplicantBank));
    }

    proptest! {
        #[test]
        fn status_rank_never_decreases(indices in proptest::collection::vec(0usize..9, 0..40)) {
            let mut status = LocStatus::IssuedByApplicantBank;
            for index in indices {
                let transition = Transition::ALL[index];
                if transition.applies_to(status) {
                    let next = transition.target();
                    prop_assert!(next.rank() >= status.rank());
                    status = next;
                }
            }
        }
    }
}
