use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lifecycle status of a letter of credit.
///
/// Variants are declared in lifecycle order; [`LocStatus::rank`] exposes that
/// order so callers can assert the status never moves backwards. The wire
/// form is the upper-case name, e.g. `"ISSUED_BY_APPLICANT_BANK"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocStatus {
    #[default]
    IssuedByApplicantBank,
    IssuanceAcknowledgedByAdvisingBank,
    AmendedByApplicantBank,
    /// Transient: the amendment acknowledgement moves straight on to
    /// [`LocStatus::AwaitingDocuments`] within the same transaction.
    AmendmentAcknowledgedByAdvisingBank,
    AwaitingDocuments,
    DocumentsSubmittedByNegotiatingBank,
    DocumentsAcceptedByApplicantBank,
    PaymentDoneFromApplicantBankToNegotiatingBank,
    PaymentAcknowledgedFromApplicantBankToNegotiatingBank,
    ClosedByApplicantBank,
}

impl LocStatus {
    /// Every status in lifecycle order.
    pub const ALL: [LocStatus; 10] = [
        Self::IssuedByApplicantBank,
        Self::IssuanceAcknowledgedByAdvisingBank,
        Self::AmendedByApplicantBank,
        Self::AmendmentAcknowledgedByAdvisingBank,
        Self::AwaitingDocuments,
        Self::DocumentsSubmittedByNegotiatingBank,
        Self::DocumentsAcceptedByApplicantBank,
        Self::PaymentDoneFromApplicantBankToNegotiatingBank,
        Self::PaymentAcknowledgedFromApplicantBankToNegotiatingBank,
        Self::ClosedByApplicantBank,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssuedByApplicantBank => "ISSUED_BY_APPLICANT_BANK",
            Self::IssuanceAcknowledgedByAdvisingBank => "ISSUANCE_ACKNOWLEDGED_BY_ADVISING_BANK",
            Self::AmendedByApplicantBank => "AMENDED_BY_APPLICANT_BANK",
            Self::AmendmentAcknowledgedByAdvisingBank => "AMENDMENT_ACKNOWLEDGED_BY_ADVISING_BANK",
            Self::AwaitingDocuments => "AWAITING_DOCUMENTS",
            Self::DocumentsSubmittedByNegotiatingBank => "DOCUMENTS_SUBMITTED_BY_NEGOTIATING_BANK",
            Self::DocumentsAcceptedByApplicantBank => "DOCUMENTS_ACCEPTED_BY_APPLICANT_BANK",
            Self::PaymentDoneFromApplicantBankToNegotiatingBank => {
                "PAYMENT_DONE_FROM_APPLICANT_BANK_TO_NEGOTIATING_BANK"
            }
            Self::PaymentAcknowledgedFromApplicantBankToNegotiatingBank => {
                "PAYMENT_ACKNOWLEDGED_FROM_APPLICANT_BANK_TO_NEGOTIATING_BANK"
            }
            Self::ClosedByApplicantBank => "CLOSED_BY_APPLICANT_BANK",
        }
    }

    /// Position in the lifecycle, 0 for issuance.
    pub fn rank(&self) -> u8 {
        match self {
            Self::IssuedByApplicantBank => 0,
            Self::IssuanceAcknowledgedByAdvisingBank => 1,
            Self::AmendedByApplicantBank => 2,
            Self::AmendmentAcknowledgedByAdvisingBank => 3,
            Self::AwaitingDocuments => 4,
            Self::DocumentsSubmittedByNegotiatingBank => 5,
            Self::DocumentsAcceptedByApplicantBank => 6,
            Self::PaymentDoneFromApplicantBankToNegotiatingBank => 7,
            Self::PaymentAcknowledgedFromApplicantBankToNegotiatingBank => 8,
            Self::ClosedByApplicantBank => 9,
        }
    }

    /// Returns `true` for the closed status; no transition leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ClosedByApplicantBank)
    }
}

impl fmt::Display for LocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_matches_serde() {
        for status in LocStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn rank_follows_declaration_order() {
        for (index, status) in LocStatus::ALL.iter().enumerate() {
            assert_eq!(status.rank() as usize, index);
        }
    }

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!(
            "AWAITING_DOCUMENTS".parse::<LocStatus>().unwrap(),
            LocStatus::AwaitingDocuments
        );
        assert_eq!(
            "ISSUANCE_REQUESTED_BY_APPLICANT".parse::<LocStatus>(),
            Err(TypeError::UnknownStatus("ISSUANCE_REQUESTED_BY_APPLICANT".into()))
        );
    }

    #[test]
    fn only_closed_is_terminal() {
        let terminal: Vec<_> = LocStatus::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&LocStatus::ClosedByApplicantBank]);
    }
}
