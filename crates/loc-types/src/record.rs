use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::party::Role;
use crate::status::LocStatus;

/// Discriminator stored on every record so indexed queries can tell letters
/// of credit apart from other documents in the same state database.
pub const DOC_TYPE: &str = "LoC";

/// A letter of credit as persisted on the ledger.
///
/// The JSON shape is the ledger value itself and must stay byte-compatible
/// with historical data: the identifier is `ID`, every other field is
/// snake_case. Absent fields deserialize to their defaults because clients
/// submit partially populated records for issuance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterOfCredit {
    /// Documentary-credit serial number; also the ledger key.
    #[serde(rename = "ID")]
    pub id: String,
    pub doc_type: String,
    pub documentary_credit_number: String,
    pub form_of_documentary_credit: String,

    pub date_of_issue: String,
    pub date_of_expiry: String,
    pub place_of_expiry: String,
    pub applicant_bank: String,
    pub applicant: String,
    pub beneficiary: String,
    pub currency_code: String,
    pub amount: i64,
    pub available_with_by: String,
    pub drafts_at: String,
    pub loading_from: String,
    pub transportation_to: String,
    pub description_of_goods_and_services: String,
    pub documents_required: String,
    pub charges: String,
    pub period_for_presentation: String,
    pub reimbursing_bank: String,
    pub instructions_to_the_paying_or_accepting_or_negotiating_bank: String,
    pub advise_through_bank: String,
    pub negotiating_bank: String,

    /// False only once the credit is closed.
    pub is_active: bool,
    pub current_status: LocStatus,
    /// Append-only audit trail.
    pub status_log: Vec<String>,
    pub docs_urls: Vec<String>,
}

impl LetterOfCredit {
    /// Decode a ledger value or client submission.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Encode as the ledger value.
    pub fn to_json(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Organization holding the given role on this credit.
    pub fn party(&self, role: Role) -> &str {
        match role {
            Role::ApplicantBank => &self.applicant_bank,
            Role::AdvisingBank => &self.advise_through_bank,
            Role::NegotiatingBank => &self.negotiating_bank,
        }
    }

    /// Append an audit entry. Entries are never edited or removed.
    pub fn record_status(&mut self, entry: impl Into<String>) {
        self.status_log.push(entry.into());
    }

    /// Check the fields issuance cannot proceed without.
    pub fn validate_for_issue(&self) -> Result<(), TypeError> {
        if self.id.trim().is_empty() {
            return Err(TypeError::InvalidRecord("ID must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_submission_fills_defaults() {
        let loc = LetterOfCredit::from_json(
            br#"{"ID":"L1","applicant_bank":"Org1","advise_through_bank":"Org2","negotiating_bank":"Org2","amount":1000}"#,
        )
        .unwrap();
        assert_eq!(loc.id, "L1");
        assert_eq!(loc.amount, 1000);
        assert!(loc.status_log.is_empty());
        assert!(loc.docs_urls.is_empty());
        assert!(!loc.is_active);
        assert_eq!(loc.current_status, LocStatus::IssuedByApplicantBank);
    }

    #[test]
    fn wire_field_names() {
        let loc = LetterOfCredit {
            id: "L1".into(),
            doc_type: DOC_TYPE.into(),
            amount: 42,
            is_active: true,
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_slice(&loc.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["ID"], "L1");
        assert_eq!(object["doc_type"], "LoC");
        assert_eq!(object["amount"], 42);
        assert_eq!(object["is_active"], true);
        assert_eq!(object["current_status"], "ISSUED_BY_APPLICANT_BANK");
        assert!(object["status_log"].is_array());
        assert!(object["docs_urls"].is_array());
        assert!(object.contains_key("instructions_to_the_paying_or_accepting_or_negotiating_bank"));
        assert!(!object.contains_key("id"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let error =
            LetterOfCredit::from_json(br#"{"ID":"L1","current_status":"LOST"}"#).unwrap_err();
        assert!(matches!(error, TypeError::Serialization(_)));
    }

    #[test]
    fn party_lookup_by_role() {
        let loc = LetterOfCredit {
            applicant_bank: "Org1".into(),
            advise_through_bank: "Org2".into(),
            negotiating_bank: "Org3".into(),
            ..Default::default()
        };
        assert_eq!(loc.party(Role::ApplicantBank), "Org1");
        assert_eq!(loc.party(Role::AdvisingBank), "Org2");
        assert_eq!(loc.party(Role::NegotiatingBank), "Org3");
    }

    #[test]
    fn issue_requires_identifier() {
        let mut loc = LetterOfCredit::default();
        assert!(loc.validate_for_issue().is_err());
        loc.id = "  ".into();
        assert!(loc.validate_for_issue().is_err());
        loc.id = "L1".into();
        assert!(loc.validate_for_issue().is_ok());
    }
}
