use chrono::{DateTime, Utc};
use loc_ledger::{ClientIdentity, KeyHistory, RichQuery, Selector, WorldState};
use loc_types::{LetterOfCredit, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::LocContract;
use crate::error::{ContractError, ContractResult};

/// One committed version of a letter of credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub record: LetterOfCredit,
}

impl LocContract {
    /// Fetch one record by identifier.
    pub fn get_by_id<C: WorldState>(&self, ctx: &C, id: &str) -> ContractResult<LetterOfCredit> {
        let loc = self.load(ctx, "GetByID", id)?;
        debug!(id, status = %loc.current_status, "record read");
        Ok(loc)
    }

    /// Credits the caller issued, as applicant bank.
    pub fn list_issued<C: RichQuery + ClientIdentity>(
        &self,
        ctx: &C,
    ) -> ContractResult<Vec<LetterOfCredit>> {
        self.list_for_role(ctx, "ListIssued", Role::ApplicantBank)
    }

    /// Credits the caller advises.
    pub fn list_advising<C: RichQuery + ClientIdentity>(
        &self,
        ctx: &C,
    ) -> ContractResult<Vec<LetterOfCredit>> {
        self.list_for_role(ctx, "ListAdvising", Role::AdvisingBank)
    }

    /// Credits the caller negotiates.
    pub fn list_negotiating<C: RichQuery + ClientIdentity>(
        &self,
        ctx: &C,
    ) -> ContractResult<Vec<LetterOfCredit>> {
        self.list_for_role(ctx, "ListNegotiating", Role::NegotiatingBank)
    }

    /// Every committed version of a record, oldest first.
    pub fn history<C: KeyHistory>(&self, ctx: &C, id: &str) -> ContractResult<Vec<HistoryEntry>> {
        let op = "GetHistory";
        if id.trim().is_empty() {
            return Err(ContractError::NotFound {
                op,
                id: id.to_string(),
            });
        }
        let versions = ctx.history(id).map_err(|e| ContractError::query(op, e))?;
        if versions.is_empty() {
            return Err(ContractError::NotFound {
                op,
                id: id.to_string(),
            });
        }

        let entries = versions
            .into_iter()
            .map(|version| {
                let record = LetterOfCredit::from_json(&version.value)
                    .map_err(|e| ContractError::serialization(op, id, e))?;
                Ok(HistoryEntry {
                    tx_id: version.tx_id,
                    timestamp: version.timestamp,
                    record,
                })
            })
            .collect::<ContractResult<Vec<_>>>()?;
        debug!(id, versions = entries.len(), "history read");
        Ok(entries)
    }

    /// The selector a role-relative listing runs for `org`.
    pub fn role_selector(&self, role: Role, org: &str) -> Selector {
        Selector::new()
            .field_eq("doc_type", self.config().doc_type.as_str())
            .field_eq(role.field_name(), org)
    }

    fn list_for_role<C: RichQuery + ClientIdentity>(
        &self,
        ctx: &C,
        op: &'static str,
        role: Role,
    ) -> ContractResult<Vec<LetterOfCredit>> {
        let org = self.caller_org(ctx, op, "", role)?;
        let selector = self.role_selector(role, org.as_str());
        let matches = ctx
            .query(&selector)
            .map_err(|e| ContractError::query(op, e))?;

        let records = matches
            .iter()
            .map(|m| {
                LetterOfCredit::from_json(&m.value)
                    .map_err(|e| ContractError::serialization(op, &m.key, e))
            })
            .collect::<ContractResult<Vec<_>>>()?;
        debug!(op, org = %org, count = records.len(), "listing read");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selector_names_role_field() {
        let contract = LocContract::default();
        let selector = contract.role_selector(Role::AdvisingBank, "Org2");
        assert_eq!(
            selector.to_json(),
            json!({"selector": {"doc_type": "LoC", "advise_through_bank": "Org2"}})
        );
    }

    #[test]
    fn selector_keeps_quotes_inside_value() {
        let contract = LocContract::default();
        let selector = contract.role_selector(Role::ApplicantBank, r#"Org1","x":"y"#);
        let document = selector.to_json();
        assert_eq!(document["selector"].as_object().map(|o| o.len()), Some(2));
        assert_eq!(document["selector"]["applicant_bank"], r#"Org1","x":"y"#);
    }
}
