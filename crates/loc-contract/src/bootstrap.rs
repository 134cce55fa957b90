//! Demonstration data.
//!
//! Writes one fixed, already-issued letter of credit straight to the world
//! state. Nothing here goes through the transition engine, and no event is
//! emitted.

use loc_ledger::WorldState;
use loc_types::{LetterOfCredit, LocStatus};
use tracing::info;

use crate::contract::LocContract;
use crate::error::{ContractError, ContractResult};

/// Identifier of the sample credit.
pub const SAMPLE_ID: &str = "INLCU0100220001";

const SAMPLE_DOCUMENTS_REQUIRED: &str = "1: BILL OF EXCHANGE WILL BE PRESENTED AFTER DEDUCTION OF TDS AT 0.1 PCT ON BASIC VALUE OF THE INVOICE. \
2: TAX INVOICE IN ONE ORIGINAL. \
3: ORIGINAL LORRY RECEIPT ISSUED BY NON IBA APPROVED TRANSPORTER CONSIGNED TO RBL BANK LTD NOTIFY APPLICANT AND MARKED FREIGHT PREPAID. \
4.INSURANCE POLICY/CERTIFICATE IN THE CURRENCY OF THE CREDIT AND BLANK ENDORSED FOR CIP VALUE OF GOODS PLUS 10 PCT SHOWING CLAIMS PAYABLE IN INDIA IRRESPECTIVE OF PERCENTAGE. \
5: INSURANCE TO COVER ALL RISKS FROM SUPPLIER WAREHOUSE TO APPLICANT WAREHOUSE.";

/// The sample credit: Org1 issuing, Org2 advising and negotiating.
pub fn sample_record(doc_type: &str) -> LetterOfCredit {
    LetterOfCredit {
        id: SAMPLE_ID.into(),
        doc_type: doc_type.into(),
        documentary_credit_number: SAMPLE_ID.into(),
        form_of_documentary_credit: "IRREVOCABLE".into(),
        date_of_issue: "20220105".into(),
        date_of_expiry: "20220221".into(),
        place_of_expiry: "NEGOTIATION BANK COUNTER".into(),
        applicant_bank: "Org1".into(),
        applicant: "AMBER ENTERPRISES INDIA LTD, C-3, SITE-IV, UPSIDC IND. AREA, KASNA ROAD, GREATER NOIDA-201305, U.P, INDIA".into(),
        beneficiary: "POSCO INDIA PROCESSING CENTER PVT".into(),
        currency_code: "INR".into(),
        amount: 11_436_300,
        available_with_by: "ANY BANK IN INDIA BY NEGOTIATION".into(),
        drafts_at: "90 DAYS FROM THE DATE OF BILL OF EXCHANGE".into(),
        loading_from: "ANYWHERE IN INDIA".into(),
        transportation_to: "ANYWHERE IN INDIA".into(),
        description_of_goods_and_services: "100 MT OF GI SHEET AS PER PI NO. POSCO-IHPL/PI/AEPL/JAN2022/01 DTD 04.01.2022, HS CODE:72104900, CIP, ANY WHERE IN INDIA, INCOTERMS 2020".into(),
        documents_required: SAMPLE_DOCUMENTS_REQUIRED.into(),
        charges: "APPLICANT BANK CHARGES TO APPLICANT ACCOUNT AND BENEFICIARY ACCOUNT INCLUDING DISCREPANCY CHARGES TO BENEFICIARY ACCOUNT".into(),
        period_for_presentation: "WITHIN 21 DAYS FROM THE DATE OF SHIPMENT BUT WITHIN THE VALIDITY OF THE LC.".into(),
        reimbursing_bank: "Org1".into(),
        instructions_to_the_paying_or_accepting_or_negotiating_bank: "UPON SUBMISSION OF CREDIT COMPLIANT DOCUMENTS, WE WILL REIMBURSE YOU ON DUE DATE AS PER YOUR INSTRUCTIONS".into(),
        advise_through_bank: "Org2".into(),
        negotiating_bank: "Org2".into(),
        is_active: true,
        current_status: LocStatus::IssuedByApplicantBank,
        status_log: vec!["LoC issued by Org1 on Apr 11, 2022 at 11:46 AM".into()],
        docs_urls: vec![
            "https://bafybeidbwaneqilaaytdvwspd6f4mvashv6wbguqxsbawbp23sbz4ypjcy.ipfs.infura-ipfs.io"
                .into(),
        ],
    }
}

impl LocContract {
    /// Seed the sample credit. Refuses to overwrite an existing record.
    pub fn bootstrap<C: WorldState>(&self, ctx: &mut C) -> ContractResult<LetterOfCredit> {
        let op = "Bootstrap";
        let loc = sample_record(&self.config().doc_type);

        if ctx
            .get_state(&loc.id)
            .map_err(|e| ContractError::persistence(op, &loc.id, e))?
            .is_some()
        {
            return Err(ContractError::AlreadyExists { op, id: loc.id });
        }

        let bytes = loc
            .to_json()
            .map_err(|e| ContractError::serialization(op, &loc.id, e))?;
        ctx.put_state(&loc.id, bytes)
            .map_err(|e| ContractError::persistence(op, &loc.id, e))?;

        info!(op, id = %loc.id, "sample record seeded");
        Ok(loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_a_consistent_issued_credit() {
        let loc = sample_record("LoC");
        assert_eq!(loc.id, loc.documentary_credit_number);
        assert_eq!(loc.current_status, LocStatus::IssuedByApplicantBank);
        assert!(loc.is_active);
        assert_eq!(loc.status_log.len(), 1);
        assert!(loc.status_log[0].starts_with("LoC issued by Org1"));
        assert!(loc.validate_for_issue().is_ok());
    }

    #[test]
    fn documents_required_lists_five_items() {
        let loc = sample_record("LoC");
        assert!(loc.documents_required.starts_with("1: BILL OF EXCHANGE"));
        assert!(loc.documents_required.contains(" 5: INSURANCE TO COVER"));
    }
}
