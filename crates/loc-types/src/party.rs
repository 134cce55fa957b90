use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Suffix the membership service appends to organization names.
pub const DEFAULT_MSP_SUFFIX: &str = "MSP";

/// Verified organization identifier of a transaction submitter.
///
/// Derived from the membership-service identity by stripping its suffix, so
/// `Org1MSP` becomes `Org1`. Party fields on a record hold the same form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgId(String);

impl OrgId {
    /// Wrap an already-derived organization name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the organization from a verified membership-service identity.
    ///
    /// Fails when nothing remains after the suffix is stripped: such a
    /// caller cannot be matched against any party field.
    ///
    /// ```
    /// use loc_types::OrgId;
    ///
    /// let org = OrgId::from_msp_id("Org1MSP", "MSP").unwrap();
    /// assert_eq!(org.as_str(), "Org1");
    /// assert!(OrgId::from_msp_id("MSP", "MSP").is_err());
    /// ```
    pub fn from_msp_id(msp_id: &str, suffix: &str) -> Result<Self, TypeError> {
        let trimmed = msp_id.trim();
        let name = trimmed.strip_suffix(suffix).unwrap_or(trimmed);
        if name.is_empty() {
            return Err(TypeError::UnattributedIdentity(msp_id.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrgId({})", self.0)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for OrgId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OrgId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Bank role a party plays on a letter of credit.
///
/// Each role maps to one party field on the record; transitions are gated
/// on the caller's organization matching that field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Issues, amends, accepts documents, pays, and closes.
    ApplicantBank,
    /// Acknowledges issuance and amendments.
    AdvisingBank,
    /// Submits documents and acknowledges payment.
    NegotiatingBank,
}

impl Role {
    /// Wire name of the record field holding this party.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ApplicantBank => "applicant_bank",
            Self::AdvisingBank => "advise_through_bank",
            Self::NegotiatingBank => "negotiating_bank",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicantBank => write!(f, "applicant bank"),
            Self::AdvisingBank => write!(f, "advising bank"),
            Self::NegotiatingBank => write!(f, "negotiating bank"),
        }
    }
}
