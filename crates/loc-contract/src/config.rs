use loc_types::clock::DEFAULT_UTC_OFFSET_MINUTES;
use loc_types::party::DEFAULT_MSP_SUFFIX;
use loc_types::{StatusClock, DOC_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};

/// Deployment settings for the contract.
///
/// ```toml
/// utc_offset_minutes = 330
/// msp_suffix = "MSP"
/// doc_type = "LoC"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Offset east of UTC used to render audit timestamps.
    pub utc_offset_minutes: i32,
    /// Suffix stripped from membership-service identities to obtain the
    /// organization name.
    pub msp_suffix: String,
    /// Discriminator written on every record and used by the listings.
    pub doc_type: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            msp_suffix: DEFAULT_MSP_SUFFIX.to_string(),
            doc_type: DOC_TYPE.to_string(),
        }
    }
}

impl ContractConfig {
    /// Parse and validate TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ContractResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ContractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting.
    pub fn validate(&self) -> ContractResult<()> {
        self.clock()?;
        if self.doc_type.trim().is_empty() {
            return Err(ContractError::Config("doc_type must not be empty".into()));
        }
        Ok(())
    }

    /// The audit clock for the configured offset.
    pub fn clock(&self) -> ContractResult<StatusClock> {
        StatusClock::new(self.utc_offset_minutes).map_err(|e| ContractError::Config(e.to_string()))
    }
}
