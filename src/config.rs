//! Agency configuration file
//!
//! Mirrors the settings screen of the back-office: store identity used on
//! document headers, document locale and tax settings, and the policies
//! applied when a vehicle comes back late, over the mileage allowance or
//! short on fuel. Every section is optional.
//!
//! ```toml
//! [store]
//! name = "DriveFlow Management"
//! phone = "+213 550 00 00 00"
//!
//! [document]
//! locale = "fr"
//! tva_rate = 0.19
//!
//! [penalties]
//! mode = "hourly"
//! amount = 800
//! tolerance_minutes = 60
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::billing::{FuelPolicy, MileagePolicy, PenaltyPolicy, ReturnPolicy};
use crate::locale::Locale;
use crate::records::StoreInfo;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Document-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub locale: Locale,
    /// Currency label printed after amounts
    pub currency: String,
    /// Value-added tax rate applied when a reservation is "with TVA"
    pub tva_rate: f64,
    /// Multiplier giving the pre-tax amount printed as `total_ht`
    pub ht_factor: f64,
    /// Open the print dialog as soon as the page loads
    pub auto_print: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            locale: Locale::Fr,
            currency: "DZ".to_string(),
            tva_rate: 0.19,
            ht_factor: 0.81,
            auto_print: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyConfig {
    pub store: StoreInfo,
    pub document: DocumentSettings,
    pub penalties: PenaltyPolicy,
    pub mileage: MileagePolicy,
    pub fuel: FuelPolicy,
}

impl AgencyConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AgencyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.document.tva_rate) {
            return Err(ConfigError::Invalid {
                field: "document.tva_rate",
                reason: format!("{} is not a fraction between 0 and 1", self.document.tva_rate),
            });
        }
        if self.document.ht_factor <= 0.0 || self.document.ht_factor > 1.0 {
            return Err(ConfigError::Invalid {
                field: "document.ht_factor",
                reason: format!("{} must be in (0, 1]", self.document.ht_factor),
            });
        }
        if self.penalties.amount < 0.0 {
            return Err(ConfigError::Invalid {
                field: "penalties.amount",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Penalty rules applied when a vehicle is returned
    pub fn return_policy(&self) -> ReturnPolicy {
        ReturnPolicy {
            late: self.penalties.clone(),
            mileage: self.mileage.clone(),
            fuel: self.fuel.clone(),
        }
    }

    /// Store identity, letting a dataset's own store record win
    pub fn store_for(&self, dataset_store: Option<&StoreInfo>) -> StoreInfo {
        dataset_store.cloned().unwrap_or_else(|| self.store.clone())
    }
}
