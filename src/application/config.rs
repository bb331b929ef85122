use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::DatedMinimum;

/// Optional deployment configuration: the dated minimum-wage table consulted
/// when an insured person has no salary of their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub minimum_wage: Vec<DatedMinimum>,
}

impl AppConfig {
    /// Load the configuration file; a missing file means an empty table.
    pub fn load(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                serde_json::from_str(&raw).with_context(|| format!("Malformed config file: {path}"))
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => {
                Err(error).with_context(|| format!("Failed to read config file: {path}"))
            }
        }
    }
}
