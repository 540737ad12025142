use crate::accumulator::{AccountingParams, SummaryPolicy, UnmarkedPolicy};
use crate::fee::DEFAULT_TAKER_FEE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Directory receiving the report artifact
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub accounting: AccountingConfig,
}

fn default_output_dir() -> String {
    "output".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AccountingConfig {
    /// Taker fee rate in 10^6 precision (3000 = 0.30%)
    pub taker_fee_rate: u64,
    pub summary_policy: SummaryPolicy,
    pub unmarked_policy: UnmarkedPolicy,
    /// Stable-sort each stream by extracted time before aligning
    pub sort_inputs: bool,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            taker_fee_rate: DEFAULT_TAKER_FEE,
            summary_policy: SummaryPolicy::default(),
            unmarked_policy: UnmarkedPolicy::default(),
            sort_inputs: true,
        }
    }
}

impl AccountingConfig {
    pub fn params(&self) -> AccountingParams {
        AccountingParams {
            taker_fee_rate: self.taker_fee_rate,
            unmarked: self.unmarked_policy,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`.
    pub fn load(env: &str) -> Result<Self> {
        Self::load_from(format!("config/{}.yaml", env))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
