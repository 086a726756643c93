use serde::{Deserialize, Serialize};

use crate::reconcile::ReconcileOptions;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub reconcile: ReconcileOptions,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            company_id: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}
