use serde::Deserialize;
use std::path::Path;

use crate::constants::CONFIG_FILE_PATH;

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub rpc_url: String,
    pub addresses_file: String,
    pub success_log: String,
    pub event_name: String,
    pub collection_type: String,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub gas_budget: u64,
    pub dry_run: bool,
    pub continue_on_failure: bool,
    pub confirm_each_batch: bool,
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&cfg_str)?)
    }

    pub async fn read_default() -> Self {
        Self::read_from_file(CONFIG_FILE_PATH)
            .await
            .expect("Default config to be valid")
    }
}
