use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    #[serde(default)]
    pub telegram_chat_ids: String,

    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_enforce_json_content")]
    pub enforce_json_content: bool,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_enforce_json_content() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }

    pub fn recipient_ids(&self) -> Vec<i64> {
        parse_recipient_ids(&self.telegram_chat_ids)
    }
}

/// Parses a comma-separated chat ID list. Entries are trimmed, empty entries
/// are dropped, non-numeric entries are discarded.
pub fn parse_recipient_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| entry.parse::<i64>().ok())
        .collect()
}
