use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::telegram::{ApiResult, SendMessageRequest};

pub struct TelegramClient {
    http_client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, bot_token: &str) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        })
    }

    /// Delivers one message to one chat. Markdown formatting is always
    /// enabled. Retry and rate limiting are left to the Bot API side.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), Error> {
        let url = self.method_url("sendMessage");

        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            parse_mode: "Markdown".to_string(),
        };

        debug!(chat_id, "Sending Telegram message");

        let response = self.http_client.post(&url).json(&request).send().await?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        let description = serde_json::from_str::<ApiResult>(&body)
            .ok()
            .and_then(|result| result.description)
            .unwrap_or_else(|| format!("Telegram API returned status {}", status));

        Err(anyhow!(description))
    }

    pub async fn webhook_info(&self) -> Result<Value, Error> {
        let url = self.method_url("getWebhookInfo");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();

        if !status.is_success() {
            return Err(anyhow!("Telegram API returned status {}", status));
        }

        let result: ApiResult = response.json().await?;

        if !result.ok {
            return Err(anyhow!(
                result
                    .description
                    .unwrap_or_else(|| "Telegram API reported failure".to_string())
            ));
        }

        Ok(result.result.unwrap_or(Value::Null))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}
