use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BotState {
    Ready,
    NotInitialized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub bot_state: BotState,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(bot_state: BotState) -> Self {
        Self {
            status: "ok".to_string(),
            bot_state,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_rss_bytes: Option<u64>,

    pub webhooks_received: u64,
    pub notifications_sent: u64,
    pub notifications_failed: u64,
}
