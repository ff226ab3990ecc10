use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: String,
}

/// Bot API response envelope, shared by every method call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResult {
    pub ok: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub result: Option<Value>,
}

/// Inbound webhook update. Only the fields the relay inspects are modeled;
/// everything else in the update is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,

    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,

    #[serde(default)]
    pub from: Option<User>,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
}
