use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Outbound event names.
pub mod events {
    pub const ERROR: &str = "error";
    pub const LEADERBOARD_UPDATE: &str = "leaderboard_update";
}

/// Wire frame pushed to clients: `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Envelope {
    pub fn new<T: Serialize>(kind: &str, payload: &T) -> serde_json::Result<Self> {
        Ok(Self {
            kind: kind.to_string(),
            payload: Some(serde_json::to_value(payload)?),
        })
    }

    pub fn error(message: &str) -> Self {
        Self {
            kind: events::ERROR.to_string(),
            payload: Some(json!({ "message": message })),
        }
    }
}

/// Inbound frames are sum-typed on `type`; anything that does not parse into
/// a known variant is ignored by the reader loop.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Inbound {
    JoinQuiz { quiz_id: Uuid },
}
