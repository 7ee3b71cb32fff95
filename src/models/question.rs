use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

pub const DEFAULT_TIME_LIMIT_SECS: i32 = 30;
pub const DEFAULT_MAX_POINTS: i32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    /// Candidate answers, stored as a JSON array.
    pub options: Json<Vec<String>>,
    pub correct_answer: String,
    pub time_limit: i32,
    /// Maximum points awarded to the first correct submission.
    pub points: i32,
    #[sqlx(rename = "item_order")]
    #[serde(rename = "order")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
