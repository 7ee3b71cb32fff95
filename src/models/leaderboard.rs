use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived view over the per-quiz ordered set; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub score: f64,
    /// 1-based position in the returned slice, highest score first.
    pub rank: i32,
}
