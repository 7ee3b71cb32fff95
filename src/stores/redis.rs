use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use crate::error::Result;
use crate::models::LeaderboardEntry;

use super::LeaderboardStore;

/// Idle expiry for rank counters and leaderboards.
const IDLE_TTL_SECS: i64 = 60 * 60 * 24;

fn submissions_key(quiz_id: Uuid, question_id: Uuid) -> String {
    format!("quiz:{}:question:{}:submissions", quiz_id, question_id)
}

fn leaderboard_key(quiz_id: Uuid) -> String {
    format!("quiz:{}:leaderboard", quiz_id)
}

#[derive(Clone)]
pub struct RedisLeaderboardStore {
    conn: ConnectionManager,
}

impl RedisLeaderboardStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LeaderboardStore for RedisLeaderboardStore {
    async fn next_rank(&self, quiz_id: Uuid, question_id: Uuid) -> Result<i64> {
        let mut conn = self.conn.clone();
        let key = submissions_key(quiz_id, question_id);
        let rank: i64 = conn.incr(&key, 1).await?;
        if rank == 1 {
            let _: bool = conn.expire(&key, IDLE_TTL_SECS).await?;
        }
        Ok(rank)
    }

    async fn add_score(&self, quiz_id: Uuid, user_id: Uuid, points: f64) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = leaderboard_key(quiz_id);
        let _: f64 = conn.zincr(&key, user_id.to_string(), points).await?;
        let _: bool = conn.expire(&key, IDLE_TTL_SECS).await?;
        Ok(())
    }

    async fn top(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let mut conn = self.conn.clone();
        let key = leaderboard_key(quiz_id);
        let members: Vec<(String, f64)> = conn
            .zrevrange_withscores(&key, 0, limit as isize - 1)
            .await?;

        let entries = members
            .into_iter()
            .filter_map(|(member, score)| Uuid::parse_str(&member).ok().map(|id| (id, score)))
            .enumerate()
            .map(|(i, (user_id, score))| LeaderboardEntry {
                user_id,
                username: None,
                score,
                rank: i as i32 + 1,
            })
            .collect();
        Ok(entries)
    }
}
