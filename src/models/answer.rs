use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub answer: String,
    pub is_correct: bool,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(
        quiz_id: Uuid,
        question_id: Uuid,
        user_id: Uuid,
        answer: String,
        is_correct: bool,
        points: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            quiz_id,
            question_id,
            user_id,
            answer,
            is_correct,
            points,
            created_at: now,
            updated_at: now,
        }
    }
}
