//! Storage seams for the quiz engine.
//!
//! Relational data (users, quizzes, questions, answers) is served by
//! Postgres; the rank counters and per-quiz leaderboards live in Redis
//! sorted sets with a 24-hour idle expiry. Every store is consumed through
//! a trait object so the in-memory implementations can stand in for the
//! whole backend inside the test suite.

mod memory;
mod postgres;
mod redis;

pub use memory::{MemoryAnswerStore, MemoryLeaderboardStore, MemoryQuizStore, MemoryUserStore};
pub use postgres::{PgAnswerStore, PgQuizStore, PgUserStore};
pub use redis::RedisLeaderboardStore;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Answer, LeaderboardEntry, Question, Quiz, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
    async fn exists_by_username(&self, username: &str) -> Result<bool>;
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Fails with `Conflict` when the join code is already taken.
    async fn create_quiz(&self, quiz: &Quiz) -> Result<()>;
    /// Returns the quiz with its questions in display order.
    async fn get_quiz(&self, id: Uuid) -> Result<Quiz>;
    async fn get_quiz_by_code(&self, code: &str) -> Result<Quiz>;
    async fn create_question(&self, question: &Question) -> Result<()>;
    async fn get_question(&self, id: Uuid) -> Result<Question>;
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// The unique (quiz, question, user) index is the final authority;
    /// a duplicate insert fails with `AlreadyAnswered`.
    async fn record(&self, answer: &Answer) -> Result<()>;
    async fn has_answered(&self, quiz_id: Uuid, question_id: Uuid, user_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// The k-th successful call for a (quiz, question) returns exactly k
    /// across all concurrent callers.
    async fn next_rank(&self, quiz_id: Uuid, question_id: Uuid) -> Result<i64>;
    async fn add_score(&self, quiz_id: Uuid, user_id: Uuid, points: f64) -> Result<()>;
    async fn top(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<LeaderboardEntry>>;
}

#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub quizzes: Arc<dyn QuizStore>,
    pub answers: Arc<dyn AnswerStore>,
    pub leaderboard: Arc<dyn LeaderboardStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool, redis: ::redis::aio::ConnectionManager) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            quizzes: Arc::new(PgQuizStore::new(pool.clone())),
            answers: Arc::new(PgAnswerStore::new(pool)),
            leaderboard: Arc::new(RedisLeaderboardStore::new(redis)),
        }
    }

    /// Single-process backend; used by the test suite.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            quizzes: Arc::new(MemoryQuizStore::new()),
            answers: Arc::new(MemoryAnswerStore::new()),
            leaderboard: Arc::new(MemoryLeaderboardStore::new()),
        }
    }
}
