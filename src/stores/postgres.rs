use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Answer, Question, Quiz, User};

use super::{AnswerStore, QuizStore, UserStore};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("username or email already exists".to_string())
            } else {
                Error::from(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn questions_for(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, options, correct_answer, time_limit, points,
                   item_order, created_at, updated_at
            FROM questions
            WHERE quiz_id = $1
            ORDER BY item_order ASC, created_at ASC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn create_quiz(&self, quiz: &Quiz) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quizzes (id, title, description, code, status, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.code)
        .bind(quiz.status)
        .bind(quiz.owner_id)
        .bind(quiz.created_at)
        .bind(quiz.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("join code already in use".to_string())
            } else {
                Error::from(e)
            }
        })?;
        Ok(())
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Quiz> {
        let mut quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, code, status, owner_id, created_at, updated_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("quiz not found".to_string()))?;

        quiz.questions = self.questions_for(quiz.id).await?;
        Ok(quiz)
    }

    async fn get_quiz_by_code(&self, code: &str) -> Result<Quiz> {
        sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, code, status, owner_id, created_at, updated_at
            FROM quizzes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("quiz not found".to_string()))
    }

    async fn create_question(&self, question: &Question) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, quiz_id, text, options, correct_answer, time_limit,
                                   points, item_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(question.id)
        .bind(question.quiz_id)
        .bind(&question.text)
        .bind(&question.options)
        .bind(&question.correct_answer)
        .bind(question.time_limit)
        .bind(question.points)
        .bind(question.order)
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_question(&self, id: Uuid) -> Result<Question> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, options, correct_answer, time_limit, points,
                   item_order, created_at, updated_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("question not found".to_string()))
    }
}

#[derive(Clone)]
pub struct PgAnswerStore {
    pool: PgPool,
}

impl PgAnswerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerStore for PgAnswerStore {
    async fn record(&self, answer: &Answer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO answers (id, quiz_id, question_id, user_id, answer, is_correct,
                                 points, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(answer.id)
        .bind(answer.quiz_id)
        .bind(answer.question_id)
        .bind(answer.user_id)
        .bind(&answer.answer)
        .bind(answer.is_correct)
        .bind(answer.points)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyAnswered
            } else {
                Error::from(e)
            }
        })?;
        Ok(())
    }

    async fn has_answered(&self, quiz_id: Uuid, question_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM answers
                WHERE quiz_id = $1 AND question_id = $2 AND user_id = $3
            )
            "#,
        )
        .bind(quiz_id)
        .bind(question_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
