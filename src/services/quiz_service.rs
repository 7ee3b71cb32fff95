use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::quiz_dto::{AddQuestionRequest, CreateQuizRequest, SubmitAnswerRequest};
use crate::error::{Error, Result};
use crate::models::question::{DEFAULT_MAX_POINTS, DEFAULT_TIME_LIMIT_SECS};
use crate::models::{Answer, LeaderboardEntry, Question, Quiz};
use crate::realtime::events;
use crate::stores::{AnswerStore, LeaderboardStore, QuizStore};
use crate::utils::code::generate_join_code;

use super::realtime_service::RealtimeService;

/// Entries pushed with each `leaderboard_update` and returned by the
/// leaderboard endpoint.
const LEADERBOARD_SIZE: i64 = 10;

/// Join-code allocation attempts before giving up.
const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct QuizService {
    quizzes: Arc<dyn QuizStore>,
    answers: Arc<dyn AnswerStore>,
    leaderboard: Arc<dyn LeaderboardStore>,
    realtime: RealtimeService,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizStore>,
        answers: Arc<dyn AnswerStore>,
        leaderboard: Arc<dyn LeaderboardStore>,
        realtime: RealtimeService,
    ) -> Self {
        Self {
            quizzes,
            answers,
            leaderboard,
            realtime,
        }
    }

    pub async fn create_quiz(&self, req: CreateQuizRequest, owner_id: Uuid) -> Result<Quiz> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let quiz = Quiz::new(
                req.title.clone(),
                req.description.clone(),
                generate_join_code(),
                owner_id,
            );
            match self.quizzes.create_quiz(&quiz).await {
                Ok(()) => return Ok(quiz),
                Err(Error::Conflict(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(Error::Internal(
            "could not allocate a unique join code".to_string(),
        ))
    }

    pub async fn add_question(&self, quiz_id: Uuid, req: AddQuestionRequest) -> Result<Question> {
        // Make sure the quiz exists before attaching a question to it.
        self.quizzes.get_quiz(quiz_id).await?;

        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4(),
            quiz_id,
            text: req.text,
            options: Json(req.options),
            correct_answer: req.correct_answer,
            time_limit: match req.time_limit {
                Some(limit) if limit > 0 => limit,
                _ => DEFAULT_TIME_LIMIT_SECS,
            },
            points: match req.points {
                Some(points) if points > 0 => points,
                _ => DEFAULT_MAX_POINTS,
            },
            order: req.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        self.quizzes.create_question(&question).await?;
        Ok(question)
    }

    pub async fn get_quiz(&self, id: Uuid) -> Result<Quiz> {
        self.quizzes.get_quiz(id).await
    }

    pub async fn join_quiz(&self, code: &str) -> Result<Quiz> {
        self.quizzes.get_quiz_by_code(code).await
    }

    /// Records one answer and pushes the refreshed top-10 to the quiz room.
    ///
    /// The rank counter is consumed before the idempotency probe, so a
    /// duplicate submission burns a rank number that is never awarded;
    /// moving the probe earlier would still lose to the concurrent race, and
    /// the unique index on (quiz, question, user) remains the authority.
    pub async fn submit_answer(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
        req: SubmitAnswerRequest,
    ) -> Result<Answer> {
        let question = self.quizzes.get_question(req.question_id).await?;

        let is_correct = question.correct_answer == req.answer;
        let mut points = 0;
        if is_correct {
            let rank = self.leaderboard.next_rank(quiz_id, question.id).await?;
            points = compute_points(question.points, rank);
        }

        if self
            .answers
            .has_answered(quiz_id, question.id, user_id)
            .await?
        {
            return Err(Error::AlreadyAnswered);
        }

        let answer = Answer::new(quiz_id, question.id, user_id, req.answer, is_correct, points);
        self.answers.record(&answer).await?;

        // The answer row is the system of record; a failed score or
        // broadcast is reconciled later by replaying answers.
        if let Err(err) = self
            .leaderboard
            .add_score(quiz_id, user_id, f64::from(points))
            .await
        {
            tracing::warn!(error = %err, %quiz_id, %user_id, "answer recorded but score update failed");
            return Ok(answer);
        }

        match self.leaderboard.top(quiz_id, LEADERBOARD_SIZE).await {
            Ok(top) => {
                self.realtime
                    .broadcast_to_quiz(quiz_id, events::LEADERBOARD_UPDATE, &top)
            }
            Err(err) => {
                tracing::warn!(error = %err, %quiz_id, "leaderboard read for broadcast failed")
            }
        }

        Ok(answer)
    }

    pub async fn get_leaderboard(&self, quiz_id: Uuid) -> Result<Vec<LeaderboardEntry>> {
        self.leaderboard.top(quiz_id, LEADERBOARD_SIZE).await
    }
}

/// Speed-decay scoring: the k-th correct submission earns
/// `max * 0.9^(k-1)`, floored at 10% of max (at least 1 point), truncated
/// toward zero. A question configured with zero max points prices as 1000.
fn compute_points(max_points: i32, rank: i64) -> i32 {
    let max = if max_points == 0 {
        1000.0
    } else {
        f64::from(max_points)
    };

    let decayed = max * 0.9_f64.powi(rank as i32 - 1);
    let floor = (max * 0.1).max(1.0);
    decayed.max(floor) as i32
}
