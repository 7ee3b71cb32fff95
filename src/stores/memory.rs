//! In-memory counterparts of the Postgres and Redis stores. They back the
//! test suite and a single-process dev setup; idle expiry is not modelled
//! because the data lives only as long as the process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Answer, LeaderboardEntry, Question, Quiz, User};

use super::{AnswerStore, LeaderboardStore, QuizStore, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let taken = users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken {
            return Err(Error::Conflict("username or email already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| u.email == email))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| u.username == username))
    }
}

#[derive(Default)]
pub struct MemoryQuizStore {
    quizzes: Mutex<HashMap<Uuid, Quiz>>,
    questions: Mutex<HashMap<Uuid, Question>>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn create_quiz(&self, quiz: &Quiz) -> Result<()> {
        let mut quizzes = self.quizzes.lock().unwrap();
        if quizzes.values().any(|q| q.code == quiz.code) {
            return Err(Error::Conflict("join code already in use".to_string()));
        }
        quizzes.insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Quiz> {
        let mut quiz = {
            let quizzes = self.quizzes.lock().unwrap();
            quizzes
                .get(&id)
                .cloned()
                .ok_or_else(|| Error::NotFound("quiz not found".to_string()))?
        };
        let questions = self.questions.lock().unwrap();
        let mut listed: Vec<Question> = questions
            .values()
            .filter(|q| q.quiz_id == id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        quiz.questions = listed;
        Ok(quiz)
    }

    async fn get_quiz_by_code(&self, code: &str) -> Result<Quiz> {
        let quizzes = self.quizzes.lock().unwrap();
        quizzes
            .values()
            .find(|q| q.code == code)
            .cloned()
            .ok_or_else(|| Error::NotFound("quiz not found".to_string()))
    }

    async fn create_question(&self, question: &Question) -> Result<()> {
        let mut questions = self.questions.lock().unwrap();
        questions.insert(question.id, question.clone());
        Ok(())
    }

    async fn get_question(&self, id: Uuid) -> Result<Question> {
        let questions = self.questions.lock().unwrap();
        questions
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("question not found".to_string()))
    }
}

#[derive(Default)]
pub struct MemoryAnswerStore {
    rows: Mutex<HashMap<(Uuid, Uuid, Uuid), Answer>>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnswerStore for MemoryAnswerStore {
    async fn record(&self, answer: &Answer) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let key = (answer.quiz_id, answer.question_id, answer.user_id);
        if rows.contains_key(&key) {
            return Err(Error::AlreadyAnswered);
        }
        rows.insert(key, answer.clone());
        Ok(())
    }

    async fn has_answered(&self, quiz_id: Uuid, question_id: Uuid, user_id: Uuid) -> Result<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.contains_key(&(quiz_id, question_id, user_id)))
    }
}

struct MemberScore {
    score: f64,
    /// Monotonic insertion stamp; breaks score ties deterministically.
    first_scored: u64,
}

#[derive(Default)]
pub struct MemoryLeaderboardStore {
    counters: Mutex<HashMap<(Uuid, Uuid), i64>>,
    boards: Mutex<HashMap<Uuid, HashMap<Uuid, MemberScore>>>,
    seq: AtomicU64,
}

impl MemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for MemoryLeaderboardStore {
    async fn next_rank(&self, quiz_id: Uuid, question_id: Uuid) -> Result<i64> {
        let mut counters = self.counters.lock().unwrap();
        let counter = counters.entry((quiz_id, question_id)).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn add_score(&self, quiz_id: Uuid, user_id: Uuid, points: f64) -> Result<()> {
        let mut boards = self.boards.lock().unwrap();
        let board = boards.entry(quiz_id).or_default();
        let stamp = self.seq.fetch_add(1, Ordering::Relaxed);
        board
            .entry(user_id)
            .and_modify(|m| m.score += points)
            .or_insert(MemberScore {
                score: points,
                first_scored: stamp,
            });
        Ok(())
    }

    async fn top(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let boards = self.boards.lock().unwrap();
        let Some(board) = boards.get(&quiz_id) else {
            return Ok(Vec::new());
        };
        let mut members: Vec<(Uuid, f64, u64)> = board
            .iter()
            .map(|(user_id, m)| (*user_id, m.score, m.first_scored))
            .collect();
        members.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });
        members.truncate(limit.max(0) as usize);

        Ok(members
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, score, _))| LeaderboardEntry {
                user_id,
                username: None,
                score,
                rank: i as i32 + 1,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn answer_store_enforces_at_most_one_row() {
        let store = MemoryAnswerStore::new();
        let (quiz, question, user) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let answer = Answer::new(quiz, question, user, "A".to_string(), true, 100);

        store.record(&answer).await.unwrap();
        assert!(store.has_answered(quiz, question, user).await.unwrap());

        let duplicate = Answer::new(quiz, question, user, "A".to_string(), true, 90);
        assert!(matches!(
            store.record(&duplicate).await,
            Err(Error::AlreadyAnswered)
        ));
    }

    #[tokio::test]
    async fn rank_counter_is_sequential_per_question() {
        let store = MemoryLeaderboardStore::new();
        let (quiz, q1, q2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(store.next_rank(quiz, q1).await.unwrap(), 1);
        assert_eq!(store.next_rank(quiz, q1).await.unwrap(), 2);
        assert_eq!(store.next_rank(quiz, q2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_rank_calls_return_every_rank_exactly_once() {
        let store = Arc::new(MemoryLeaderboardStore::new());
        let (quiz, question) = (Uuid::new_v4(), Uuid::new_v4());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.next_rank(quiz, question).await.unwrap()
            }));
        }

        let mut ranks = Vec::new();
        for handle in handles {
            ranks.push(handle.await.unwrap());
        }
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=32).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn top_orders_by_score_descending_with_ranks() {
        let store = MemoryLeaderboardStore::new();
        let quiz = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.add_score(quiz, a, 810.0).await.unwrap();
        store.add_score(quiz, b, 1000.0).await.unwrap();
        store.add_score(quiz, c, 0.0).await.unwrap();

        let top = store.top(quiz, 10).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!((top[0].user_id, top[0].score, top[0].rank), (b, 1000.0, 1));
        assert_eq!((top[1].user_id, top[1].score, top[1].rank), (a, 810.0, 2));
        assert_eq!((top[2].user_id, top[2].score, top[2].rank), (c, 0.0, 3));

        let top_one = store.top(quiz, 1).await.unwrap();
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].user_id, b);
    }

    #[tokio::test]
    async fn scores_accumulate_per_user() {
        let store = MemoryLeaderboardStore::new();
        let quiz = Uuid::new_v4();
        let user = Uuid::new_v4();

        store.add_score(quiz, user, 100.0).await.unwrap();
        store.add_score(quiz, user, 90.0).await.unwrap();

        let top = store.top(quiz, 10).await.unwrap();
        assert_eq!(top[0].score, 190.0);
    }
}
