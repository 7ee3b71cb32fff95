#![allow(dead_code)]

use quizhub::{config::Config, routes, stores::Stores, AppState};
use serde_json::{json, Value};

/// Spawns the full router on a random port, backed by the in-memory stores,
/// and returns the base URL.
pub async fn spawn_app() -> String {
    let config = Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        redis_url: String::new(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiry_hours: 1,
    };
    let state = AppState::new(config, Stores::in_memory());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Registers a fresh user and logs in; returns (token, user id).
pub async fn auth(client: &reqwest::Client, base: &str, username: &str, email: &str) -> (String, String) {
    let resp = client
        .post(format!("{base}/api/v1/auth/register"))
        .json(&json!({
            "username": username,
            "email": email,
            "password": "password123",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status().as_u16(), 201, "register should succeed");

    let resp = client
        .post(format!("{base}/api/v1/auth/login"))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");

    let body: Value = resp.json().await.unwrap();
    let token = body["data"]["token"].as_str().expect("token in login body").to_string();
    let user_id = body["data"]["user"]["id"].as_str().expect("user id in login body").to_string();
    (token, user_id)
}

/// Creates a quiz and returns (quiz id, join code).
pub async fn create_quiz(client: &reqwest::Client, base: &str, token: &str, title: &str) -> (String, String) {
    let resp = client
        .post(format!("{base}/api/v1/quizzes"))
        .bearer_auth(token)
        .json(&json!({ "title": title, "description": "test quiz" }))
        .send()
        .await
        .expect("create quiz request failed");
    assert_eq!(resp.status().as_u16(), 201, "quiz creation should succeed");

    let body: Value = resp.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let code = body["data"]["code"].as_str().unwrap().to_string();
    (id, code)
}

/// Adds a Paris/London question and returns the question id.
pub async fn add_question(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    quiz_id: &str,
    points: i64,
) -> String {
    let resp = client
        .post(format!("{base}/api/v1/quizzes/{quiz_id}/questions"))
        .bearer_auth(token)
        .json(&json!({
            "text": "Capital of France?",
            "options": ["Paris", "London"],
            "correct_answer": "Paris",
            "points": points,
            "time_limit": 10,
        }))
        .send()
        .await
        .expect("add question request failed");
    assert_eq!(resp.status().as_u16(), 201, "question creation should succeed");

    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

pub async fn submit_answer(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    quiz_id: &str,
    question_id: &str,
    answer: &str,
) -> reqwest::Response {
    client
        .post(format!("{base}/api/v1/quizzes/{quiz_id}/submit"))
        .bearer_auth(token)
        .json(&json!({ "question_id": question_id, "answer": answer }))
        .send()
        .await
        .expect("submit request failed")
}

pub async fn get_leaderboard(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    quiz_id: &str,
) -> Vec<Value> {
    let resp = client
        .get(format!("{base}/api/v1/quizzes/{quiz_id}/leaderboard"))
        .bearer_auth(token)
        .send()
        .await
        .expect("leaderboard request failed");
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    body["data"].as_array().expect("leaderboard array").clone()
}
