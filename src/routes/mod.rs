pub mod auth;
pub mod health;
pub mod quiz;
pub mod ws;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::auth::require_bearer_auth;
use crate::AppState;

/// Assembles the application router: public auth routes, bearer-protected
/// quiz routes, the WebSocket upgrade (which does its own token handling so
/// anonymous spectators are allowed), and `/health`.
pub fn create_router(state: AppState) -> Router {
    let public_auth = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/quizzes", post(quiz::create_quiz))
        .route("/quizzes/join", post(quiz::join_quiz))
        .route("/quizzes/:id", get(quiz::get_quiz))
        .route("/quizzes/:id/questions", post(quiz::add_question))
        .route("/quizzes/:id/submit", post(quiz::submit_answer))
        .route("/quizzes/:id/leaderboard", get(quiz::get_leaderboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    let api = Router::new()
        .merge(public_auth)
        .merge(protected)
        .route("/ws", get(ws::upgrade));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
