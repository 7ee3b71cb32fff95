pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod response;
pub mod routes;
pub mod services;
pub mod stores;
pub mod utils;

use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::quiz_service::QuizService;
use crate::services::realtime_service::RealtimeService;
use crate::stores::Stores;

/// Process-wide component graph, built once at startup and cloned into
/// handlers. The hub and the stores are owned here rather than hiding
/// behind module-level globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub quiz_service: QuizService,
    pub realtime_service: RealtimeService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        let realtime_service = RealtimeService::new();
        let auth_service = AuthService::new(
            stores.users.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiry_hours,
        );
        let quiz_service = QuizService::new(
            stores.quizzes.clone(),
            stores.answers.clone(),
            stores.leaderboard.clone(),
            realtime_service.clone(),
        );
        Self {
            config,
            auth_service,
            quiz_service,
            realtime_service,
        }
    }
}
