pub mod auth_service;
pub mod quiz_service;
pub mod realtime_service;
