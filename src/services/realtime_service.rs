use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::realtime::{Envelope, Hub};

/// Thin facade between the scoring path and the hub: callers name an event
/// and a payload, the facade shapes the wire envelope. Broadcasts never fail
/// the caller; an unencodable payload is logged and dropped.
#[derive(Clone, Default)]
pub struct RealtimeService {
    hub: Arc<Hub>,
}

impl RealtimeService {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Hub::new()),
        }
    }

    pub fn hub(&self) -> Arc<Hub> {
        Arc::clone(&self.hub)
    }

    pub fn broadcast_to_quiz<T: Serialize>(&self, quiz_id: Uuid, event: &str, payload: &T) {
        match Envelope::new(event, payload) {
            Ok(message) => self.hub.broadcast_to_room(quiz_id, &message),
            Err(err) => {
                tracing::warn!(error = %err, %quiz_id, event, "failed to encode realtime payload")
            }
        }
    }

    pub fn broadcast_to_user<T: Serialize>(&self, user_id: Uuid, event: &str, payload: &T) {
        match Envelope::new(event, payload) {
            Ok(message) => self.hub.broadcast_to_user(user_id, &message),
            Err(err) => {
                tracing::warn!(error = %err, %user_id, event, "failed to encode realtime payload")
            }
        }
    }

    pub fn broadcast_all<T: Serialize>(&self, event: &str, payload: &T) {
        match Envelope::new(event, payload) {
            Ok(message) => self.hub.broadcast_all(&message),
            Err(err) => tracing::warn!(error = %err, event, "failed to encode realtime payload"),
        }
    }
}
