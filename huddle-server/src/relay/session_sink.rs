use crate::relay::EventSink;
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::{ConnId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Production [`EventSink`]: one unbounded outbound channel per live
/// WebSocket session. Sends never block; a failed send means the session
/// is already tearing down and the event is dropped for that recipient
/// only.
#[derive(Clone, Default)]
pub struct SessionSink {
    sessions: Arc<DashMap<ConnId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl SessionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&self, conn: ConnId, tx: mpsc::UnboundedSender<ServerEvent>) {
        self.sessions.insert(conn, tx);
    }

    pub fn remove_session(&self, conn: &ConnId) {
        self.sessions.remove(conn);
    }
}

#[async_trait]
impl EventSink for SessionSink {
    async fn deliver(&self, conn: &ConnId, event: ServerEvent) {
        if let Some(tx) = self.sessions.get(conn) {
            if tx.send(event).is_err() {
                warn!("Session channel closed for {}", conn);
            }
        } else {
            warn!("Attempted to deliver an event to unknown session {}", conn);
        }
    }
}
