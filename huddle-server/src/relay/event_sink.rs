use async_trait::async_trait;
use huddle_core::{ConnId, ServerEvent};

/// How the relay hands events back to connected clients. The WebSocket
/// layer implements this over per-session channels; tests substitute a
/// capturing mock.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event to one session. Must not block and must not
    /// fail the caller: a dead session is the recipient's problem.
    async fn deliver(&self, conn: &ConnId, event: ServerEvent);
}
