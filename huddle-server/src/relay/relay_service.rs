use crate::registry::{RegistryError, RoomRegistry};
use crate::relay::EventSink;
use huddle_core::{ConnId, PeerId, RoomId, ServerEvent};
use std::sync::Arc;
use tracing::{info, warn};

/// Translates registry mutations into notification fanout, and relays
/// chat. One instance services every room; per-request failures never
/// cross rooms or connections.
#[derive(Clone)]
pub struct RelayService {
    registry: Arc<RoomRegistry>,
    sink: Arc<dyn EventSink>,
}

impl RelayService {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
            sink,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// `join-room`: register the member, then announce it to every other
    /// current member. A duplicate join is rejected locally; the session
    /// keeps its transport and stays out of the room.
    pub async fn handle_join(
        &self,
        conn: ConnId,
        room_id: RoomId,
        peer_id: PeerId,
        name: String,
    ) -> Result<(), RegistryError> {
        let peers = self
            .registry
            .join(conn.clone(), room_id.clone(), peer_id.clone(), name.clone())?;

        info!("'{}' ({}) joined room '{}'", name, peer_id, room_id);

        let event = ServerEvent::UserConnected {
            user_id: peer_id,
            name,
        };
        for member in peers {
            self.sink.deliver(&member.conn, event.clone()).await;
        }
        Ok(())
    }

    /// Chat fanout: sender-inclusive, so every UI renders from the same
    /// event stream. Only honored while the session is in a room.
    pub async fn handle_message(&self, conn: &ConnId, text: String) {
        let Some((room_id, sender)) = self.registry.lookup(conn) else {
            warn!("Chat from {} ignored: not in any room", conn);
            return;
        };

        let event = ServerEvent::CreateMessage {
            name: sender.name,
            text,
        };
        for member in self.registry.members_of(&room_id) {
            self.sink.deliver(&member.conn, event.clone()).await;
        }
    }

    /// Transport close, explicit or abrupt. Idempotent: a session that
    /// never joined (or already left) produces no fanout.
    pub async fn handle_disconnect(&self, conn: &ConnId) {
        let Some(departure) = self.registry.leave(conn) else {
            return;
        };

        info!(
            "'{}' ({}) left room '{}'",
            departure.member.name, departure.member.peer_id, departure.room_id
        );

        let event = ServerEvent::UserDisconnected {
            user_id: departure.member.peer_id,
        };
        for member in departure.remaining {
            self.sink.deliver(&member.conn, event.clone()).await;
        }
    }
}
