use crate::model::{PeerId, RoomId};
use serde::{Deserialize, Serialize};

/// Events a client sends to the relay. The `op`/`d` envelope and the
/// event names are the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientEvent {
    /// Announce membership: (room, external peer identity, display name).
    #[serde(rename = "join-room")]
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        #[serde(rename = "peerId")]
        peer_id: PeerId,
        name: String,
    },

    /// Chat send; the sender is inferred from the session.
    #[serde(rename = "message")]
    Message(String),
}

/// Events the relay fans out to room members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum ServerEvent {
    /// A new member joined the room. Sent to every other member.
    #[serde(rename = "user-connected")]
    UserConnected {
        #[serde(rename = "userId")]
        user_id: PeerId,
        name: String,
    },

    /// A member left (explicitly or by transport drop).
    #[serde(rename = "user-disconnected")]
    UserDisconnected {
        #[serde(rename = "userId")]
        user_id: PeerId,
    },

    /// Chat fanout, sender-inclusive.
    #[serde(rename = "createMessage")]
    CreateMessage { name: String, text: String },
}
