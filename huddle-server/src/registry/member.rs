use huddle_core::{ConnId, PeerId};

/// One connection's participation record within a room. The registry owns
/// this record for the lifetime of the connection; the peer identity is a
/// cross-reference into the peer-connection library's namespace, used only
/// for addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub conn: ConnId,
    pub peer_id: PeerId,
    pub name: String,
}
