use crate::link::{IncomingCall, LocalMedia, RemoteStream};
use huddle_core::PeerId;
use std::fmt;

/// Everything that can happen to a client session, as one closed set of
/// variants consumed by [`CallEngine::handle_event`](super::CallEngine).
/// Relay notifications, peer-link callbacks, and media acquisition all
/// funnel into this stream; their relative order is not guaranteed.
pub enum EngineEvent {
    /// Local capture started.
    MediaReady(LocalMedia),
    /// Permission denied or device unavailable. Terminal.
    MediaFailed(String),
    /// The peer-connection library assigned our identity.
    IdentityAssigned(PeerId),
    /// Relay: a new member joined our room.
    PeerJoined { user_id: PeerId, name: String },
    /// Relay: a member left (explicitly or by transport drop).
    PeerLeft { user_id: PeerId },
    /// The library delivered an unanswered inbound call.
    IncomingCall(Box<dyn IncomingCall>),
    /// A call produced its remote stream.
    StreamReceived { from: PeerId, stream: RemoteStream },
    /// A call's transport closed.
    CallClosed { peer: PeerId },
    /// The library reported an error on one call.
    CallErrored { peer: PeerId, reason: String },
    /// Chat fanout from the relay (our own messages included).
    ChatReceived { name: String, text: String },
}

impl fmt::Debug for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MediaReady(_) => write!(f, "MediaReady"),
            Self::MediaFailed(reason) => write!(f, "MediaFailed({reason})"),
            Self::IdentityAssigned(id) => write!(f, "IdentityAssigned({id})"),
            Self::PeerJoined { user_id, name } => write!(f, "PeerJoined({user_id}, {name})"),
            Self::PeerLeft { user_id } => write!(f, "PeerLeft({user_id})"),
            Self::IncomingCall(call) => write!(f, "IncomingCall({})", call.peer()),
            Self::StreamReceived { from, .. } => write!(f, "StreamReceived({from})"),
            Self::CallClosed { peer } => write!(f, "CallClosed({peer})"),
            Self::CallErrored { peer, reason } => write!(f, "CallErrored({peer}, {reason})"),
            Self::ChatReceived { name, .. } => write!(f, "ChatReceived({name})"),
        }
    }
}
