use crate::error::LinkError;
use async_trait::async_trait;
use huddle_core::PeerId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Metadata carried on an outbound call. `userName` is the key the remote
/// side reads the caller's display name from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallMetadata {
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// The local capture stream. Shared read-only by every outbound and
/// inbound call on this client; toggling a track is a single mutation
/// observed by all active calls at once, never a per-call copy.
#[derive(Debug, Clone)]
pub struct LocalMedia {
    tracks: Arc<MediaTracks>,
}

#[derive(Debug)]
struct MediaTracks {
    audio_enabled: AtomicBool,
    video_enabled: AtomicBool,
}

impl LocalMedia {
    pub fn new() -> Self {
        Self {
            tracks: Arc::new(MediaTracks {
                audio_enabled: AtomicBool::new(true),
                video_enabled: AtomicBool::new(true),
            }),
        }
    }

    pub fn audio_enabled(&self) -> bool {
        self.tracks.audio_enabled.load(Ordering::Relaxed)
    }

    pub fn video_enabled(&self) -> bool {
        self.tracks.video_enabled.load(Ordering::Relaxed)
    }

    /// Flip the microphone track; returns the new state.
    pub fn toggle_audio(&self) -> bool {
        !self.tracks.audio_enabled.fetch_not(Ordering::Relaxed)
    }

    /// Flip the camera track; returns the new state.
    pub fn toggle_video(&self) -> bool {
        !self.tracks.video_enabled.fetch_not(Ordering::Relaxed)
    }
}

impl Default for LocalMedia {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to a remote media stream delivered by the external
/// library; the engine only routes it to a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream(pub String);

/// One active direct media connection. Owned by the engine's call table;
/// outcomes (`stream`, `close`, `error`) arrive as engine events.
pub trait CallHandle: Send {
    fn peer(&self) -> &PeerId;

    /// Tear the call down. Closing an already-closed call is a no-op.
    fn close(&self);
}

/// An inbound call that has not been answered yet.
pub trait IncomingCall: Send {
    fn peer(&self) -> &PeerId;

    /// Display name from the caller's metadata, if it carried one.
    fn caller_name(&self) -> Option<&str>;

    /// Answer with the local media stream, activating the call.
    fn answer(self: Box<Self>, media: &LocalMedia) -> Box<dyn CallHandle>;

    /// Decline without answering.
    fn reject(self: Box<Self>);
}

/// Boundary to the external peer-connection library. The library owns
/// identity assignment and the whole offer/answer/ICE exchange; this
/// crate only addresses peers through it.
#[async_trait]
pub trait PeerLink: Send + Sync {
    /// Resolve the identity the library assigned to this client.
    /// Emits once per session.
    async fn open(&self) -> Result<PeerId, LinkError>;

    /// Start an outbound call to `peer`, offering the local stream.
    async fn call(
        &self,
        peer: &PeerId,
        media: &LocalMedia,
        metadata: CallMetadata,
    ) -> Result<Box<dyn CallHandle>, LinkError>;
}
