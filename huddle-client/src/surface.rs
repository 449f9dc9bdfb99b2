use crate::link::{LocalMedia, RemoteStream};
use huddle_core::PeerId;

/// Rendering seam. The UI layer implements this; the engine only attaches
/// and detaches tiles and forwards chat lines, so every client renders
/// from the same event stream.
pub trait Surface: Send {
    /// Show the self tile once local media is live.
    fn attach_local(&mut self, name: &str, media: &LocalMedia);

    /// Show a remote tile, tagged with the remote identity and name.
    fn attach(&mut self, peer: &PeerId, name: &str, stream: RemoteStream);

    /// Remove the tile for a departed or failed remote.
    fn detach(&mut self, peer: &PeerId);

    /// Render one chat line (the sender's own lines arrive here too).
    fn chat_line(&mut self, name: &str, text: &str);

    /// Surface a terminal session failure to the user.
    fn fatal(&mut self, message: &str);
}
