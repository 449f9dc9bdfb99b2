mod call_table;
mod event;

pub use call_table::*;
pub use event::*;

use crate::error::EngineError;
use crate::link::{CallMetadata, LocalMedia, PeerLink};
use crate::surface::Surface;
use huddle_core::{ClientEvent, PeerId, RoomId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Client-side connection establishment state machine.
///
/// Three prerequisites complete in any order: local media acquisition,
/// identity assignment by the peer-connection library, and join
/// notifications from the relay. Notifications that arrive early are
/// buffered, never dropped, and drained once both local prerequisites
/// are satisfied. No fixed delays anywhere.
pub struct CallEngine {
    room_id: RoomId,
    display_name: String,
    link: Arc<dyn PeerLink>,
    surface: Box<dyn Surface>,
    relay_tx: mpsc::UnboundedSender<ClientEvent>,
    media: Option<LocalMedia>,
    identity: Option<PeerId>,
    announced: bool,
    table: CallTable,
}

impl CallEngine {
    pub fn new(
        room_id: RoomId,
        display_name: String,
        link: Arc<dyn PeerLink>,
        surface: Box<dyn Surface>,
        relay_tx: mpsc::UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            room_id,
            display_name,
            link,
            surface,
            relay_tx,
            media: None,
            identity: None,
            announced: false,
            table: CallTable::default(),
        }
    }

    /// Drive the engine from its event stream. The channel closing means
    /// the session is over (leaving the room / transport close), which
    /// synchronously tears down every call regardless of its state.
    pub async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<EngineEvent>,
    ) -> Result<(), EngineError> {
        let result = async {
            while let Some(event) = rx.recv().await {
                self.handle_event(event).await?;
            }
            Ok(())
        }
        .await;

        self.teardown();
        result
    }

    /// Single dispatch point: every external happening funnels through
    /// here, so the per-remote state machine stays exhaustive.
    pub async fn handle_event(&mut self, event: EngineEvent) -> Result<(), EngineError> {
        match event {
            EngineEvent::MediaReady(media) => {
                info!("Local media acquired");
                self.surface.attach_local(&self.display_name, &media);
                self.media = Some(media);
                self.try_announce();
                self.drain_pending().await;
            }

            EngineEvent::MediaFailed(reason) => {
                self.surface
                    .fatal("Could not access camera/microphone. Check permissions.");
                return Err(EngineError::MediaAcquisition(reason));
            }

            EngineEvent::IdentityAssigned(peer_id) => {
                info!("Peer identity assigned: {}", peer_id);
                self.identity = Some(peer_id);
                self.try_announce();
                self.drain_pending().await;
            }

            EngineEvent::PeerJoined { user_id, name } => {
                if self.ready() {
                    self.place_call(user_id, name).await;
                } else {
                    // media and/or identity still pending: buffer, don't drop
                    debug!("Buffering join of {} until local readiness", user_id);
                    self.table.buffer(user_id, name);
                }
            }

            EngineEvent::PeerLeft { user_id } => {
                self.close_call(&user_id);
            }

            EngineEvent::IncomingCall(call) => {
                let peer = call.peer().clone();
                let name = call.caller_name().unwrap_or("Guest").to_string();

                let Some(media) = &self.media else {
                    // inbound before our own announce: the remote cannot
                    // know us yet, so this call is not for this session
                    warn!("Rejecting inbound call from {}: no local media", peer);
                    call.reject();
                    return Ok(());
                };

                debug!("Answering inbound call from {} ({})", peer, name);
                let handle = call.answer(media);

                // inbound wins de-duplication: a superseded outbound
                // attempt for the same peer is closed silently
                if let Some(previous) = self.table.activate(peer, name, handle) {
                    previous.close();
                }
            }

            EngineEvent::StreamReceived { from, stream } => {
                match self.table.establish(&from) {
                    Some(name) => {
                        info!("Call established with {} ({})", from, name);
                        self.surface.attach(&from, &name, stream);
                    }
                    // stream from a call we already discarded as redundant
                    None => debug!("Ignoring stream from unknown call {}", from),
                }
            }

            EngineEvent::CallClosed { peer } => {
                self.close_call(&peer);
            }

            EngineEvent::CallErrored { peer, reason } => {
                // local to this one peer relationship; the room and every
                // other call are unaffected
                warn!("Call with {} failed: {}", peer, reason);
                self.close_call(&peer);
            }

            EngineEvent::ChatReceived { name, text } => {
                self.surface.chat_line(&name, &text);
            }
        }
        Ok(())
    }

    /// Send a chat message to the room. The rendered line comes back via
    /// the relay's sender-inclusive fanout, not from here.
    pub fn send_chat(&self, text: String) {
        if self.relay_tx.send(ClientEvent::Message(text)).is_err() {
            warn!("Relay channel closed, chat dropped");
        }
    }

    /// Current state of the connection to one remote, if any.
    pub fn state_of(&self, peer: &PeerId) -> Option<CallState> {
        self.table.state_of(peer)
    }

    /// Close every call and clear every tile, regardless of call state.
    pub fn teardown(&mut self) {
        for (peer, entry) in self.table.drain() {
            if let Some(handle) = entry.handle {
                handle.close();
            }
            self.surface.detach(&peer);
        }
    }

    fn ready(&self) -> bool {
        self.media.is_some() && self.identity.is_some()
    }

    /// Announce to the relay once both media and identity are in hand.
    fn try_announce(&mut self) {
        if self.announced || !self.ready() {
            return;
        }
        let Some(identity) = &self.identity else {
            return;
        };

        let join = ClientEvent::JoinRoom {
            room_id: self.room_id.clone(),
            peer_id: identity.clone(),
            name: self.display_name.clone(),
        };
        if self.relay_tx.send(join).is_err() {
            warn!("Relay channel closed, join-room not sent");
            return;
        }
        self.announced = true;
    }

    /// Call every buffered remote, now that both prerequisites hold.
    async fn drain_pending(&mut self) {
        if !self.ready() {
            return;
        }
        for (peer, name) in self.table.take_buffered() {
            self.place_call(peer, name).await;
        }
    }

    async fn place_call(&mut self, peer: PeerId, name: String) {
        // the remote side may have called us first; its inbound call
        // already owns this slot
        if self.table.has_active(&peer) {
            debug!("Skipping outbound call to {}: already active", peer);
            return;
        }

        // both prerequisites are checked by every caller of this fn
        let Some(media) = &self.media else {
            return;
        };

        let metadata = CallMetadata {
            user_name: self.display_name.clone(),
        };
        match self.link.call(&peer, media, metadata).await {
            Ok(handle) => {
                debug!("Outbound call placed to {} ({})", peer, name);
                if let Some(previous) = self.table.activate(peer, name, handle) {
                    previous.close();
                }
            }
            Err(e) => {
                warn!("Outbound call to {} failed: {}", peer, e);
                self.table.remove(&peer);
            }
        }
    }

    fn close_call(&mut self, peer: &PeerId) {
        let Some(entry) = self.table.remove(peer) else {
            return;
        };
        debug!("Closing call with {}", peer);
        if let Some(handle) = entry.handle {
            handle.close();
        }
        self.surface.detach(peer);
    }
}
