mod test_readiness_races;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

use huddle_client::{CallEngine, EngineEvent, LocalMedia};
use huddle_core::ClientEvent;

use crate::utils::{MockLink, MockSurface};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub engine: CallEngine,
    pub link: Arc<MockLink>,
    pub surface: MockSurface,
    pub relay_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

pub fn create_engine(room: &str, name: &str, identity: &str) -> Harness {
    init_tracing();

    let link = Arc::new(MockLink::new(identity));
    let surface = MockSurface::new();
    let (relay_tx, relay_rx) = mpsc::unbounded_channel();

    let engine = CallEngine::new(
        room.into(),
        name.to_string(),
        link.clone(),
        Box::new(surface.clone()),
        relay_tx,
    );

    Harness {
        engine,
        link,
        surface,
        relay_rx,
    }
}

/// Complete both local prerequisites: media first, then identity, the
/// common order in practice (tests of the opposite order feed events
/// themselves).
pub async fn make_ready(h: &mut Harness, identity: &str) {
    h.engine
        .handle_event(EngineEvent::MediaReady(LocalMedia::new()))
        .await
        .unwrap();
    h.engine
        .handle_event(EngineEvent::IdentityAssigned(identity.into()))
        .await
        .unwrap();
}
