use huddle_client::{CallState, EngineEvent, LocalMedia, RemoteStream};
use huddle_core::{ClientEvent, PeerId};
use tokio::sync::mpsc::error::TryRecvError;

use crate::engine::create_engine;

#[tokio::test]
async fn test_join_before_media_is_buffered_not_dropped() {
    let mut h = create_engine("r1", "Alice", "peer-1");

    h.engine
        .handle_event(EngineEvent::PeerJoined {
            user_id: "peer-2".into(),
            name: "Bob".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        h.engine.state_of(&"peer-2".into()),
        Some(CallState::AwaitingLocalReadiness)
    );
    assert!(h.link.placed_calls().is_empty());

    // one prerequisite is not enough
    h.engine
        .handle_event(EngineEvent::MediaReady(LocalMedia::new()))
        .await
        .unwrap();
    assert!(h.link.placed_calls().is_empty());

    h.engine
        .handle_event(EngineEvent::IdentityAssigned("peer-1".into()))
        .await
        .unwrap();

    let placed = h.link.placed_calls();
    assert_eq!(placed.len(), 1, "buffered join called exactly once");
    assert_eq!(placed[0].peer, "peer-2".into());
    assert_eq!(
        h.engine.state_of(&"peer-2".into()),
        Some(CallState::CallPending)
    );
}

#[tokio::test]
async fn test_join_before_identity_is_buffered_identically() {
    let mut h = create_engine("r1", "Alice", "peer-1");

    h.engine
        .handle_event(EngineEvent::MediaReady(LocalMedia::new()))
        .await
        .unwrap();
    h.engine
        .handle_event(EngineEvent::PeerJoined {
            user_id: "peer-2".into(),
            name: "Bob".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        h.engine.state_of(&"peer-2".into()),
        Some(CallState::AwaitingLocalReadiness)
    );

    h.engine
        .handle_event(EngineEvent::IdentityAssigned("peer-1".into()))
        .await
        .unwrap();
    assert_eq!(h.link.placed_calls().len(), 1);
}

#[tokio::test]
async fn test_announce_waits_for_both_prerequisites() {
    let mut h = create_engine("r1", "Alice", "peer-1");

    // identity first this time
    h.engine
        .handle_event(EngineEvent::IdentityAssigned("peer-1".into()))
        .await
        .unwrap();
    assert!(matches!(h.relay_rx.try_recv(), Err(TryRecvError::Empty)));

    h.engine
        .handle_event(EngineEvent::MediaReady(LocalMedia::new()))
        .await
        .unwrap();
    assert!(matches!(
        h.relay_rx.try_recv().unwrap(),
        ClientEvent::JoinRoom { .. }
    ));
    // and only once
    assert!(matches!(h.relay_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_inbound_call_preempts_buffered_outbound() {
    let mut h = create_engine("r1", "Alice", "peer-1");

    // media ready, identity still pending: joins buffer, inbound can be
    // answered
    h.engine
        .handle_event(EngineEvent::MediaReady(LocalMedia::new()))
        .await
        .unwrap();
    h.engine
        .handle_event(EngineEvent::PeerJoined {
            user_id: "peer-2".into(),
            name: "Bob".into(),
        })
        .await
        .unwrap();

    let call = h.link.incoming("peer-2", Some("Bob"));
    h.engine
        .handle_event(EngineEvent::IncomingCall(call))
        .await
        .unwrap();
    assert_eq!(
        h.engine.state_of(&"peer-2".into()),
        Some(CallState::CallPending)
    );

    // readiness completing must not double-call the already-active peer
    h.engine
        .handle_event(EngineEvent::IdentityAssigned("peer-1".into()))
        .await
        .unwrap();
    assert!(h.link.placed_calls().is_empty());
    assert!(h.link.closed_peers().is_empty());
}

#[tokio::test]
async fn test_inbound_call_supersedes_placed_outbound_silently() {
    let mut h = create_engine("r1", "Alice", "peer-1");
    crate::engine::make_ready(&mut h, "peer-1").await;

    h.engine
        .handle_event(EngineEvent::PeerJoined {
            user_id: "peer-2".into(),
            name: "Bob".into(),
        })
        .await
        .unwrap();
    assert_eq!(h.link.placed_calls().len(), 1);

    // the remote placed its own call concurrently; inbound wins
    let call = h.link.incoming("peer-2", Some("Bob"));
    h.engine
        .handle_event(EngineEvent::IncomingCall(call))
        .await
        .unwrap();

    // the redundant outbound attempt is closed, no error surfaced
    assert_eq!(h.link.closed_peers(), vec![PeerId::from("peer-2")]);
    assert!(h.surface.attached_names().is_empty());

    h.engine
        .handle_event(EngineEvent::StreamReceived {
            from: "peer-2".into(),
            stream: RemoteStream("s".into()),
        })
        .await
        .unwrap();
    assert_eq!(
        h.engine.state_of(&"peer-2".into()),
        Some(CallState::Established)
    );
}

#[tokio::test]
async fn test_stream_from_discarded_call_is_ignored() {
    let mut h = create_engine("r1", "Alice", "peer-1");
    crate::engine::make_ready(&mut h, "peer-1").await;

    h.engine
        .handle_event(EngineEvent::StreamReceived {
            from: "peer-99".into(),
            stream: RemoteStream("stale".into()),
        })
        .await
        .unwrap();

    assert!(h.surface.attached_names().is_empty());
    assert_eq!(h.engine.state_of(&"peer-99".into()), None);
}
