use huddle_core::ServerEvent;

use crate::integration::{create_test_relay, init_tracing, join};

#[tokio::test]
async fn test_chat_reaches_every_member_including_sender() {
    init_tracing();
    let (relay, sink) = create_test_relay();

    let a = join(&relay, "r1", "peer-a", "Alice").await;
    let b = join(&relay, "r1", "peer-b", "Bob").await;

    relay.handle_message(&a, "hello".into()).await;

    let expected = ServerEvent::CreateMessage {
        name: "Alice".into(),
        text: "hello".into(),
    };
    for conn in [&a, &b] {
        let chats: Vec<_> = sink
            .events_for(conn)
            .await
            .into_iter()
            .filter(|e| matches!(e, ServerEvent::CreateMessage { .. }))
            .collect();
        assert_eq!(chats, vec![expected.clone()]);
    }
}

#[tokio::test]
async fn test_messages_from_one_sender_keep_their_order() {
    init_tracing();
    let (relay, sink) = create_test_relay();

    let a = join(&relay, "r1", "peer-a", "Alice").await;
    let b = join(&relay, "r1", "peer-b", "Bob").await;

    for text in ["one", "two", "three"] {
        relay.handle_message(&a, text.into()).await;
    }

    for conn in [&a, &b] {
        let texts: Vec<_> = sink
            .events_for(conn)
            .await
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::CreateMessage { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }
}

#[tokio::test]
async fn test_chat_is_tagged_with_sender_name() {
    init_tracing();
    let (relay, sink) = create_test_relay();

    let a = join(&relay, "r1", "peer-a", "Alice").await;
    let b = join(&relay, "r1", "peer-b", "Bob").await;

    relay.handle_message(&b, "hi".into()).await;

    let events = sink.events_for(&a).await;
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::CreateMessage { name, text } if name == "Bob" && text == "hi"
    )));
}
