//! Gateway session integration tests
//!
//! Each test drives a real session task through a scripted transport with
//! paused time, so heartbeat timing is exact.

use std::time::Duration;

use chat_common::ClientConfig;
use chat_core::Snowflake;
use chat_gateway::protocol::{GatewayFrame, OpCode};
use chat_gateway::transport::CloseReason;
use chat_gateway::{Event, EventKind, SessionPhase};
use integration_tests::*;
use serde_json::Value;

const PERIOD: Duration = Duration::from_millis(HEARTBEAT_INTERVAL_MS);

fn heartbeat_sequences(transport: &MockTransport) -> Vec<Value> {
    transport
        .sent_with_op(OpCode::Heartbeat)
        .into_iter()
        .map(|frame| frame.d)
        .collect()
}

// =============================================================================
// Handshake
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_ready_handshake() {
    let session = TestSession::start();
    let ready_events = EventRecorder::new();
    session.client.register(EventKind::Ready, ready_events.handler());

    session.client.connect().await.unwrap();
    settle().await;
    assert_eq!(session.transport.open_count(), 1);
    assert_eq!(
        session.transport.opened_urls()[0],
        "wss://gateway.discord.gg/?v=8&encoding=json"
    );
    assert_eq!(session.client.state(), SessionPhase::Connecting);

    session.inject(&hello()).await;
    assert!(session.transport.sent().is_empty(), "nothing is sent before login");

    session.client.login("tok").await.unwrap();
    settle().await;

    let identify = session.transport.sent_with_op(OpCode::Identify);
    assert_eq!(identify.len(), 1);
    assert_eq!(identify[0].d["token"], "tok");
    assert_eq!(identify[0].d["intents"], 4609);
    assert!(identify[0].d["properties"]["$os"].is_string());
    assert!(identify[0].d["properties"]["$browser"].is_string());
    assert!(identify[0].d["properties"]["$device"].is_string());
    assert_eq!(session.client.state(), SessionPhase::AwaitingIdentifyAck);

    session.inject(&ready(1, "100", "bot")).await;

    let user = session.client.current_user().expect("user stored on READY");
    assert_eq!(user.id, Snowflake::new(100));
    assert_eq!(user.username, "bot");
    assert_eq!(session.client.state(), SessionPhase::Ready);
    assert_eq!(ready_events.count(), 1);
    assert!(matches!(ready_events.last(), Some(Event::Ready(_))));

    // The heartbeat was armed by Hello and carries the last sequence
    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::from(1)]);
}

#[tokio::test(start_paused = true)]
async fn test_identify_waits_for_hello() {
    let session = TestSession::start();

    session.client.login("tok").await.unwrap();
    settle().await;
    assert_eq!(session.transport.open_count(), 1);
    assert!(
        session.transport.sent_with_op(OpCode::Identify).is_empty(),
        "identify must not precede hello"
    );

    session.inject(&hello()).await;
    assert_eq!(session.transport.sent_with_op(OpCode::Identify).len(), 1);

    // A second login is a no-op
    session.client.login("tok").await.unwrap();
    settle().await;
    assert_eq!(session.transport.sent_with_op(OpCode::Identify).len(), 1);
    assert_eq!(session.transport.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_hello_is_dropped() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, messages.handler());

    session.client.login("tok").await.unwrap();
    settle().await;
    session.inject(&GatewayFrame::hello(0)).await;

    assert!(session.transport.sent_with_op(OpCode::Identify).is_empty());
    assert_eq!(session.client.state(), SessionPhase::Connecting);

    // The session keeps running and processing frames
    session.inject(&message_create(1, "10", "still here")).await;
    assert_eq!(messages.count(), 1);

    session.inject(&hello()).await;
    assert_eq!(session.transport.sent_with_op(OpCode::Identify).len(), 1);
    assert_eq!(session.client.state(), SessionPhase::AwaitingIdentifyAck);

    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::from(1)]);
    assert_eq!(session.transport.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_login_rejects_empty_token() {
    let session = TestSession::start();
    assert!(session.client.login("").await.is_err());
    settle().await;
    assert_eq!(session.transport.open_count(), 0);
}

// =============================================================================
// Sequence tracking
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_heartbeat_carries_highest_sequence() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    for sequence in [1, 2, 5, 3, 4] {
        session.inject(&message_create(sequence, "10", "hello")).await;
    }

    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::from(5)]);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_before_any_dispatch_is_null() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::Null]);
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_dispatch_still_advances_sequence() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    // MESSAGE_CREATE without an author cannot be decoded
    let broken = GatewayFrame::dispatch("MESSAGE_CREATE", 7, serde_json::json!({ "id": "1" }));
    session.inject(&broken).await;

    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::from(7)]);
}

// =============================================================================
// Unknown and malformed input
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_unknown_opcode_changes_nothing() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, messages.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    session.inject(&guild_create(3, "500", "501")).await;

    let phase = session.client.state();
    let sent_before = session.transport.sent().len();

    session.inject(&unknown_op(42, 99)).await;
    session.inject(&unknown_op(7, 100)).await;
    session.inject(&unknown_op(9, 101)).await;

    assert_eq!(session.client.state(), phase);
    assert_eq!(session.client.guilds().len(), 1);
    assert_eq!(session.transport.sent().len(), sent_before);
    assert_eq!(session.transport.open_count(), 1);
    assert_eq!(messages.count(), 0);

    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::from(3)]);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_frames_are_dropped() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, messages.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    assert!(session.transport.inject_text("not json"));
    assert!(session.transport.inject_text(r#"{"d": {}}"#));
    settle().await;
    assert_eq!(session.transport.open_count(), 1);

    session.inject(&message_create(1, "10", "still alive")).await;
    assert_eq!(messages.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_event_reaches_unknown_handler() {
    let session = TestSession::start();
    let unknown = EventRecorder::new();
    session.client.register(EventKind::Unknown, unknown.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    let frame = GatewayFrame::dispatch("PRESENCE_UPDATE", 1, serde_json::json!({ "status": "idle" }));
    session.inject(&frame).await;

    match unknown.last() {
        Some(Event::Unknown { name, data }) => {
            assert_eq!(name, "PRESENCE_UPDATE");
            assert_eq!(data["status"], "idle");
        }
        other => panic!("expected unknown event, got {other:?}"),
    }
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_last_registered_handler_wins() {
    let session = TestSession::start();
    let first = EventRecorder::new();
    let second = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, first.handler());
    session.client.register(EventKind::MessageCreate, second.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    session.inject(&message_create(1, "10", "hi")).await;

    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
    let Some(Event::MessageCreate(message)) = second.last() else {
        panic!("expected a message");
    };
    assert_eq!(message.content, "hi");
    assert_eq!(message.channel_id, Snowflake::new(10));
}

#[tokio::test(start_paused = true)]
async fn test_handlers_run_in_frame_order() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, messages.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    for (sequence, content) in [(1, "one"), (2, "two"), (3, "three")] {
        assert!(session.transport.inject(&message_create(sequence, "10", content)));
    }
    settle().await;

    let contents: Vec<String> = messages
        .events()
        .into_iter()
        .filter_map(|event| event.as_message().map(|m| m.content.clone()))
        .collect();
    assert_eq!(contents, ["one", "two", "three"]);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_handler_does_not_stop_session() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::Ready, |_, _| panic!("handler bug"));
    session.client.register(EventKind::MessageCreate, messages.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    session.inject(&ready(1, "100", "bot")).await;
    session.inject(&message_create(2, "10", "after panic")).await;

    assert_eq!(messages.count(), 1);
    assert_eq!(session.client.state(), SessionPhase::Ready);
}

// =============================================================================
// Guild registry
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_guild_registry_follows_events() {
    let session = TestSession::start();
    let deleted = EventRecorder::new();
    session.client.register(EventKind::GuildDelete, deleted.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    let guild_id = next_id();
    let general = next_id();
    let extra = next_id();
    let gid = Snowflake::new(guild_id.parse().unwrap());

    session.inject(&guild_create(1, &guild_id, &general)).await;
    let guild = session.client.guild(gid).expect("guild cached");
    assert_eq!(guild.name, "Test Guild");
    assert_eq!(guild.channels.len(), 1);

    session.inject(&channel_create(2, &guild_id, &extra, "extra")).await;
    assert_eq!(session.client.guild(gid).unwrap().channels.len(), 2);

    session.inject(&channel_delete(3, &guild_id, &general)).await;
    let guild = session.client.guild(gid).unwrap();
    assert_eq!(guild.channels.len(), 1);
    assert!(guild.channel(Snowflake::new(extra.parse().unwrap())).is_some());

    session.inject(&guild_delete(4, &guild_id)).await;
    assert!(session.client.guild(gid).is_none());

    let Some(Event::GuildDelete { guild, .. }) = deleted.last() else {
        panic!("expected guild delete");
    };
    assert_eq!(guild.name, "Test Guild", "handler sees the guild as it was cached");
    assert_eq!(guild.channels.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delete_of_unknown_guild_yields_stub() {
    let session = TestSession::start();
    let deleted = EventRecorder::new();
    session.client.register(EventKind::GuildDelete, deleted.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    session.inject(&guild_delete(1, "777")).await;

    let Some(Event::GuildDelete { guild, .. }) = deleted.last() else {
        panic!("expected guild delete");
    };
    assert_eq!(guild.id, Snowflake::new(777));
    assert!(guild.name.is_empty());
}

// =============================================================================
// Liveness and reconnection
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_missed_ack_reconnects_exactly_once() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    session.inject(&heartbeat_ack()).await;

    // First tick: previous beat acknowledged, send one
    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport).len(), 1);
    assert_eq!(session.transport.open_count(), 1);

    // Second tick: no ack arrived
    advance(PERIOD).await;
    assert_eq!(session.transport.open_count(), 2);
    assert_eq!(session.transport.close_count(), 1);
    assert!(session.transport.is_connected());

    // The new connection has no Hello yet, so no further beats or reconnects
    advance(PERIOD * 3).await;
    assert_eq!(session.transport.open_count(), 2);
    assert_eq!(heartbeat_sequences(&session.transport).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_acked_heartbeats_keep_connection() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    for _ in 0..5 {
        advance(PERIOD).await;
        session.inject(&heartbeat_ack()).await;
    }

    assert_eq!(heartbeat_sequences(&session.transport).len(), 5);
    assert_eq!(session.transport.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remote_close_reconnects_and_reidentifies() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    session.inject(&ready(5, "100", "bot")).await;

    assert!(session
        .transport
        .inject_close(Some(CloseReason::new(4000, "unknown error"))));
    settle().await;

    assert_eq!(session.transport.open_count(), 2);
    assert_eq!(session.client.state(), SessionPhase::Connecting);

    session.transport.clear_sent();
    session.inject(&hello()).await;

    let identify = session.transport.sent_with_op(OpCode::Identify);
    assert_eq!(identify.len(), 1);
    assert_eq!(identify[0].d["token"], "tok");

    // Sequence starts over on the new connection
    advance(PERIOD).await;
    assert_eq!(heartbeat_sequences(&session.transport), vec![Value::Null]);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_reconnects_and_reidentifies() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    session.inject(&ready(3, "100", "bot")).await;

    assert!(session.transport.inject_error("connection reset by peer"));
    settle().await;

    assert_eq!(session.transport.open_count(), 2);
    assert!(session.transport.is_connected());
    assert_eq!(session.client.state(), SessionPhase::Connecting);

    session.transport.clear_sent();
    session.inject(&hello()).await;

    let identify = session.transport.sent_with_op(OpCode::Identify);
    assert_eq!(identify.len(), 1);
    assert_eq!(identify[0].d["token"], "tok");
    assert_eq!(session.client.state(), SessionPhase::AwaitingIdentifyAck);
}

#[tokio::test(start_paused = true)]
async fn test_cache_survives_reconnect() {
    let session = TestSession::start();
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    session.inject(&ready(1, "100", "bot")).await;
    session.inject(&guild_create(2, "500", "501")).await;

    assert!(session.transport.inject_close(None));
    settle().await;

    assert_eq!(session.transport.open_count(), 2);
    assert!(session.client.current_user().is_some());
    assert_eq!(session.client.guilds().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_events_from_discarded_connection_are_ignored() {
    let session = TestSession::start();
    let ready_events = EventRecorder::new();
    session.client.register(EventKind::Ready, ready_events.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;

    let old_sink = session.transport.sink_at(0).expect("first connection");
    assert!(session.transport.inject_close(None));
    settle().await;
    assert_eq!(session.transport.open_count(), 2);

    let late = ready(9, "100", "bot").encode().unwrap();
    assert!(old_sink.frame(late));
    assert!(old_sink.closed(None));
    settle().await;

    assert_eq!(ready_events.count(), 0);
    assert!(session.client.current_user().is_none());
    assert_eq!(session.transport.open_count(), 2, "stale close must not reconnect");
}

#[tokio::test(start_paused = true)]
async fn test_failed_open_retries_after_delay() {
    let mut config = ClientConfig::default().with_debug(true);
    config.gateway.reconnect_delay_ms = 1_000;
    let session = TestSession::start_with_config(config);
    session.transport.fail_next_opens(1);

    session.client.login("tok").await.unwrap();
    settle().await;
    assert_eq!(session.transport.open_count(), 1);
    assert!(!session.transport.is_connected());
    assert_eq!(session.client.state(), SessionPhase::Reconnecting);

    advance(Duration::from_millis(999)).await;
    assert_eq!(session.transport.open_count(), 1);

    advance(Duration::from_millis(1)).await;
    assert_eq!(session.transport.open_count(), 2);
    assert!(session.transport.is_connected());
    assert_eq!(session.client.state(), SessionPhase::Connecting);

    session.inject(&hello()).await;
    assert_eq!(session.transport.sent_with_op(OpCode::Identify).len(), 1);
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_close_stops_session() {
    let session = TestSession::start();
    let messages = EventRecorder::new();
    session.client.register(EventKind::MessageCreate, messages.handler());
    session.handshake("tok", HEARTBEAT_INTERVAL_MS).await;
    let sink = session.transport.current_sink().expect("connected");

    session.client.close().await.unwrap();
    settle().await;

    assert_eq!(session.client.state(), SessionPhase::Closed);
    assert!(!session.transport.is_connected());
    assert_eq!(session.transport.close_count(), 1);

    // Nothing is processed or sent after close
    let _ = sink.frame(message_create(1, "10", "late").encode().unwrap());
    advance(PERIOD * 2).await;
    assert_eq!(messages.count(), 0);
    assert!(heartbeat_sequences(&session.transport).is_empty());
    assert_eq!(session.transport.open_count(), 1);

    // Closing twice is fine
    session.client.close().await.unwrap();
}
