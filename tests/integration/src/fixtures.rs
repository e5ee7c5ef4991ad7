//! Test fixtures for integration tests
//!
//! Builders for the server frames a session receives. Payloads carry only the
//! fields the client reads.

use std::sync::atomic::{AtomicU64, Ordering};

use chat_gateway::protocol::{GatewayFrame, OpCode};
use serde_json::{json, Value};

static ID_COUNTER: AtomicU64 = AtomicU64::new(1_000);

/// Generate a snowflake string unique within the test binary
pub fn next_id() -> String {
    ID_COUNTER.fetch_add(1, Ordering::SeqCst).to_string()
}

/// Default heartbeat interval the fixtures announce, in milliseconds
pub const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

pub fn hello() -> GatewayFrame {
    GatewayFrame::hello(HEARTBEAT_INTERVAL_MS)
}

pub fn heartbeat_ack() -> GatewayFrame {
    GatewayFrame::heartbeat_ack()
}

pub fn user_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "discriminator": "0001",
        "avatar": null,
        "bot": true
    })
}

/// READY for the given user
pub fn ready(sequence: u64, user_id: &str, username: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "READY",
        sequence,
        json!({
            "v": 8,
            "user": user_json(user_id, username),
            "guilds": [],
            "session_id": "session-1"
        }),
    )
}

/// GUILD_CREATE with one text channel
pub fn guild_create(sequence: u64, guild_id: &str, channel_id: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "GUILD_CREATE",
        sequence,
        json!({
            "id": guild_id,
            "name": "Test Guild",
            "owner_id": "1",
            "roles": [],
            "channels": [
                { "id": channel_id, "name": "general", "type": 0, "position": 0 }
            ]
        }),
    )
}

pub fn guild_delete(sequence: u64, guild_id: &str) -> GatewayFrame {
    GatewayFrame::dispatch("GUILD_DELETE", sequence, json!({ "id": guild_id }))
}

pub fn channel_create(sequence: u64, guild_id: &str, channel_id: &str, name: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "CHANNEL_CREATE",
        sequence,
        json!({ "id": channel_id, "guild_id": guild_id, "name": name, "type": 0 }),
    )
}

pub fn channel_delete(sequence: u64, guild_id: &str, channel_id: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "CHANNEL_DELETE",
        sequence,
        json!({ "id": channel_id, "guild_id": guild_id, "type": 0 }),
    )
}

/// MESSAGE_CREATE from a human author
pub fn message_create(sequence: u64, channel_id: &str, content: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "MESSAGE_CREATE",
        sequence,
        json!({
            "id": next_id(),
            "channel_id": channel_id,
            "author": { "id": "42", "username": "someone", "discriminator": "4242" },
            "content": content,
            "tts": false,
            "type": 0
        }),
    )
}

/// A frame with an op code the client does not handle
pub fn unknown_op(op: u8, sequence: u64) -> GatewayFrame {
    let mut frame = GatewayFrame::new(OpCode::from_u8(op), json!({ "anything": true }));
    frame.s = Some(sequence);
    frame.t = Some("SOMETHING".to_string());
    frame
}
