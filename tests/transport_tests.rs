// Copyright (c) 2025 MCP Rust Contributors
// SPDX-License-Identifier: MIT

//! Subprocess transport lifecycle against real processes
//!
//! These tests use small well-known binaries: `cat` echoes frames back,
//! `sleep` exits on its own, and a nonexistent path exercises launch failure.

#![cfg(unix)]

use std::time::Duration;
use serde_json::json;

use mcp_conduit::protocol::types::{JsonRpcMessage, JsonRpcNotification};
use mcp_conduit::transport::{StdioConfig, StdioTransport, Transport, TransportEvent};

async fn next_event(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<TransportEvent>,
) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a transport event")
        .expect("event stream ended unexpectedly")
}

#[tokio::test]
async fn nonexistent_command_is_a_launch_failure() {
    let mut transport =
        StdioTransport::new(StdioConfig::new("/nonexistent/no-such-server-binary"));
    let err = transport.start().await.unwrap_err();
    assert_eq!(err.category(), "launch");
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn frames_round_trip_through_a_cat_echo_server() {
    let mut transport = StdioTransport::new(StdioConfig::new("cat"));
    transport.start().await.unwrap();
    let mut events = transport.events().unwrap();

    let frame = JsonRpcNotification::new(
        "notifications/progress".to_string(),
        Some(json!({"progressToken": 1, "progress": 0.5})),
    )
    .unwrap();
    transport
        .send(serde_json::to_string(&frame).unwrap())
        .await
        .unwrap();

    match next_event(&mut events).await {
        TransportEvent::Message(JsonRpcMessage::Notification(echoed)) => {
            assert_eq!(echoed.method, "notifications/progress");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    transport.close().await.unwrap();
}

#[tokio::test]
async fn unparseable_line_surfaces_as_decode_error_and_reading_continues() {
    let mut transport = StdioTransport::new(StdioConfig::new("cat"));
    transport.start().await.unwrap();
    let mut events = transport.events().unwrap();

    transport.send("this is not json".to_string()).await.unwrap();
    match next_event(&mut events).await {
        TransportEvent::DecodeError { line, .. } => {
            assert_eq!(line, "this is not json");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The read loop survived the bad line
    let frame = JsonRpcNotification::new("notifications/initialized".to_string(), None::<()>)
        .unwrap();
    transport
        .send(serde_json::to_string(&frame).unwrap())
        .await
        .unwrap();
    assert!(matches!(
        next_event(&mut events).await,
        TransportEvent::Message(JsonRpcMessage::Notification(_))
    ));

    transport.close().await.unwrap();
}

#[tokio::test]
async fn child_exit_emits_closed_event() {
    let mut transport =
        StdioTransport::new(StdioConfig::new("sleep").with_args(["0.2"]));
    transport.start().await.unwrap();
    let mut events = transport.events().unwrap();

    assert!(matches!(
        next_event(&mut events).await,
        TransportEvent::Closed
    ));
}

#[tokio::test]
async fn close_is_idempotent() {
    let mut transport = StdioTransport::new(StdioConfig::new("cat"));
    transport.start().await.unwrap();

    transport.close().await.unwrap();
    transport.close().await.unwrap();

    let err = transport.send("{}".to_string()).await.unwrap_err();
    assert_eq!(err.category(), "transport");
}

#[tokio::test]
async fn concurrent_close_calls_are_safe() {
    let mut transport = StdioTransport::new(StdioConfig::new("cat"));
    transport.start().await.unwrap();
    let transport = std::sync::Arc::new(transport);

    let a = {
        let t = std::sync::Arc::clone(&transport);
        tokio::spawn(async move { t.close().await })
    };
    let b = {
        let t = std::sync::Arc::clone(&transport);
        tokio::spawn(async move { t.close().await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
}

#[tokio::test]
async fn child_environment_is_allow_listed() {
    // Ask a shell to print an allow-listed and a non-allow-listed variable
    // SECRET_TOKEN would only reach the child if the parent environment leaked through
    unsafe { std::env::set_var("SECRET_TOKEN", "leaky") };
    let mut transport = StdioTransport::new(StdioConfig::new("sh").with_args([
        "-c",
        // `cat` keeps the child alive until the transport closes stdin, so it
        // cannot lose the race against start()'s immediate-exit check
        r#"printf '{"jsonrpc":"2.0","method":"notifications/message","params":{"level":"info","data":"%s|%s"}}\n' "${PATH:+set}" "${SECRET_TOKEN:-unset}"; cat >/dev/null"#,
    ]));

    transport.start().await.unwrap();
    let mut events = transport.events().unwrap();

    match next_event(&mut events).await {
        TransportEvent::Message(JsonRpcMessage::Notification(n)) => {
            let data = n.params.unwrap()["data"].as_str().unwrap().to_string();
            assert_eq!(data, "set|unset");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    transport.close().await.unwrap();
}
