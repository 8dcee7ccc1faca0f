// Copyright (c) 2025 MCP Rust Contributors
// SPDX-License-Identifier: MIT

//! Wire-format behavior of the protocol model

use pretty_assertions::assert_eq;
use serde_json::json;

use mcp_conduit::prelude::*;

#[test]
fn content_variants_decode_by_type_tag() {
    let text: Content =
        serde_json::from_value(json!({"type": "text", "text": "hello"})).unwrap();
    assert_eq!(text, Content::text("hello"));

    let image: Content = serde_json::from_value(
        json!({"type": "image", "data": "aGk=", "mimeType": "image/png"}),
    )
    .unwrap();
    assert_eq!(image, Content::image("aGk=", "image/png"));

    let resource: Content = serde_json::from_value(json!({
        "type": "resource",
        "resource": {"uri": "file:///notes.txt", "text": "remember the milk"}
    }))
    .unwrap();
    match resource {
        Content::Resource { resource, .. } => {
            assert_eq!(resource.uri(), "file:///notes.txt");
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn unknown_content_type_fails_decode() {
    let err = serde_json::from_value::<Content>(
        json!({"type": "video", "data": "...", "mimeType": "video/mp4"}),
    )
    .unwrap_err();
    assert!(err.to_string().contains("video"));
}

#[test]
fn read_resource_result_mixes_text_and_blob_parts() {
    let result: ReadResourceResult = serde_json::from_value(json!({
        "contents": [
            {"uri": "file:///a.txt", "mimeType": "text/plain", "text": "alpha"},
            {"uri": "file:///b.bin", "mimeType": "application/octet-stream", "blob": "Yg=="}
        ]
    }))
    .unwrap();
    assert_eq!(result.contents.len(), 2);
    assert!(matches!(result.contents[0], ResourceContents::Text { .. }));
    assert!(matches!(result.contents[1], ResourceContents::Blob { .. }));
}

#[test]
fn ambiguous_resource_contents_fail_the_whole_result() {
    let err = serde_json::from_value::<ReadResourceResult>(json!({
        "contents": [
            {"uri": "file:///a", "text": "x", "blob": "eA=="}
        ]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("both"));
}

#[test]
fn get_prompt_result_carries_typed_messages() {
    let result: GetPromptResult = serde_json::from_value(json!({
        "description": "greeting",
        "messages": [
            {"role": "user", "content": {"type": "text", "text": "say hi to Sam"}},
            {"role": "assistant", "content": {"type": "text", "text": "Hi Sam!"}}
        ]
    }))
    .unwrap();
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].role, Role::User);
    assert_eq!(result.messages[1].role, Role::Assistant);
}

#[test]
fn create_message_result_round_trip() {
    let result: CreateMessageResult = serde_json::from_value(json!({
        "role": "assistant",
        "content": {"type": "text", "text": "the answer is 42"},
        "model": "some-model-20250618",
        "stopReason": "endTurn"
    }))
    .unwrap();
    assert_eq!(result.model, "some-model-20250618");
    assert_eq!(result.stop_reason.as_deref(), Some("endTurn"));

    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["content"]["type"], json!("text"));
}

#[test]
fn sampling_content_rejects_embedded_resources() {
    let err = serde_json::from_value::<SamplingContent>(json!({
        "type": "resource",
        "resource": {"uri": "file:///x", "text": "y"}
    }))
    .unwrap_err();
    assert!(err.to_string().contains("resource"));
}

#[test]
fn cancelled_params_use_camel_case_request_id() {
    let params = CancelledParams {
        request_id: json!(9),
        reason: Some("deadline passed".to_string()),
    };
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(
        value,
        json!({"requestId": 9, "reason": "deadline passed"})
    );

    let no_reason: CancelledParams =
        serde_json::from_value(json!({"requestId": "abc"})).unwrap();
    assert_eq!(no_reason.reason, None);
    assert_eq!(
        serde_json::to_value(&no_reason).unwrap(),
        json!({"requestId": "abc"})
    );
}

#[test]
fn completion_result_round_trip() {
    let result: CompleteResult = serde_json::from_value(json!({
        "completion": {"values": ["alpha", "beta"], "total": 10, "hasMore": true}
    }))
    .unwrap();
    assert_eq!(result.completion.values, vec!["alpha", "beta"]);
    assert_eq!(result.completion.total, Some(10));
    assert_eq!(result.completion.has_more, Some(true));
}

#[test]
fn empty_result_is_an_empty_object() {
    assert_eq!(
        serde_json::to_value(EmptyResult::default()).unwrap(),
        json!({})
    );
    let _: EmptyResult = serde_json::from_value(json!({})).unwrap();
}

#[test]
fn roots_and_templates_decode() {
    let roots: ListRootsResult = serde_json::from_value(json!({
        "roots": [{"uri": "file:///home/dev/project", "name": "project"}]
    }))
    .unwrap();
    assert_eq!(roots.roots[0].name.as_deref(), Some("project"));

    let templates: ListResourceTemplatesResult = serde_json::from_value(json!({
        "resourceTemplates": [
            {"uriTemplate": "file:///{path}", "name": "files"}
        ],
        "nextCursor": "page-2"
    }))
    .unwrap();
    assert_eq!(templates.resource_templates[0].uri_template, "file:///{path}");
    assert_eq!(templates.next_cursor.as_deref(), Some("page-2"));
}

#[test]
fn request_round_trips_through_message_union() {
    let request = JsonRpcRequest::new(
        json!(3),
        "resources/read".to_string(),
        Some(json!({"uri": "file:///a"})),
    )
    .unwrap();
    let frame = serde_json::to_string(&request).unwrap();

    let message: JsonRpcMessage = serde_json::from_str(&frame).unwrap();
    match message {
        JsonRpcMessage::Request(decoded) => assert_eq!(decoded, request),
        other => panic!("unexpected variant: {other:?}"),
    }
}
