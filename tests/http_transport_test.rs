//! HTTP transport integration tests
//!
//! Runs `HttpTransport` against a wiremock server speaking the provider's
//! SSE dialect. Use `set_body_raw(bytes, "text/event-stream")` for SSE
//! responses so the Content-Type is exactly text/event-stream; wiremock's
//! JSON helpers would set application/json and hide framing mistakes.

use std::sync::Arc;

use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fitsage::session::{ChatSession, SessionStatus, UserInput};
use fitsage::transport::http::HttpTransport;
use fitsage::transport::{DeltaEvent, Transport};
use fitsage::TurnOutcome;

// ---- Helpers ----

fn make_transport(base_url: &str, api_key: Option<&str>) -> HttpTransport {
    HttpTransport::new(
        url::Url::parse(base_url).unwrap(),
        "gemini-2.5-flash",
        api_key.map(str::to_string),
        Some("be brief".to_string()),
        500,
    )
    .unwrap()
}

/// Frame a sequence of JSON event payloads as an SSE body.
fn sse_body(payloads: &[&str]) -> String {
    let mut body = String::new();
    for payload in payloads {
        body.push_str("data: ");
        body.push_str(payload);
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn noop(_: &DeltaEvent) {}

// ---- Tests ----

/// A full turn over HTTP: deltas decode in order and the session folds
/// them into one assistant message.
#[tokio::test]
async fn turn_over_http_folds_decoded_deltas() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"type":"text-delta","delta":"Hello"}"#,
        r#"{"type":"text-delta","delta":", "}"#,
        r#"{"type":"text-delta","delta":"world"}"#,
    ]);

    Mock::given(method("POST"))
        .and(header("Accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);

    let outcome = session.send(UserInput::text("greet me"), noop).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(session.messages()[1].text(), "Hello, world");
    assert_eq!(session.status(), SessionStatus::Ready);
}

/// The request carries the model, the system prompt, and the full message
/// history plus the new user turn.
#[tokio::test]
async fn request_body_carries_model_and_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "model": "gemini-2.5-flash",
            "system": "be brief",
            "stream": true,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);
    session.send(UserInput::text("hello"), noop).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["parts"][0]["text"], "hello");
}

/// A configured API key goes out as a bearer token.
#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer sk-test-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = make_transport(&server.uri(), Some("sk-test-123"));
    let input = UserInput::text("hi");
    transport.open(&[], &input).await.unwrap();
}

/// A non-success status refuses the turn before streaming begins; the
/// session reports the failure and keeps the turn for a later retry.
#[tokio::test]
async fn http_error_status_fails_the_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);

    let outcome = session.send(UserInput::text("hello"), noop).await.unwrap();
    match outcome {
        TurnOutcome::Failed(reason) => {
            assert!(reason.contains("503"), "reason names the status: {reason}");
        }
        other => panic!("expected a failed turn, got {other:?}"),
    }
    assert_eq!(session.status(), SessionStatus::Error);
}

/// An error event mid-stream ends the turn; deltas before it are kept.
#[tokio::test]
async fn error_event_mid_stream_keeps_partial_content() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"type\":\"text-delta\",\"delta\":\"partial answ\"}\n\n",
        "data: {\"type\":\"error\",\"errorText\":\"model overloaded\"}\n\n",
    );

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);

    let outcome = session.send(UserInput::text("q"), noop).await.unwrap();
    assert_eq!(outcome, TurnOutcome::Failed("model overloaded".to_string()));
    assert_eq!(session.messages()[1].text(), "partial answ");
    assert_eq!(session.status(), SessionStatus::Error);
}

/// File events come through as file parts alongside the text.
#[tokio::test]
async fn file_events_become_file_parts() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"type":"text-delta","delta":"see the chart: "}"#,
        r#"{"type":"file","url":"https://cdn.example.com/progress.png","mediaType":"image/png"}"#,
    ]);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);

    let mut saw_file = false;
    session
        .send(UserInput::text("chart please"), |event| {
            if let DeltaEvent::File { filename, .. } = event {
                saw_file = true;
                assert_eq!(filename, "progress.png");
            }
        })
        .await
        .unwrap();

    assert!(saw_file, "observer saw the file event");
    assert_eq!(session.messages()[1].parts.len(), 2);
}

/// Unknown event markers in the stream are skipped, not treated as errors.
#[tokio::test]
async fn unknown_markers_are_skipped() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"type":"start"}"#,
        r#"{"type":"text-start","id":"0"}"#,
        r#"{"type":"text-delta","delta":"just this"}"#,
        r#"{"type":"text-end","id":"0"}"#,
    ]);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transport = Arc::new(make_transport(&server.uri(), None));
    let mut session = ChatSession::new(transport as Arc<dyn Transport>);

    let outcome = session.send(UserInput::text("q"), noop).await.unwrap();
    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(session.messages()[1].text(), "just this");
}
