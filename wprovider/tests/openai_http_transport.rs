#![cfg(feature = "provider-openai")]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use wprovider::adapters::openai::{
    OpenAiAuth, OpenAiHttpTransport, OpenAiMessage, OpenAiRequest, OpenAiRole, OpenAiTransport,
};
use wprovider::{ProviderErrorKind, ToolChoice};

#[derive(Debug, Clone)]
struct CapturedRequest {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct CannedReply {
    status: StatusCode,
    body: Value,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

struct LocalServer {
    base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl LocalServer {
    fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().expect("captured lock").clone()
    }
}

async fn chat_completions(
    State(reply): State<CannedReply>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    reply
        .captured
        .lock()
        .expect("captured lock")
        .push(CapturedRequest {
            authorization,
            body,
        });

    (reply.status, Json(reply.body.clone()))
}

/// Serves `POST /v1/chat/completions` with a fixed reply on an ephemeral port.
async fn serve(status: StatusCode, body: Value) -> LocalServer {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let reply = CannedReply {
        status,
        body,
        captured: Arc::clone(&captured),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(reply);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    LocalServer {
        base_url: format!("http://{address}/v1"),
        captured,
    }
}

fn user_request() -> OpenAiRequest {
    OpenAiRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![OpenAiMessage {
            role: OpenAiRole::User,
            content: Some("What's the weather like in Paris?".to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }],
        tools: Vec::new(),
        tool_choice: Some(ToolChoice::Auto),
        temperature: None,
        max_tokens: None,
    }
}

#[tokio::test]
async fn http_transport_posts_chat_completion_with_bearer_auth() {
    let server = serve(
        StatusCode::OK,
        json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "It is 22 degrees in Paris."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        }),
    )
    .await;

    let transport =
        OpenAiHttpTransport::new(reqwest::Client::new()).with_base_url(server.base_url.clone());
    let response = transport
        .complete(user_request(), OpenAiAuth::api_key("sk-test-key"))
        .await
        .expect("completion should succeed");

    assert_eq!(
        response.message.content.as_deref(),
        Some("It is 22 degrees in Paris.")
    );
    assert_eq!(response.usage.total_tokens, 20);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let captured = &requests[0];
    assert_eq!(captured.authorization.as_deref(), Some("Bearer sk-test-key"));
    assert_eq!(captured.body["model"], json!("gpt-4o-mini"));
    assert_eq!(captured.body["messages"][0]["role"], json!("user"));
    assert!(captured.body.get("tool_choice").is_none());
}

#[tokio::test]
async fn http_transport_maps_unauthorized_to_authentication_error() {
    let server = serve(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}),
    )
    .await;

    let transport =
        OpenAiHttpTransport::new(reqwest::Client::new()).with_base_url(server.base_url.clone());
    let error = transport
        .complete(user_request(), OpenAiAuth::api_key("sk-wrong"))
        .await
        .expect_err("401 should fail");

    assert_eq!(error.kind, ProviderErrorKind::Authentication);
    assert_eq!(error.status, Some(401));
    assert_eq!(error.message, "Incorrect API key provided");
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn http_transport_maps_rate_limit_and_unavailable() {
    let server = serve(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "Rate limit reached"}}),
    )
    .await;
    let transport =
        OpenAiHttpTransport::new(reqwest::Client::new()).with_base_url(server.base_url.clone());
    let error = transport
        .complete(user_request(), OpenAiAuth::api_key("sk-test"))
        .await
        .expect_err("429 should fail");
    assert_eq!(error.kind, ProviderErrorKind::RateLimited);
    assert!(error.retryable);

    let server = serve(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    let transport =
        OpenAiHttpTransport::new(reqwest::Client::new()).with_base_url(server.base_url.clone());
    let error = transport
        .complete(user_request(), OpenAiAuth::api_key("sk-test"))
        .await
        .expect_err("503 should fail");
    assert_eq!(error.kind, ProviderErrorKind::Unavailable);
    assert!(error.message.contains("503"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr");
    drop(listener);

    let transport = OpenAiHttpTransport::new(reqwest::Client::new())
        .with_base_url(format!("http://{address}/v1"));
    let error = transport
        .complete(user_request(), OpenAiAuth::api_key("sk-test"))
        .await
        .expect_err("closed port should fail");

    assert_eq!(error.kind, ProviderErrorKind::Transport);
}
