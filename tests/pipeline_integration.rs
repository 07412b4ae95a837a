//! End-to-end tests: a full session driven through the rig HTTP transport.
//!
//! Each test spins up an Axum server on a random port that speaks the
//! OpenAI chat completions wire format, and points the crew at it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use career_explorer::channels::{Outcome, ScriptedTerminal, run_dialogue, run_form};
use career_explorer::config::AppConfig;
use career_explorer::crew::{AgentPipeline, LlmCompletionProvider, PipelineState};
use career_explorer::error::PipelineError;
use career_explorer::llm::create_provider;
use career_explorer::profile::UserProfile;
use career_explorer::session::CareerSession;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy)]
enum Behavior {
    Answer,
    ServerError,
    BadRequest,
    Slow,
}

struct Backend {
    behavior: Behavior,
    requests: Mutex<Vec<(Option<String>, Value)>>,
}

async fn chat_completions(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let prompt = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .map(|m| text_of(&m["content"]))
        .unwrap_or_default();
    backend.requests.lock().unwrap().push((auth, body));

    match backend.behavior {
        Behavior::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "model crashed at 10.0.0.7"}})),
        ),
        Behavior::BadRequest => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": "context length exceeded"}})),
        ),
        Behavior::Slow => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(completion("too late")))
        }
        Behavior::Answer => {
            let content = if prompt.contains("Consider these career paths") {
                "1. Machine Learning/AI: strong Python, next step: build a portfolio"
            } else {
                "Profile summary: CS graduate who enjoys data"
            };
            (StatusCode::OK, Json(completion(content)))
        }
    }
}

/// Message content is either a plain string or a list of text parts.
fn text_of(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "phi3:latest",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "logprobs": null,
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 12, "total_tokens": 54}
    })
}

/// Start an Axum server on a random port, return (base url, backend).
async fn start_server(behavior: Behavior) -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend {
        behavior,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(Arc::clone(&backend));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}/v1"), backend)
}

fn pipeline(base: &str, request_timeout: Duration) -> AgentPipeline {
    let config = AppConfig {
        api_base: base.to_string(),
        api_key: SecretString::from("test-key"),
        request_timeout,
        ..AppConfig::default()
    };
    let llm = create_provider(&config).unwrap();
    let provider = Arc::new(
        LlmCompletionProvider::new(llm, config.request_timeout)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens),
    );
    AgentPipeline::from_config(provider, &config)
}

fn answers() -> Vec<&'static str> {
    vec![
        "BSc Computer Science",
        "Data engineering internship",
        "Python, SQL, Python",
        "Machine learning",
        "Collaborative teams",
        "ML engineer",
    ]
}

#[tokio::test]
async fn dialogue_session_end_to_end() {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let (base, backend) = start_server(Behavior::Answer).await;
        let mut session = CareerSession::new(pipeline(&base, Duration::from_secs(5)));
        let mut term = ScriptedTerminal::new(answers());

        let outcome = run_dialogue(&mut session, &mut term).await.unwrap();
        assert_eq!(outcome, Outcome::Recommended);
        assert_eq!(
            session.pipeline().state(),
            PipelineState::RecommendationDone
        );

        let transcript = term.transcript();
        assert!(transcript.contains("1. Machine Learning/AI"));
        assert!(transcript.contains("book a video consultation"));

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let (auth, first) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer test-key"));
        assert_eq!(first["model"], "phi3:latest");
        let first_prompt = text_of(&first["messages"][1]["content"]);
        assert!(first_prompt.contains("- skills (This is the user's skills): Python, SQL"));

        let (_, second) = &requests[1];
        assert_eq!(second["messages"][0]["role"], "system");
        let system = text_of(&second["messages"][0]["content"]);
        assert!(system.contains("Career Exploration Expert"));
        let second_prompt = text_of(&second["messages"][1]["content"]);
        assert!(second_prompt.contains("Profile summary: CS graduate who enjoys data"));
        assert!(!second_prompt.contains("BSc Computer Science"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn second_submission_starts_without_agent_memory() {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let (base, backend) = start_server(Behavior::Answer).await;
        let mut session =
            CareerSession::new(pipeline(&base, Duration::from_secs(5))).allow_incomplete(true);
        let mut term = ScriptedTerminal::new(["/submit", "/submit"]);

        let outcome = run_form(&mut session, &mut term).await.unwrap();
        assert_eq!(outcome, Outcome::Recommended);

        session.submit().await.unwrap();
        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        // System prompt and the new task only.
        assert_eq!(requests[2].1["messages"].as_array().unwrap().len(), 2);
        assert_eq!(requests[3].1["messages"].as_array().unwrap().len(), 2);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn backend_failure_shows_generic_message() {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let (base, backend) = start_server(Behavior::ServerError).await;
        let mut session = CareerSession::new(pipeline(&base, Duration::from_secs(5)));
        let mut term = ScriptedTerminal::new(answers());

        let outcome = run_dialogue(&mut session, &mut term).await.unwrap();
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
        assert_eq!(session.pipeline().state(), PipelineState::Failed);

        let transcript = term.transcript();
        assert!(transcript.contains("Please try again later"));
        assert!(!transcript.contains("10.0.0.7"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rejected_request_is_a_provider_failure() {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let (base, backend) = start_server(Behavior::BadRequest).await;
        let mut pipeline = pipeline(&base, Duration::from_secs(5));

        let err = pipeline.run(&UserProfile::default()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Provider(_)));
        assert!(err.is_retryable());
        assert!(!err.user_message().contains("context length"));
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
        assert_eq!(pipeline.state(), PipelineState::Failed);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slow_backend_times_out() {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let (base, _backend) = start_server(Behavior::Slow).await;
        let mut pipeline = pipeline(&base, Duration::from_millis(200));

        let err = pipeline.run(&UserProfile::default()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Provider(ref m) if m.contains("timed out")));
        assert!(err.is_retryable());
    })
    .await
    .expect("test timed out");
}
