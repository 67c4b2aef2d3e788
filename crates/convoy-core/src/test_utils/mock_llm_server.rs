// src/test_utils/mock_llm_server.rs
use axum::{routing::post, Json, Router};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::core_types::Message;
use crate::errors::ConvoyError;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MockCompletionPayload {
    pub messages: Vec<Message>,
}

#[derive(Serialize)]
struct MockCompletionReply {
    content: String,
}

#[derive(Clone)]
struct MockServerState {
    responses: Arc<Mutex<VecDeque<Result<String, ConvoyError>>>>,
    requests: Arc<Mutex<Vec<MockCompletionPayload>>>,
}

async fn chat_completions_handler(
    axum::extract::State(state): axum::extract::State<MockServerState>,
    Json(payload): Json<MockCompletionPayload>,
) -> Result<Json<MockCompletionReply>, axum::http::StatusCode> {
    log::debug!("mock LLM server received {} messages", payload.messages.len());
    state.requests.lock().unwrap().push(payload);

    match state.responses.lock().unwrap().pop_front() {
        Some(Ok(content)) => Ok(Json(MockCompletionReply { content })),
        Some(Err(e)) => {
            log::debug!("mock LLM server simulating an error: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
        None => {
            log::error!("mock LLM server ran out of scripted responses");
            Err(axum::http::StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

pub struct MockLLMServer {
    addr: SocketAddr,
    pub recorded_requests: Arc<Mutex<Vec<MockCompletionPayload>>>,
}

impl MockLLMServer {
    pub async fn start(responses: Vec<Result<String, ConvoyError>>) -> Self {
        let state = MockServerState {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded_requests = state.requests.clone();

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server to 127.0.0.1:0");
        let addr = listener.local_addr().expect("mock server has no local addr");
        log::info!("mock LLM server listening on {}", addr);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            recorded_requests,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
