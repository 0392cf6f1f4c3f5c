//! HTTP chat endpoint: one `Chatbot` per session id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::chat::{Chatbot, ConversationState, is_restart_command};
use crate::config::{BotConfig, DEFAULT_SESSION_TIMEOUT, ServerConfig};
use crate::services::Services;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub state: ConversationState,
}

struct SessionEntry {
    bot: Arc<Mutex<Chatbot>>,
    last_used: Instant,
}

type SessionMap = HashMap<String, SessionEntry>;

/// Shared state for the chat routes.
#[derive(Clone)]
pub struct ChatRouteState {
    services: Services,
    config: BotConfig,
    session_timeout: Duration,
    sessions: Arc<Mutex<SessionMap>>,
}

impl ChatRouteState {
    pub fn new(services: Services, config: BotConfig) -> Self {
        Self {
            services,
            config,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Drop sessions idle for longer than `timeout`.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// The bot for `session_id`, or a fresh session when the id is unknown or
    /// has expired. Expired sessions are evicted on every call.
    async fn session(&self, session_id: Option<&str>) -> (String, Arc<Mutex<Chatbot>>) {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) < self.session_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Evicted idle chat sessions");
        }

        if let Some(id) = session_id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_used = now;
                return (id.to_string(), Arc::clone(&entry.bot));
            }
        }

        let id = Uuid::new_v4().to_string();
        let bot = Arc::new(Mutex::new(Chatbot::new(
            self.services.clone(),
            self.config.clone(),
        )));
        sessions.insert(
            id.clone(),
            SessionEntry {
                bot: Arc::clone(&bot),
                last_used: now,
            },
        );
        tracing::info!(session_id = %id, "New chat session");
        (id, bot)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// POST /api/chat
///
/// Runs one turn. Turns on the same session are serialized by the session's
/// lock; different sessions proceed independently.
async fn post_chat(
    State(state): State<ChatRouteState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "message is required"})),
        )
            .into_response();
    }

    let (session_id, bot) = state.session(request.session_id.as_deref()).await;
    let mut bot = bot.lock().await;
    let reply = if is_restart_command(&request.message) {
        bot.restart()
    } else {
        bot.process(&request.message).await
    };

    Json(ChatResponse {
        session_id,
        reply,
        state: bot.state(),
    })
    .into_response()
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Build the chat REST routes.
pub fn chat_routes(state: ChatRouteState) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve the chat routes until the process exits.
pub async fn serve(config: &ServerConfig, state: ChatRouteState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Chat HTTP adapter listening");
    axum::serve(listener, chat_routes(state)).await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::stub::StubTransport;
    use crate::chat::prompts;
    use crate::config::ApiConfig;

    fn state() -> ChatRouteState {
        let stub = Arc::new(StubTransport::new(|_| {
            Ok(json!({"isSuccess": true, "statusCode": 1, "message": "ok"}))
        }));
        ChatRouteState::new(
            Services::new(stub, &ApiConfig::default()),
            BotConfig::default(),
        )
    }

    async fn chat(state: &ChatRouteState, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = chat_routes(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn new_session_gets_welcome() {
        let state = state();
        let (status, body) = chat(&state, json!({"message": "hi"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], prompts::WELCOME);
        assert_eq!(body["state"], "awaiting_postcode");
        assert!(Uuid::parse_str(body["session_id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn session_id_continues_conversation() {
        let state = state();
        let (_, first) = chat(&state, json!({"message": "start"})).await;
        let id = first["session_id"].as_str().unwrap().to_string();

        let (_, second) = chat(&state, json!({"session_id": id, "message": "AB1"})).await;
        assert_eq!(second["session_id"], id.as_str());
        assert_eq!(second["reply"], "❌ Please enter a valid postcode.");
        assert_eq!(second["state"], "awaiting_postcode");
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_id_starts_fresh() {
        let state = state();
        let (_, body) = chat(&state, json!({"session_id": "nope", "message": "hello"})).await;
        assert_ne!(body["session_id"], "nope");
        assert_eq!(body["state"], "awaiting_postcode");
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let state = state().with_session_timeout(Duration::from_millis(50));
        let (_, first) = chat(&state, json!({"message": "start"})).await;
        let stale = first["session_id"].as_str().unwrap().to_string();
        chat(&state, json!({"message": "start"})).await;
        assert_eq!(state.session_count().await, 2);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let (_, body) = chat(&state, json!({"session_id": stale, "message": "SW1A1AA"})).await;
        assert_ne!(body["session_id"], stale.as_str());
        assert_eq!(body["reply"], prompts::WELCOME);
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn active_session_is_kept() {
        let state = state().with_session_timeout(Duration::from_secs(60));
        let (_, first) = chat(&state, json!({"message": "start"})).await;
        let id = first["session_id"].as_str().unwrap().to_string();
        for _ in 0..5 {
            let (_, body) = chat(&state, json!({"message": "hello"})).await;
            assert_ne!(body["session_id"], id.as_str());
        }
        let (_, body) = chat(&state, json!({"session_id": id, "message": "AB1"})).await;
        assert_eq!(body["session_id"], id.as_str());
        assert_eq!(state.session_count().await, 6);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let state = state();
        let (status, body) = chat(&state, json!({"message": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "message is required");
        assert_eq!(state.session_count().await, 0);
    }

    #[tokio::test]
    async fn health_check() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = chat_routes(state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
