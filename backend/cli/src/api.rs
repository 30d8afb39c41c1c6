use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::router::{InboundTurn, TurnRouter};

/// Shared application state for API handlers.
pub struct AppState {
    pub router: TurnRouter,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/turn", post(turn))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "soulforge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
struct TurnReply {
    reply: Option<String>,
}

/// Run one inbound turn. `reply` is null when the turn warrants no answer.
async fn turn(State(state): State<Arc<AppState>>, Json(inbound): Json<InboundTurn>) -> Json<TurnReply> {
    let reply = state.router.route(&inbound).await;
    Json(TurnReply { reply })
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulforge_agent::{ChatAgent, ContextWindow, SessionStore};
    use soulforge_commands::build_default_dispatcher;
    use soulforge_config::{LlmSettings, RuntimeConfig};
    use soulforge_providers::MockCompletionClient;
    use soulforge_storage::MemorySessionBackend;
    use tokio::net::TcpListener;

    async fn spawn_app(client: MockCompletionClient) -> String {
        let config = Arc::new(RuntimeConfig::new(LlmSettings::default(), None, None));
        let agent = Arc::new(ChatAgent::new(
            Arc::new(SessionStore::new(Arc::new(MemorySessionBackend::new()))),
            Arc::new(client),
            ContextWindow::new(10),
            "persona",
        ));
        let router = TurnRouter::new(agent, Arc::new(build_default_dispatcher(config)));
        let app = build_router(Arc::new(AppState { router }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_app(MockCompletionClient::new("mock")).await;
        let body: Value = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "soulforge");
    }

    #[tokio::test]
    async fn test_turn_round_trip() {
        let base = spawn_app(MockCompletionClient::new("mock").with_response("喵")).await;
        let client = reqwest::Client::new();

        let body: Value = client
            .post(format!("{base}/api/turn"))
            .json(&json!({"senderId": "10001", "text": "你好"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({"reply": "喵"}));

        let ignored: Value = client
            .post(format!("{base}/api/turn"))
            .json(&json!({"senderId": "10001", "text": "/setLLMUrl http://x", "isSuperAdmin": false}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ignored, json!({"reply": null}));
    }
}
