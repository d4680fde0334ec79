use crate::config::ServerConfig;
use crate::dispatch::SkillDispatcher;
use crate::envelope::RequestEnvelope;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

#[derive(Clone)]
struct SkillState {
    dispatcher: Arc<SkillDispatcher>,
    bearer_token: Option<String>,
}

/// Routes: `POST {config.path}` for request envelopes and `GET /health`.
pub fn router(dispatcher: Arc<SkillDispatcher>, config: &ServerConfig) -> Router {
    let bearer_token = config
        .bearer_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned);
    let state = SkillState {
        dispatcher,
        bearer_token,
    };

    Router::new()
        .route("/health", get(skill_health))
        .route(&config.path, post(skill_endpoint))
        .with_state(state)
}

/// Serve the skill until `shutdown` resolves.
pub async fn run_server(
    config: ServerConfig,
    dispatcher: Arc<SkillDispatcher>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let app = router(dispatcher, &config);

    tracing::info!("skill endpoint listening on http://{local_addr}{}", config.path);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn skill_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

fn bearer_is_valid(headers: &HeaderMap, expected: &Option<String>) -> bool {
    let Some(expected_token) = expected else {
        return true;
    };
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let candidate = header_value
        .strip_prefix("Bearer ")
        .unwrap_or_default()
        .trim();
    !expected_token.is_empty() && candidate == expected_token
}

async fn skill_endpoint(
    State(state): State<SkillState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !bearer_is_valid(&headers, &state.bearer_token) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "unauthorized"})),
        )
            .into_response();
    }

    let envelope: RequestEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "rejected malformed request envelope");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("invalid request envelope: {e}")})),
            )
                .into_response();
        }
    };

    let response = state.dispatcher.handle(&envelope);
    (StatusCode::OK, Json(response)).into_response()
}
