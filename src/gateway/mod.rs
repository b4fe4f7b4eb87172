/// HTTP ingress for events pushed by the WhatsApp bridge.
///
/// Handlers only authenticate, parse and enqueue. All processing happens in
/// the mirror engine on the other end of the queue.
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, error, info, warn};

use crate::bus::{BusEvent, EventPublisher};

type HmacSha256 = Hmac<Sha256>;

/// Max event payload size: 1 MB.
const MAX_EVENT_BODY: usize = 1_048_576;

#[derive(Clone)]
pub struct GatewayState {
    publisher: EventPublisher,
    secret: Option<Arc<str>>,
}

impl GatewayState {
    pub fn new(publisher: EventPublisher, secret: Option<String>) -> Self {
        Self {
            publisher,
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }
}

fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/events", post(events_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// GET /api/health: health check endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Validate HMAC-SHA256 signature against a payload.
pub(crate) fn validate_signature(secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    // Raw hex or "sha256=..." prefix
    let sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    expected.as_bytes().ct_eq(sig.as_bytes()).into()
}

/// POST /api/events: enqueue one bridge event.
async fn events_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if body.len() > MAX_EVENT_BODY {
        warn!("event payload too large ({} bytes)", body.len());
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }

    if let Some(secret) = state.secret.as_deref() {
        let Some(signature) = headers
            .get("X-Signature-256")
            .and_then(|v| v.to_str().ok())
        else {
            warn!("event rejected: missing signature header");
            return StatusCode::UNAUTHORIZED.into_response();
        };
        if !validate_signature(secret, signature, &body) {
            warn!("event rejected: invalid signature");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let event: BusEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            debug!("unparseable event body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("invalid event: {}", e)})),
            )
                .into_response();
        }
    };

    let kind = event.kind();
    if let Err(e) = state.publisher.publish(event).await {
        error!("failed to enqueue {} event: {}", kind, e);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": "engine unavailable"})),
        )
            .into_response();
    }
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"status": "queued"})),
    )
        .into_response()
}

/// Bind the ingress and serve it on a background task.
pub async fn start(
    host: &str,
    port: u16,
    state: GatewayState,
) -> Result<tokio::task::JoinHandle<()>> {
    if state.secret.is_none() {
        warn!("gateway secret not set, accepting unsigned events");
    }
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind event ingress on {}", addr))?;
    info!("event ingress listening on {}", addr);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("event ingress error: {}", e);
        }
    }))
}
