use crate::events::GithubAdapter;
use crate::signature::verify_signature;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for the webhook endpoint: the shared secret GitHub signs
/// payloads with, if configured.
#[derive(Clone, Default)]
pub struct WebhookConfig {
    pub secret: Option<String>,
}

#[derive(Clone)]
struct WebhookState {
    adapter: Arc<GithubAdapter>,
    config: WebhookConfig,
}

/// Builds the `POST /webhooks/github` route bound to `adapter`.
pub fn router(adapter: Arc<GithubAdapter>, config: WebhookConfig) -> Router {
    let state = WebhookState { adapter, config };
    Router::new().route("/webhooks/github", post(webhook_handler)).with_state(state)
}

async fn webhook_handler(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let signature_header = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok());

    if !verify_signature(&body, signature_header, state.config.secret.as_deref()) {
        warn!("webhook signature verification failed");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid signature"})));
    }

    let Some(event_kind) = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "missing X-GitHub-Event header"})));
    };

    let result = match event_kind {
        "ping" => {
            info!("received github ping");
            Ok(())
        }
        "issues" => match serde_json::from_slice(&body) {
            Ok(event) => state.adapter.handle_issues(event).await,
            Err(e) => {
                warn!(error = %e, "malformed issues payload");
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "malformed payload"})));
            }
        },
        "issue_comment" => match serde_json::from_slice(&body) {
            Ok(event) => state.adapter.handle_issue_comment(event).await,
            Err(e) => {
                warn!(error = %e, "malformed issue_comment payload");
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "malformed payload"})));
            }
        },
        "pull_request" => match serde_json::from_slice(&body) {
            Ok(event) => state.adapter.handle_pull_request(event).await,
            Err(e) => {
                warn!(error = %e, "malformed pull_request payload");
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "malformed payload"})));
            }
        },
        other => {
            info!(event_kind = other, "ignoring unrecognized event kind");
            Ok(())
        }
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))),
        Err(e) => {
            warn!(error = %e, "error handling webhook event");
            (StatusCode::OK, Json(json!({"status": "error", "detail": e.to_string()})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_no_secret() {
        let config = WebhookConfig::default();
        assert!(config.secret.is_none());
    }
}
