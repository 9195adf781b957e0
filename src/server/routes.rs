use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use wfh::{Deliverer, Wfh, JSON_CONTENT_TYPE};

#[derive(Clone)]
pub struct AppState {
    pub wfh: Arc<Wfh>,
    pub deliverer: Deliverer,
    /// Deliveries still in flight; drained before the process exits.
    pub tracker: TaskTracker,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/wfh", post(slash_command))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn slash_command(State(state): State<AppState>, body: String) -> Response {
    let reply = match state.wfh.respond(&body) {
        Ok(reply) => reply,
        Err(error) => {
            warn!(%error, "rejected slash command");
            let status = StatusCode::from_u16(error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, status.canonical_reason().unwrap_or_default()).into_response();
        }
    };

    match reply.callback_url(state.wfh.config().response_mode) {
        Some(url) => {
            let url = url.to_string();
            let deliverer = state.deliverer.clone();
            state.tracker.spawn(async move {
                deliverer.deliver_and_log(&url, reply.body).await;
            });
            debug!(in_flight = state.tracker.len(), "queued delivery");
            StatusCode::OK.into_response()
        }
        None => (
            [(CONTENT_TYPE, JSON_CONTENT_TYPE), (X_CONTENT_TYPE_OPTIONS, "nosniff")],
            reply.body,
        )
            .into_response(),
    }
}
