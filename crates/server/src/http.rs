use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gridbot_discord::interaction::Interaction;
use tracing::{debug, error, warn};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// The whole HTTP surface: the webhook at the root plus liveness. Anything
/// else is axum's defaults, which already give unknown paths a 404 and
/// wrong methods on known paths a 405 with an `Allow` header.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", post(interactions))
        .route("/healthz", get(health::healthz))
        .with_state(AppState { dispatcher })
}

/// Single webhook entry point. The body is taken as raw bytes so a parse
/// failure is our 400, not a framework rejection we cannot log.
async fn interactions(State(state): State<AppState>, body: Bytes) -> Response {
    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(parse_error) => {
            warn!(
                event_name = "http.bad_payload",
                error = %parse_error,
                "interaction body failed to parse"
            );
            return (StatusCode::BAD_REQUEST, "invalid interaction payload").into_response();
        }
    };

    match state.dispatcher.dispatch(&interaction).await {
        Ok(response) => Json(response).into_response(),
        Err(DispatchError::Classify(classify_error)) => {
            // Foreign custom_ids are expected traffic on a shared webhook
            // and stay at debug; every other rejection is worth a warning.
            if classify_error.is_routine() {
                debug!(
                    event_name = "http.unroutable",
                    interaction_id = %interaction.id,
                    reason = %classify_error,
                    "interaction not for this service"
                );
            } else {
                warn!(
                    event_name = "http.unroutable",
                    interaction_id = %interaction.id,
                    reason = %classify_error,
                    "interaction could not be classified"
                );
            }
            (StatusCode::BAD_REQUEST, "unknown interaction").into_response()
        }
        Err(DispatchError::Handler(handler_error)) => {
            error!(
                event_name = "http.handler_failed",
                interaction_id = %interaction.id,
                error = %handler_error,
                "interaction handler failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "interaction handling failed").into_response()
        }
    }
}
