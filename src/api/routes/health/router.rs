//! Router for the health check

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

async fn health_handler(
    State(state): State<SharedState>,
) -> Result<Json<public::HealthResponse>, ApiError> {
    let calendar_configured = state
        .read()
        .map_err(|_| anyhow!("Unable to read shared state"))?
        .calendar
        .is_configured();

    Ok(Json(public::HealthResponse {
        status: "ok".to_string(),
        calendar_configured,
    }))
}

/// Create the health router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(health_handler))
}
