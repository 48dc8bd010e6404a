//! Router for the availability API

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::{ApiError, BadRequest};
use crate::api::state::AppState;
use crate::scheduling::resolve_availability;

type SharedState = Arc<RwLock<AppState>>;

async fn availability_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::AvailabilityRequest>,
) -> Result<Json<public::AvailabilityResponse>, ApiError> {
    let date = body
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| BadRequest("Missing required field: date".to_string()))?;

    let (calendar, grid, timezone, now) = {
        let shared_state = state
            .read()
            .map_err(|_| anyhow!("Unable to read shared state"))?;
        (
            Arc::clone(&shared_state.calendar),
            shared_state.grid.clone(),
            shared_state.config.timezone,
            shared_state.clock.now(),
        )
    };

    let result = resolve_availability(calendar.as_ref(), &grid, timezone, now, date).await?;

    Ok(Json(public::AvailabilityResponse {
        available_slots: result.display_times(),
    }))
}

/// Create the availability router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(availability_handler))
}
