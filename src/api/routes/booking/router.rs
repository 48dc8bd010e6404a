//! Router for the booking API

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::notify::{BookingNotice, Submission};
use crate::scheduling::{BookingContext, BookingRequest, commit_booking_once};

type SharedState = Arc<RwLock<AppState>>;

async fn booking_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::BookingBody>,
) -> Result<Json<public::BookingResponse>, ApiError> {
    let request: BookingRequest = body.into();

    let (calendar, ledger, notifier, timezone, now, contact_email) = {
        let shared_state = state
            .read()
            .map_err(|_| anyhow!("Unable to read shared state"))?;
        (
            Arc::clone(&shared_state.calendar),
            Arc::clone(&shared_state.ledger),
            shared_state.notifier.clone(),
            shared_state.config.timezone,
            shared_state.clock.now(),
            shared_state.config.contact_email.clone(),
        )
    };

    let ctx = BookingContext {
        calendar: calendar.as_ref(),
        timezone,
        now,
        contact_email: &contact_email,
    };
    let confirmation = commit_booking_once(&ledger, &ctx, &request).await?;

    // Let the owner know, without holding up the response
    notifier.notify(Submission::Booking(BookingNotice {
        name: request.name.clone().unwrap_or_default(),
        email: request.email.clone().unwrap_or_default(),
        company: request.company.clone(),
        message: request.message.clone(),
        starts: confirmation
            .start
            .format("%A, %B %-d, %Y at %-I:%M %p %Z")
            .to_string(),
        event_id: confirmation.event_id.clone(),
        meeting_link: confirmation.meeting_link.clone(),
        submitted_at: now,
    }));

    Ok(Json(confirmation.into()))
}

/// Create the booking router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(booking_handler))
}
