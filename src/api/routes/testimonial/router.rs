//! Router for the testimonial API

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::{ApiError, BadRequest, SuccessResponse};
use crate::api::routes::contact::{blank_to_none, required};
use crate::api::state::AppState;
use crate::notify::{Submission, TestimonialSubmission};

type SharedState = Arc<RwLock<AppState>>;

fn validate_rating(rating: Option<i64>) -> Result<Option<u8>, BadRequest> {
    match rating {
        None => Ok(None),
        Some(r @ 1..=5) => Ok(Some(r as u8)),
        Some(r) => Err(BadRequest(format!(
            "Rating must be between 1 and 5, got {}",
            r
        ))),
    }
}

async fn testimonial_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::TestimonialBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = required(body.name, "name")?;
    let quote = required(body.quote, "quote")?;
    let rating = validate_rating(body.rating)?;

    let (notifier, now) = {
        let shared_state = state
            .read()
            .map_err(|_| anyhow!("Unable to read shared state"))?;
        (shared_state.notifier.clone(), shared_state.clock.now())
    };

    notifier.notify(Submission::Testimonial(TestimonialSubmission {
        name,
        quote,
        role: blank_to_none(body.role),
        company: blank_to_none(body.company),
        rating,
        submitted_at: now,
    }));

    Ok(Json(SuccessResponse { success: true }))
}

/// Create the testimonial router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(testimonial_handler))
}
