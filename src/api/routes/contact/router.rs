//! Router for the contact form API

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::{ApiError, BadRequest, SuccessResponse};
use crate::api::state::AppState;
use crate::notify::{ContactSubmission, Submission};

type SharedState = Arc<RwLock<AppState>>;

pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, BadRequest> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BadRequest(format!("Missing required field: {}", field)))
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn contact_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::ContactBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = required(body.name, "name")?;
    let email = required(body.email, "email")?;
    if !email.contains('@') {
        return Err(BadRequest("Invalid email address".to_string()).into());
    }

    let (notifier, now) = {
        let shared_state = state
            .read()
            .map_err(|_| anyhow!("Unable to read shared state"))?;
        (shared_state.notifier.clone(), shared_state.clock.now())
    };

    notifier.notify(Submission::Contact(ContactSubmission {
        name,
        email,
        company: blank_to_none(body.company),
        message: blank_to_none(body.message),
        submitted_at: now,
    }));

    Ok(Json(SuccessResponse { success: true }))
}

/// Create the contact router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(contact_handler))
}
