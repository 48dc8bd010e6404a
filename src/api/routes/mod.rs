//! API routes module

pub mod availability;
pub mod booking;
pub mod contact;
pub mod health;
pub mod testimonial;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Open slots for a day
        .nest("/availability", availability::router())
        // Calendar reservations
        .nest("/booking", booking::router())
        // Contact form
        .nest("/contact", contact::router())
        // Testimonial submissions
        .nest("/testimonial", testimonial::router())
        .nest("/health", health::router())
}
