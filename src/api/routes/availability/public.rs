//! Public types for the availability API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    // Optional so a missing date is a 400 instead of a 422
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available_slots: Vec<String>,
}
