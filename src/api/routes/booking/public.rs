//! Public types for the booking API
use serde::{Deserialize, Serialize};

use crate::scheduling::{BookingConfirmation, BookingRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub selected_date: Option<String>,
    pub selected_time: Option<String>,
    pub message: Option<String>,
    pub request_token: Option<String>,
}

impl From<BookingBody> for BookingRequest {
    fn from(body: BookingBody) -> Self {
        BookingRequest {
            name: body.name,
            email: body.email,
            company: body.company,
            message: body.message,
            selected_date: body.selected_date,
            selected_time: body.selected_time,
            request_token: body.request_token,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl From<BookingConfirmation> for BookingResponse {
    fn from(confirmation: BookingConfirmation) -> Self {
        BookingResponse {
            success: true,
            event_id: confirmation.event_id,
            meet_link: confirmation.meeting_link,
            html_link: confirmation.calendar_link,
        }
    }
}
