//! Turn a chosen slot into a calendar reservation.
//!
//! Unlike availability, every failure here is surfaced to the caller.
//! A booking that silently didn't happen is worse than an error page.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::calendar::{Attendee, CalendarError, CalendarService, NewEvent, Reminder};
use super::ledger::{BookingLedger, Claim};
use super::parse::{DateParseError, parse_display_date, parse_display_time};
use super::slots::meeting_duration;
use super::time::resolve_start;

const REMINDER_DAY_BEFORE: Reminder = Reminder::Email(24 * 60);
const REMINDER_HOUR_BEFORE: Reminder = Reminder::Popup(60);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub selected_date: Option<String>,
    pub selected_time: Option<String>,
    /// Client generated token used to collapse retries of one submission
    pub request_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub event_id: String,
    pub meeting_link: Option<String>,
    pub calendar_link: Option<String>,
    pub start: DateTime<Tz>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Online booking is unavailable right now. Please email us at {contact_email}.")]
    Configuration { contact_email: String },
    #[error(
        "We couldn't create your booking. Please try again or email us at {contact_email}."
    )]
    Upstream {
        contact_email: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("This booking is already being processed")]
    Duplicate,
}

impl From<DateParseError> for BookingError {
    fn from(err: DateParseError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

/// Everything a commit needs besides the request itself.
pub struct BookingContext<'a> {
    pub calendar: &'a dyn CalendarService,
    pub timezone: Tz,
    pub now: DateTime<Utc>,
    pub contact_email: &'a str,
}

struct ValidRequest<'r> {
    name: &'r str,
    email: &'r str,
    company: Option<&'r str>,
    message: Option<&'r str>,
    selected_date: &'r str,
    selected_time: &'r str,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate(request: &BookingRequest) -> Result<ValidRequest<'_>, BookingError> {
    let missing: Vec<&str> = [
        ("name", &request.name),
        ("email", &request.email),
        ("selectedDate", &request.selected_date),
        ("selectedTime", &request.selected_time),
    ]
    .into_iter()
    .filter(|(_, value)| non_empty(value).is_none())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(BookingError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    // All four were checked above
    Ok(ValidRequest {
        name: non_empty(&request.name).unwrap_or_default(),
        email: non_empty(&request.email).unwrap_or_default(),
        company: non_empty(&request.company),
        message: non_empty(&request.message),
        selected_date: non_empty(&request.selected_date).unwrap_or_default(),
        selected_time: non_empty(&request.selected_time).unwrap_or_default(),
    })
}

fn event_summary(request: &ValidRequest) -> String {
    match request.company {
        Some(company) => format!("Consultation: {} ({})", request.name, company),
        None => format!("Consultation: {}", request.name),
    }
}

fn event_description(request: &ValidRequest) -> String {
    let mut lines = vec![
        "Booked through the website.".to_string(),
        String::new(),
        format!("Name: {}", request.name),
        format!("Email: {}", request.email),
    ];
    if let Some(company) = request.company {
        lines.push(format!("Company: {}", company));
    }
    if let Some(message) = request.message {
        lines.push(String::new());
        lines.push("Message:".to_string());
        lines.push(message.to_string());
    }
    lines.join("\n")
}

fn build_event(
    request: &ValidRequest,
    start: DateTime<Tz>,
) -> NewEvent {
    NewEvent {
        summary: event_summary(request),
        description: event_description(request),
        start,
        end: start + meeting_duration(),
        attendees: vec![Attendee {
            email: request.email.to_string(),
            display_name: Some(request.name.to_string()),
        }],
        reminders: vec![REMINDER_DAY_BEFORE, REMINDER_HOUR_BEFORE],
        request_meeting_link: true,
    }
}

/// Validate the request, resolve its start time and insert the event.
/// No calendar call is made unless validation passes.
pub async fn commit_booking(
    ctx: &BookingContext<'_>,
    request: &BookingRequest,
) -> Result<BookingConfirmation, BookingError> {
    let valid = validate(request)?;

    if !ctx.calendar.is_configured() {
        tracing::error!("Booking attempted but the calendar is not configured");
        return Err(BookingError::Configuration {
            contact_email: ctx.contact_email.to_string(),
        });
    }

    let time = parse_display_time(valid.selected_time)?;
    let date = parse_display_date(valid.selected_date)?;
    let start = resolve_start(valid.selected_date, date, time, ctx.timezone, ctx.now)?;

    let event = build_event(&valid, start);
    let created = ctx.calendar.insert_event(event).await.map_err(|err| match err {
        CalendarError::NotConfigured => BookingError::Configuration {
            contact_email: ctx.contact_email.to_string(),
        },
        CalendarError::Upstream(source) => BookingError::Upstream {
            contact_email: ctx.contact_email.to_string(),
            source,
        },
    })?;

    tracing::info!("Booked {} for {} ({})", start, valid.name, created.id);

    Ok(BookingConfirmation {
        event_id: created.id,
        meeting_link: created.meeting_link,
        calendar_link: created.html_link,
        start,
    })
}

/// Same as `commit_booking` but collapses repeated submissions that
/// carry the same request token.
pub async fn commit_booking_once(
    ledger: &BookingLedger,
    ctx: &BookingContext<'_>,
    request: &BookingRequest,
) -> Result<BookingConfirmation, BookingError> {
    let Some(token) = non_empty(&request.request_token) else {
        return commit_booking(ctx, request).await;
    };

    let guard = match ledger.claim(token) {
        Claim::Done(confirmation) => {
            tracing::info!("Replaying booking {} for token {}", confirmation.event_id, token);
            return Ok(confirmation);
        }
        Claim::InFlight => return Err(BookingError::Duplicate),
        Claim::Fresh(guard) => guard,
    };

    let confirmation = commit_booking(ctx, request).await?;
    guard.complete(confirmation.clone());
    Ok(confirmation)
}
