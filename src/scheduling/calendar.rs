//! Interface to the external calendar the booking flow brokers
//! against. The Google implementation lives in `crate::google::gcal`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::slots::BusyInterval;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Calendar integration is not configured")]
    NotConfigured,
    #[error("Calendar request failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
}

/// Reminder offset in minutes before the start of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reminder {
    Email(i64),
    Popup(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub attendees: Vec<Attendee>,
    pub reminders: Vec<Reminder>,
    /// Ask the calendar to provision a video meeting link
    pub request_meeting_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub id: String,
    pub meeting_link: Option<String>,
    pub html_link: Option<String>,
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    /// Busy ranges between `time_min` and `time_max`.
    async fn free_busy(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError>;

    async fn insert_event(&self, event: NewEvent) -> Result<CreatedEvent, CalendarError>;
}

/// Stand-in used when no calendar credentials are available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCalendar;

#[async_trait]
impl CalendarService for NullCalendar {
    fn is_configured(&self) -> bool {
        false
    }

    async fn free_busy(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError> {
        Err(CalendarError::NotConfigured)
    }

    async fn insert_event(&self, _event: NewEvent) -> Result<CreatedEvent, CalendarError> {
        Err(CalendarError::NotConfigured)
    }
}
