//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};

use booker::api::AppState;
use booker::api::app;
use booker::core::{AppConfig, Clock};
use booker::notify::Notifier;
use booker::scheduling::{BusyInterval, CalendarError, CalendarService, CreatedEvent, NewEvent};

pub const CONTACT_EMAIL: &str = "hello@example.com";

/// Monday, October 19, 2026 at 11:00 AM in Toronto
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap()
}

/// Calendar double. Busy ranges are given in minutes from the start
/// of whichever day is queried, so the same calendar works for any
/// date a test asks about.
#[derive(Default)]
pub struct TestCalendar {
    pub configured: bool,
    pub busy_minutes: Vec<(i64, i64)>,
    pub fail_free_busy: bool,
    pub fail_insert: bool,
    pub inserted: Mutex<Vec<NewEvent>>,
}

impl TestCalendar {
    pub fn configured() -> Self {
        Self {
            configured: true,
            ..Default::default()
        }
    }

    pub fn with_busy(busy_minutes: Vec<(i64, i64)>) -> Self {
        Self {
            configured: true,
            busy_minutes,
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            configured: true,
            fail_free_busy: true,
            fail_insert: true,
            ..Default::default()
        }
    }

    pub fn inserted(&self) -> Vec<NewEvent> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarService for TestCalendar {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn free_busy(
        &self,
        time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError> {
        if !self.configured {
            return Err(CalendarError::NotConfigured);
        }
        if self.fail_free_busy {
            return Err(CalendarError::Upstream(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(self
            .busy_minutes
            .iter()
            .map(|(start, end)| {
                BusyInterval::new(
                    time_min + Duration::minutes(*start),
                    time_min + Duration::minutes(*end),
                )
            })
            .collect())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<CreatedEvent, CalendarError> {
        if !self.configured {
            return Err(CalendarError::NotConfigured);
        }
        if self.fail_insert {
            return Err(CalendarError::Upstream(anyhow::anyhow!(
                "connection refused"
            )));
        }
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(event);
        Ok(CreatedEvent {
            id: format!("evt_{}", inserted.len()),
            meeting_link: Some("https://meet.google.com/abc-defg-hij".to_string()),
            html_link: Some("https://calendar.google.com/event?eid=abc".to_string()),
        })
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        timezone: chrono_tz::America::Toronto,
        google_credentials: None,
        calendar_id: None,
        spreadsheet_id: None,
        email_api_key: None,
        email_from: None,
        notify_email: None,
        contact_email: CONTACT_EMAIL.to_string(),
        static_dir: "./public".to_string(),
        ..AppConfig::default()
    }
}

/// Creates a test application router around the given calendar with
/// the clock pinned to `fixed_now`. No notification sinks are wired
/// up so nothing leaves the process.
pub fn test_app_with(calendar: Arc<TestCalendar>) -> Router {
    let app_state = AppState::new(test_config(), calendar, Notifier::default())
        .with_clock(Clock::Fixed(fixed_now()));
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application with an empty, configured calendar.
pub fn test_app() -> Router {
    test_app_with(Arc::new(TestCalendar::configured()))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
