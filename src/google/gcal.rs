//! Google Calendar client: free/busy lookups and event creation.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::oauth::GoogleAuth;
use crate::core::AppConfig;
use crate::scheduling::calendar::{
    CalendarError, CalendarService, CreatedEvent, NewEvent, Reminder,
};
use crate::scheduling::slots::BusyInterval;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest<'a> {
    time_min: String,
    time_max: String,
    time_zone: &'a str,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<TimePeriod>,
    #[serde(default)]
    pub errors: Vec<FreeBusyError>,
}

#[derive(Debug, Deserialize)]
pub struct TimePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyError {
    pub domain: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    date_time: String,
    time_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventAttendee {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceSolutionKey {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateConferenceRequest {
    request_id: String,
    conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceDataRequest {
    create_request: CreateConferenceRequest,
}

#[derive(Debug, Serialize)]
struct ReminderOverride {
    method: &'static str,
    minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventReminders {
    use_default: bool,
    overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventInsertRequest {
    summary: String,
    description: String,
    start: EventDateTime,
    end: EventDateTime,
    attendees: Vec<EventAttendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conference_data: Option<ConferenceDataRequest>,
    reminders: EventReminders,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub entry_point_type: String,
    pub uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub html_link: Option<String>,
    pub hangout_link: Option<String>,
    pub conference_data: Option<ConferenceData>,
}

impl EventResponse {
    /// Prefer the top level Meet link, fall back to the first video
    /// entry point.
    pub fn meeting_link(&self) -> Option<String> {
        self.hangout_link.clone().or_else(|| {
            self.conference_data.as_ref().and_then(|data| {
                data.entry_points
                    .iter()
                    .find(|e| e.entry_point_type == "video")
                    .map(|e| e.uri.clone())
            })
        })
    }
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn event_date_time(instant: DateTime<Tz>) -> EventDateTime {
    EventDateTime {
        date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, false),
        time_zone: instant.timezone().name().to_string(),
    }
}

fn reminder_override(reminder: &Reminder) -> ReminderOverride {
    match reminder {
        Reminder::Email(minutes) => ReminderOverride {
            method: "email",
            minutes: *minutes,
        },
        Reminder::Popup(minutes) => ReminderOverride {
            method: "popup",
            minutes: *minutes,
        },
    }
}

fn insert_request(event: NewEvent) -> EventInsertRequest {
    let conference_data = event.request_meeting_link.then(|| ConferenceDataRequest {
        create_request: CreateConferenceRequest {
            request_id: Uuid::new_v4().to_string(),
            conference_solution_key: ConferenceSolutionKey {
                r#type: "hangoutsMeet",
            },
        },
    });

    EventInsertRequest {
        summary: event.summary,
        description: event.description,
        start: event_date_time(event.start),
        end: event_date_time(event.end),
        attendees: event
            .attendees
            .into_iter()
            .map(|a| EventAttendee {
                email: a.email,
                display_name: a.display_name,
            })
            .collect(),
        conference_data,
        reminders: EventReminders {
            use_default: false,
            overrides: event.reminders.iter().map(reminder_override).collect(),
        },
    }
}

pub struct GoogleCalendar {
    client: Client,
    api_url: String,
    auth: GoogleAuth,
    calendar_id: String,
    timezone: Tz,
}

impl GoogleCalendar {
    pub fn new(
        api_url: &str,
        auth: GoogleAuth,
        calendar_id: &str,
        timezone: Tz,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
            calendar_id: calendar_id.to_string(),
            timezone,
        })
    }

    /// Build a client from config, or `None` when credentials or the
    /// calendar ID are missing.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let (Some(credentials), Some(calendar_id)) =
            (config.google_credentials.clone(), config.calendar_id.as_deref())
        else {
            return Ok(None);
        };
        let auth = GoogleAuth::new(&config.google_token_url, credentials);
        let calendar = Self::new(
            &config.google_api_url,
            auth,
            calendar_id,
            config.timezone,
            Duration::from_secs(config.upstream_timeout_secs),
        )?;
        Ok(Some(calendar))
    }

    pub async fn query_free_busy(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let access_token = self.auth.access_token(&self.client).await?;
        let url = format!("{}/calendar/v3/freeBusy", self.api_url);
        let body = FreeBusyRequest {
            time_min: rfc3339(time_min),
            time_max: rfc3339(time_max),
            time_zone: self.timezone.name(),
            items: vec![FreeBusyItem {
                id: &self.calendar_id,
            }],
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Free/busy query failed: {} ({})", status, text);
        }

        let mut resp: FreeBusyResponse = serde_json::from_str(&text)?;
        let calendar = resp
            .calendars
            .remove(&self.calendar_id)
            .ok_or_else(|| anyhow!("Calendar {} missing from free/busy response", self.calendar_id))?;

        // Google reports per-calendar failures (notFound, etc.) inline
        // with a 200 status and an empty busy list.
        if let Some(err) = calendar.errors.first() {
            anyhow::bail!(
                "Free/busy error for {}: {}",
                self.calendar_id,
                err.reason.as_deref().unwrap_or("unknown")
            );
        }

        Ok(calendar
            .busy
            .into_iter()
            .map(|period| BusyInterval::new(period.start, period.end))
            .collect())
    }

    pub async fn create_event(&self, event: NewEvent) -> Result<EventResponse> {
        let access_token = self.auth.access_token(&self.client).await?;
        let url = format!(
            "{}/calendar/v3/calendars/{}/events?conferenceDataVersion=1&sendUpdates=all",
            self.api_url,
            urlencoding::encode(&self.calendar_id)
        );
        let body = insert_request(event);

        let res = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Event insert failed: {} ({})", status, text);
        }
        let event: EventResponse = serde_json::from_str(&text)?;
        Ok(event)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn free_busy(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError> {
        Ok(self.query_free_busy(time_min, time_max).await?)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<CreatedEvent, CalendarError> {
        let created = self.create_event(event).await?;
        Ok(CreatedEvent {
            meeting_link: created.meeting_link(),
            html_link: created.html_link,
            id: created.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GoogleCredentials;
    use crate::scheduling::calendar::Attendee;
    use chrono::TimeZone;
    use chrono_tz::America::Toronto;
    use mockito::Matcher;

    fn events_path() -> Matcher {
        Matcher::Regex(r"^/calendar/v3/calendars/[^/]+/events$".to_string())
    }

    const TOKEN_RESP: &str = r#"{"access_token": "ya29.test", "expires_in": 3599}"#;

    async fn calendar(server: &mut mockito::ServerGuard) -> (GoogleCalendar, mockito::Mock) {
        let token_mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TOKEN_RESP)
            .create_async()
            .await;
        let auth = GoogleAuth::new(
            &format!("{}/token", server.url()),
            GoogleCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                refresh_token: "refresh".to_string(),
            },
        );
        let cal = GoogleCalendar::new(
            &server.url(),
            auth,
            "studio@example.com",
            Toronto,
            Duration::from_secs(5),
        )
        .unwrap();
        (cal, token_mock)
    }

    fn new_event() -> NewEvent {
        let start = Toronto.with_ymd_and_hms(2027, 2, 19, 11, 0, 0).unwrap();
        NewEvent {
            summary: "Consultation: Ada".to_string(),
            description: "Booked through the website.".to_string(),
            start,
            end: start + chrono::Duration::minutes(60),
            attendees: vec![Attendee {
                email: "ada@example.com".to_string(),
                display_name: Some("Ada".to_string()),
            }],
            reminders: vec![Reminder::Email(1440), Reminder::Popup(60)],
            request_meeting_link: true,
        }
    }

    #[tokio::test]
    async fn test_query_free_busy() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", "/calendar/v3/freeBusy")
            .match_header("authorization", "Bearer ya29.test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "timeMin": "2027-02-19T05:00:00Z",
                "timeMax": "2027-02-20T04:59:59Z",
                "timeZone": "America/Toronto",
                "items": [{"id": "studio@example.com"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "kind": "calendar#freeBusy",
                    "calendars": {
                        "studio@example.com": {
                            "busy": [
                                {"start": "2027-02-19T11:00:00-05:00", "end": "2027-02-19T12:00:00-05:00"}
                            ]
                        }
                    }
                }"#,
            )
            .create_async()
            .await;

        let busy = cal
            .query_free_busy(
                Utc.with_ymd_and_hms(2027, 2, 19, 5, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2027, 2, 20, 4, 59, 59).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            busy,
            vec![BusyInterval::new(
                Utc.with_ymd_and_hms(2027, 2, 19, 16, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2027, 2, 19, 17, 0, 0).unwrap(),
            )]
        );
    }

    #[tokio::test]
    async fn test_query_free_busy_calendar_error() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", "/calendar/v3/freeBusy")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"calendars": {"studio@example.com": {"errors": [{"domain": "global", "reason": "notFound"}], "busy": []}}}"#,
            )
            .create_async()
            .await;

        let now = Utc::now();
        let err = cal.free_busy(now, now).await.unwrap_err();
        assert!(matches!(err, CalendarError::Upstream(_)));
        assert!(err.to_string().contains("notFound"));
    }

    #[tokio::test]
    async fn test_query_free_busy_http_error() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", "/calendar/v3/freeBusy")
            .with_status(503)
            .with_body("backend error")
            .create_async()
            .await;

        let now = Utc::now();
        assert!(cal.free_busy(now, now).await.is_err());
    }

    #[tokio::test]
    async fn test_create_event() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", events_path())
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("conferenceDataVersion".into(), "1".into()),
                Matcher::UrlEncoded("sendUpdates".into(), "all".into()),
            ]))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "summary": "Consultation: Ada",
                "start": {"dateTime": "2027-02-19T11:00:00-05:00", "timeZone": "America/Toronto"},
                "end": {"dateTime": "2027-02-19T12:00:00-05:00", "timeZone": "America/Toronto"},
                "attendees": [{"email": "ada@example.com", "displayName": "Ada"}],
                "conferenceData": {"createRequest": {"conferenceSolutionKey": {"type": "hangoutsMeet"}}},
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        {"method": "email", "minutes": 1440},
                        {"method": "popup", "minutes": 60}
                    ]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "evt_123",
                    "htmlLink": "https://www.google.com/calendar/event?eid=abc",
                    "conferenceData": {
                        "entryPoints": [
                            {"entryPointType": "phone", "uri": "tel:+1-555-0100"},
                            {"entryPointType": "video", "uri": "https://meet.google.com/abc-defg-hij"}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let created = cal.insert_event(new_event()).await.unwrap();
        assert_eq!(created.id, "evt_123");
        assert_eq!(
            created.meeting_link.as_deref(),
            Some("https://meet.google.com/abc-defg-hij")
        );
        assert_eq!(
            created.html_link.as_deref(),
            Some("https://www.google.com/calendar/event?eid=abc")
        );
    }

    #[tokio::test]
    async fn test_create_event_without_meet_link() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", events_path())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "evt_456"}"#)
            .create_async()
            .await;

        let created = cal.insert_event(new_event()).await.unwrap();
        assert_eq!(created.id, "evt_456");
        assert!(created.meeting_link.is_none());
        assert!(created.html_link.is_none());
    }

    #[tokio::test]
    async fn test_create_event_failure() {
        let mut server = mockito::Server::new_async().await;
        let (cal, _token) = calendar(&mut server).await;
        let _mock = server
            .mock("POST", events_path())
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"message": "Forbidden"}}"#)
            .create_async()
            .await;

        let err = cal.insert_event(new_event()).await.unwrap_err();
        assert!(matches!(err, CalendarError::Upstream(_)));
    }

    #[test]
    fn test_hangout_link_preferred() {
        let resp: EventResponse = serde_json::from_str(
            r#"{"id": "e", "hangoutLink": "https://meet.google.com/top", "conferenceData": {"entryPoints": [{"entryPointType": "video", "uri": "https://meet.google.com/nested"}]}}"#,
        )
        .unwrap();
        assert_eq!(resp.meeting_link().as_deref(), Some("https://meet.google.com/top"));
    }
}
