use std::env;

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Toronto;

/// OAuth client credentials plus the long lived refresh token used to
/// mint access tokens for the Calendar and Sheets APIs.
#[derive(Clone, Debug)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timezone: Tz,
    pub google_credentials: Option<GoogleCredentials>,
    pub calendar_id: Option<String>,
    pub google_api_url: String,
    pub google_sheets_api_url: String,
    pub google_token_url: String,
    pub spreadsheet_id: Option<String>,
    pub spreadsheet_range: String,
    pub email_api_url: String,
    pub email_api_key: Option<String>,
    pub email_from: Option<String>,
    pub notify_email: Option<String>,
    pub contact_email: String,
    pub static_dir: String,
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    /// Both the credentials and a calendar ID are needed before any
    /// calendar call can be attempted.
    pub fn calendar_configured(&self) -> bool {
        self.google_credentials.is_some() && self.calendar_id.is_some()
    }
}

// Empty values are treated the same as a missing variable so that a
// blank line in an env file doesn't count as configured.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timezone(value: Option<String>) -> Tz {
    match value {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid BOOKER_TIMEZONE '{}', falling back to {}",
                name,
                DEFAULT_TIMEZONE
            );
            DEFAULT_TIMEZONE
        }),
        None => DEFAULT_TIMEZONE,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let timezone = parse_timezone(optional_var("BOOKER_TIMEZONE"));
        let google_credentials = match (
            optional_var("BOOKER_GOOGLE_CLIENT_ID"),
            optional_var("BOOKER_GOOGLE_CLIENT_SECRET"),
            optional_var("BOOKER_GOOGLE_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(GoogleCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        };
        let calendar_id = optional_var("BOOKER_CALENDAR_ID");
        let google_api_url = optional_var("BOOKER_GOOGLE_API_URL")
            .unwrap_or_else(|| "https://www.googleapis.com".to_string());
        let google_sheets_api_url = optional_var("BOOKER_GOOGLE_SHEETS_API_URL")
            .unwrap_or_else(|| "https://sheets.googleapis.com".to_string());
        let google_token_url = optional_var("BOOKER_GOOGLE_TOKEN_URL")
            .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string());
        let spreadsheet_id = optional_var("BOOKER_SPREADSHEET_ID");
        let spreadsheet_range = optional_var("BOOKER_SPREADSHEET_RANGE")
            .unwrap_or_else(|| "Submissions!A:H".to_string());
        let email_api_url = optional_var("BOOKER_EMAIL_API_URL")
            .unwrap_or_else(|| "https://api.resend.com".to_string());
        let email_api_key = optional_var("BOOKER_EMAIL_API_KEY");
        let email_from = optional_var("BOOKER_EMAIL_FROM");
        let notify_email = optional_var("BOOKER_NOTIFY_EMAIL");
        let contact_email = optional_var("BOOKER_CONTACT_EMAIL")
            .unwrap_or_else(|| "hello@example.com".to_string());
        let static_dir = optional_var("BOOKER_STATIC_DIR").unwrap_or_else(|| "./public".to_string());
        let upstream_timeout_secs = optional_var("BOOKER_UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);

        Self {
            timezone,
            google_credentials,
            calendar_id,
            google_api_url,
            google_sheets_api_url,
            google_token_url,
            spreadsheet_id,
            spreadsheet_range,
            email_api_url,
            email_api_key,
            email_from,
            notify_email,
            contact_email,
            static_dir,
            upstream_timeout_secs,
        }
    }
}
