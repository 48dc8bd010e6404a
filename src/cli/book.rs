//! Terminal booking client. Walks the same steps as the booking form on
//! the site against a running server.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use itertools::Itertools;
use reqwest::Client;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::public::ErrorResponse;
use crate::api::public::availability::AvailabilityResponse;
use crate::api::public::booking::BookingResponse;
use crate::core::AppConfig;
use crate::scheduling::flow::{ChosenSlot, Confirmed, ContactDetails, FlowEvent, FlowState};
use crate::scheduling::time::local_today;

/// How many upcoming business days to offer
const DAYS_OFFERED: usize = 10;

/// Upcoming weekdays after `today`, formatted the way the API expects
/// them.
pub fn upcoming_dates(today: NaiveDate, count: usize) -> Vec<String> {
    (1..)
        .map(|offset| today + Duration::days(offset))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .map(|d| d.format("%A, %B %-d").to_string())
        .collect()
}

pub struct BookingClient {
    client: Client,
    api_url: String,
}

impl BookingClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let resp = self
            .client
            .post(format!("{}/api/{}", self.api_url, path))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = match resp.json::<ErrorResponse>().await {
                Ok(err) => err.error,
                Err(_) => format!("Request failed with status {}", status),
            };
            return Err(anyhow!(message));
        }
        Ok(resp.json::<T>().await?)
    }

    pub async fn submit_contact(&self, contact: &ContactDetails) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                "contact",
                json!({
                    "name": contact.name,
                    "email": contact.email,
                    "company": contact.company,
                    "message": contact.message,
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn availability(&self, date: &str) -> Result<Vec<String>> {
        let resp: AvailabilityResponse = self.post("availability", json!({ "date": date })).await?;
        Ok(resp.available_slots)
    }

    pub async fn book(
        &self,
        contact: &ContactDetails,
        slot: &ChosenSlot,
        request_token: &str,
    ) -> Result<Confirmed> {
        let resp: BookingResponse = self
            .post(
                "booking",
                json!({
                    "name": contact.name,
                    "email": contact.email,
                    "company": contact.company,
                    "message": contact.message,
                    "selectedDate": slot.date,
                    "selectedTime": slot.time,
                    "requestToken": request_token,
                }),
            )
            .await?;
        Ok(Confirmed {
            event_id: resp.event_id,
            meet_link: resp.meet_link,
            html_link: resp.html_link,
        })
    }
}

fn optional(line: String) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Pick an entry from a numbered list, or None if the input isn't one
/// of the numbers shown.
fn pick(options: &[String], input: &str) -> Option<String> {
    let n: usize = input.trim().parse().ok()?;
    options.get(n.checked_sub(1)?).cloned()
}

fn numbered(options: &[String]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("  {}. {}", i + 1, o))
        .join("\n")
}

pub async fn run(api_url: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let client = BookingClient::new(api_url);
    let config = AppConfig::default();
    // One token per attempt at a slot so a retry can't double book
    let mut request_token = uuid::Uuid::new_v4().to_string();
    let mut state = FlowState::CollectingContact;

    loop {
        let result = match state.clone() {
            FlowState::CollectingContact => {
                let contact = ContactDetails {
                    name: rl.readline("Name: ")?.trim().to_string(),
                    email: rl.readline("Email: ")?.trim().to_string(),
                    company: optional(rl.readline("Company (optional): ")?),
                    message: optional(rl.readline("What would you like to discuss? ")?),
                };
                match state.clone().next(FlowEvent::ContactSubmitted(contact.clone())) {
                    Ok(next) => match client.submit_contact(&contact).await {
                        Ok(()) => Ok(next),
                        Err(err) => {
                            println!("{}", err);
                            Ok(state.clone())
                        }
                    },
                    Err(err) => Err(err),
                }
            }
            FlowState::CollectingSlot { .. } => {
                let today = local_today(Utc::now(), config.timezone);
                let dates = upcoming_dates(today, DAYS_OFFERED);
                println!("Pick a day:\n{}", numbered(&dates));
                let Some(date) = pick(&dates, &rl.readline("> ")?) else {
                    println!("Enter one of the numbers above");
                    continue;
                };

                let offered = match client.availability(&date).await {
                    Ok(slots) => slots,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                };
                if offered.is_empty() {
                    println!("Nothing open on {}, try another day", date);
                    continue;
                }
                println!("Open times on {}:\n{}", date, numbered(&offered));
                let Some(time) = pick(&offered, &rl.readline("> ")?) else {
                    println!("Enter one of the numbers above");
                    continue;
                };
                request_token = uuid::Uuid::new_v4().to_string();
                state.clone().next(FlowEvent::SlotSelected {
                    slot: ChosenSlot { date, time },
                    offered,
                })
            }
            FlowState::Confirming { contact, slot } => {
                println!("Booking {} at {}...", slot.date, slot.time);
                let event = match client.book(&contact, &slot, &request_token).await {
                    Ok(confirmed) => FlowEvent::BookingSucceeded(confirmed),
                    Err(err) => FlowEvent::BookingFailed(err.to_string()),
                };
                state.clone().next(event)
            }
            FlowState::Confirmed {
                slot, confirmation, ..
            } => {
                println!("Booked for {} at {}.", slot.date, slot.time);
                if let Some(link) = &confirmation.meet_link {
                    println!("Meeting link: {}", link);
                }
                if let Some(link) = &confirmation.html_link {
                    println!("Calendar event: {}", link);
                }
                break;
            }
            FlowState::Failed { .. } => {
                if let Some(hint) = state.fallback_hint(&config.contact_email) {
                    println!("{}", hint);
                }
                let choice = match rl.readline("[r]etry, [p]ick another time, or [q]uit: ") {
                    Ok(line) => line.trim().to_lowercase(),
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                    Err(err) => return Err(err.into()),
                };
                match choice.as_str() {
                    "r" | "retry" => state.clone().next(FlowEvent::Retry),
                    "p" | "pick" => state.clone().next(FlowEvent::PickAnotherSlot),
                    "q" | "quit" => break,
                    _ => continue,
                }
            }
        };

        match result {
            Ok(next) => state = next,
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}
