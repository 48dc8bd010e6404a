//! Notification emails through a transactional email HTTP API.

use anyhow::Result;
use async_trait::async_trait;
use handlebars::Handlebars;
use reqwest::Client;
use serde::Serialize;

use super::Sink;
use super::models::Submission;
use super::templates::{Template, templates};

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

pub struct EmailSink {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
    to: String,
    templates: Handlebars<'static>,
}

impl EmailSink {
    pub fn new(client: Client, api_url: &str, api_key: &str, from: &str, to: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            templates: templates(),
        }
    }

    pub fn render(&self, submission: &Submission) -> Result<String> {
        let html = match submission {
            Submission::Contact(c) => self
                .templates
                .render(&Template::ContactEmail.to_string(), c)?,
            Submission::Testimonial(t) => self
                .templates
                .render(&Template::TestimonialEmail.to_string(), t)?,
            Submission::Booking(b) => self
                .templates
                .render(&Template::BookingEmail.to_string(), b)?,
        };
        Ok(html)
    }
}

#[async_trait]
impl Sink for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn record(&self, submission: &Submission) -> Result<()> {
        let reply_to = match submission {
            Submission::Contact(c) => Some(c.email.as_str()),
            Submission::Booking(b) => Some(b.email.as_str()),
            Submission::Testimonial(_) => None,
        };
        let body = SendEmailRequest {
            from: &self.from,
            to: vec![&self.to],
            subject: submission.subject(),
            html: self.render(submission)?,
            reply_to,
        };

        let res = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Email send failed: {} ({})", status, text);
        }
        Ok(())
    }
}
