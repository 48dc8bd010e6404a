//! Record every submission as a spreadsheet row.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::Sink;
use super::models::Submission;
use crate::google::GoogleAuth;
use crate::google::sheets::append_row;

pub struct SheetSink {
    client: Client,
    api_url: String,
    auth: GoogleAuth,
    spreadsheet_id: String,
    range: String,
}

impl SheetSink {
    pub fn new(
        client: Client,
        api_url: &str,
        auth: GoogleAuth,
        spreadsheet_id: &str,
        range: &str,
    ) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            auth,
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
        }
    }
}

#[async_trait]
impl Sink for SheetSink {
    fn name(&self) -> &'static str {
        "sheet"
    }

    async fn record(&self, submission: &Submission) -> Result<()> {
        append_row(
            &self.client,
            &self.api_url,
            &self.auth,
            &self.spreadsheet_id,
            &self.range,
            &submission.row(),
        )
        .await
    }
}
