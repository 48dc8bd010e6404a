//! Best-effort side channels for form submissions. Nothing in here is
//! allowed to fail a user facing request: errors are logged and dropped.

pub mod email;
pub mod models;
pub mod sheet;
pub mod templates;
pub use email::EmailSink;
pub use models::*;
pub use sheet::SheetSink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::core::AppConfig;
use crate::google::GoogleAuth;

#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn record(&self, submission: &Submission) -> Result<(), Error>;
}

/// Run every sink concurrently and wait for all of them. Returns the
/// number of sinks that failed.
pub async fn dispatch(sinks: Vec<Arc<dyn Sink>>, submission: Submission) -> usize {
    let submission = Arc::new(submission);
    let mut tasks = tokio::task::JoinSet::new();
    for sink in sinks {
        let submission = Arc::clone(&submission);
        tasks.spawn(async move { (sink.name(), sink.record(&submission).await) });
    }

    let mut failures = 0;
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok((name, Ok(()))) => {
                tracing::debug!("Recorded {} submission with {} sink", submission.kind(), name)
            }
            Ok((name, Err(err))) => {
                failures += 1;
                tracing::warn!(
                    "Failed to record {} submission from {} with {} sink: {}",
                    submission.kind(),
                    submission.submitter(),
                    name,
                    err
                );
            }
            Err(err) => {
                failures += 1;
                tracing::error!("Sink task panicked: {}", err);
            }
        }
    }
    failures
}

#[derive(Clone, Default)]
pub struct Notifier {
    sinks: Vec<Arc<dyn Sink>>,
}

impl Notifier {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Sinks are enabled individually by whichever settings are present.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

        if let (Some(api_key), Some(from), Some(to)) = (
            config.email_api_key.as_deref(),
            config.email_from.as_deref(),
            config.notify_email.as_deref(),
        ) {
            sinks.push(Arc::new(EmailSink::new(
                client.clone(),
                &config.email_api_url,
                api_key,
                from,
                to,
            )));
        } else {
            tracing::info!("Email notifications disabled");
        }

        if let (Some(credentials), Some(spreadsheet_id)) = (
            config.google_credentials.clone(),
            config.spreadsheet_id.as_deref(),
        ) {
            let auth = GoogleAuth::new(&config.google_token_url, credentials);
            sinks.push(Arc::new(SheetSink::new(
                client,
                &config.google_sheets_api_url,
                auth,
                spreadsheet_id,
                &config.spreadsheet_range,
            )));
        } else {
            tracing::info!("Spreadsheet recording disabled");
        }

        Ok(Self { sinks })
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub async fn dispatch(&self, submission: Submission) -> usize {
        dispatch(self.sinks.clone(), submission).await
    }

    /// Fire and forget. The caller never waits on the sinks.
    pub fn notify(&self, submission: Submission) {
        if self.sinks.is_empty() {
            tracing::debug!("No sinks configured, dropping {} submission", submission.kind());
            return;
        }
        tokio::spawn(dispatch(self.sinks.clone(), submission));
    }
}
