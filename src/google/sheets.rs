//! Append-only writes to a Google Sheets range.

use anyhow::Result;
use reqwest::Client;
use serde::Serialize;

use super::oauth::GoogleAuth;

#[derive(Debug, Serialize)]
struct ValueRange<'a> {
    values: Vec<&'a [String]>,
}

pub async fn append_row(
    client: &Client,
    api_url: &str,
    auth: &GoogleAuth,
    spreadsheet_id: &str,
    range: &str,
    row: &[String],
) -> Result<()> {
    let access_token = auth.access_token(client).await?;
    let url = format!(
        "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        api_url.trim_end_matches('/'),
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range)
    );
    let res = client
        .post(&url)
        .bearer_auth(access_token)
        .json(&ValueRange { values: vec![row] })
        .send()
        .await?;
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        anyhow::bail!("Sheet append failed: {} ({})", status, text);
    }
    Ok(())
}
