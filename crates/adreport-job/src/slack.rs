//! Slack file-upload delivery

use crate::config::SlackConfig;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{error, info, warn};

const UPLOAD_URL: &str = "https://slack.com/api/files.upload";

pub const EXCEL_TITLE: &str = "Marketing Report (Excel)";
pub const CHART_TITLE: &str = "Report Chart (PDF)";

// outcome of the notification stage, delivery is best-effort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,    // both files reached the channel
    Skipped, // credentials absent, nothing attempted
    Failed,  // at least one upload failed, logged but not fatal
}

impl NotifyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

// Slack API response envelope
#[derive(Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

// Slack client for posting report files
pub struct SlackClient {
    client: Client,
    // token and channel, None when either is missing from the environment
    auth: Option<(String, String)>,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Self {
        let auth = match (&config.token, &config.channel) {
            (Some(token), Some(channel)) => Some((token.clone(), channel.clone())),
            _ => None,
        };
        Self {
            client: Client::new(),
            auth,
        }
    }

    /// Upload the spreadsheet and the chart PDF to the configured channel
    /// as two separate attachments. Missing credentials skip silently, and
    /// upload errors are logged without failing the job.
    pub async fn send_report(&self, excel_path: &Path, pdf_path: &Path) -> NotifyOutcome {
        let Some((token, channel)) = &self.auth else {
            warn!("slack token/channel not configured, skipping upload");
            return NotifyOutcome::Skipped;
        };

        let mut failed = false;
        for (path, title) in [(excel_path, EXCEL_TITLE), (pdf_path, CHART_TITLE)] {
            if let Err(e) = self.upload_file(token, channel, path, title).await {
                error!(file = %path.display(), error = %e, "slack upload failed");
                failed = true;
            }
        }

        if failed {
            NotifyOutcome::Failed
        } else {
            info!(channel = %channel, "report sent to slack");
            NotifyOutcome::Sent
        }
    }

    // one files.upload call per attachment
    async fn upload_file(
        &self,
        token: &str,
        channel: &str,
        path: &Path,
        title: &str,
    ) -> Result<(), Box<dyn Error>> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let bytes = tokio::fs::read(path).await?;

        let form = Form::new()
            .text("channels", channel.to_string())
            .text("title", title.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(format!("slack API returned HTTP {}", response.status()).into());
        }

        // Slack reports application errors inside a 200 body
        let body: SlackResponse = response.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(format!(
                "slack API error: {}",
                body.error.unwrap_or_else(|| "unknown".to_string())
            )
            .into())
        }
    }
}
