// Wire and UI models for the download request controller

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ControllerError;

/// Target conversion format offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp3,
    Mp4,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Mp4 => "mp4",
        }
    }

    /// Uppercase label for status messages
    pub fn label(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "MP3",
            MediaFormat::Mp4 => "MP4",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One conversion job request; built per submission, discarded after
#[derive(Debug, Clone, Serialize)]
pub struct JobRequest {
    pub url: String,
    pub format: MediaFormat,
}

/// Raw reply of the start operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartReply {
    pub success: bool,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StartReply {
    /// Resolve the reply into a job identifier or the reason it failed.
    /// An accepted reply without an identifier is a contract violation.
    pub fn into_job_id(self) -> Result<String, ControllerError> {
        if self.success {
            self.download_id.ok_or_else(|| {
                ControllerError::Protocol("accepted reply carries no download_id".to_string())
            })
        } else {
            Err(ControllerError::Rejected(
                self.message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}

/// Job state as reported by the status endpoint.
/// Tagged on the wire by the `status` field; each reply supersedes the
/// previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, work not started yet
    Pending,
    /// Backend is downloading and converting
    Downloading,
    /// Converted file is ready to fetch
    Complete {
        filename: String,
        #[serde(default)]
        size: Option<String>,
    },
    /// The job itself failed server-side
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

impl JobStatus {
    /// Complete or error; either ends the job's lifecycle client-side
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete { .. } | JobStatus::Error { .. })
    }
}

/// Connection settings for the conversion service
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service base URL
    pub base_url: String,
    /// SOCKS5/HTTP proxy URL (e.g. "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Delay between status queries in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            proxy: None,
            timeout_seconds: 30,
            poll_interval_ms: 3000,
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }
}

/// Semantic category of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Pending,
    Success,
    Error,
}

/// Download link revealed when a job completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Name the file should be saved as
    pub filename: String,
    /// Retrieval URL; never fetched by the controller itself
    pub href: String,
    /// Display label, filename plus size
    pub label: String,
}

/// One UI effect pushed through the status sink
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Replace the status message and its level
    Status { level: StatusLevel, message: String },
    /// Enable or disable the interactive controls
    ControlsEnabled(bool),
    /// Reveal the download link
    ShowLink(DownloadLink),
    /// Hide any previously shown link
    HideLink,
    /// Clear the URL input for the next submission
    ClearInput,
}

/// Snapshot of the visible surface; a pure fold over the update stream
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub status: String,
    pub level: StatusLevel,
    pub controls_enabled: bool,
    pub link: Option<DownloadLink>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: String::new(),
            level: StatusLevel::Info,
            controls_enabled: true,
            link: None,
        }
    }
}

impl UiState {
    pub fn apply(&mut self, update: &UiUpdate) {
        match update {
            UiUpdate::Status { level, message } => {
                self.level = *level;
                self.status = message.clone();
            }
            UiUpdate::ControlsEnabled(enabled) => self.controls_enabled = *enabled,
            UiUpdate::ShowLink(link) => self.link = Some(link.clone()),
            UiUpdate::HideLink => self.link = None,
            UiUpdate::ClearInput => {}
        }
    }
}
