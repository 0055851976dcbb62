// Submission and poll-session logic

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::errors::ControllerError;
use super::models::{DownloadLink, JobRequest, JobStatus, MediaFormat, StatusLevel, UiUpdate};
use super::traits::{ConversionApi, StatusSink};
use super::utils;

/// The one live poll loop. Owned by the controller; replaced on
/// resubmission, and the underlying task dies with it.
pub struct PollSession {
    job_id: String,
    handle: JoinHandle<()>,
}

impl PollSession {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// What a single status query decided
enum PollOutcome {
    KeepWaiting,
    Finished,
}

/// Download request controller. At most one poll session is live at any
/// time; every UI effect flows through the sink.
pub struct Controller {
    api: Arc<dyn ConversionApi>,
    ui: Arc<dyn StatusSink>,
    poll_interval: Duration,
    active_poll: Option<PollSession>,
}

impl Controller {
    pub fn new(
        api: Arc<dyn ConversionApi>,
        ui: Arc<dyn StatusSink>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            ui,
            poll_interval,
            active_poll: None,
        }
    }

    /// Validate the input and ask the service to start a job. Every
    /// failure is rendered through the sink, never propagated; nothing
    /// is retried.
    pub async fn submit(&mut self, url: &str, format: MediaFormat) {
        let url = url.trim();
        if !utils::is_http_url(url) {
            self.status(
                StatusLevel::Error,
                "⚠️ Please enter a valid video URL.".to_string(),
            );
            return;
        }

        // One live poll session at most; release the old one first.
        self.cancel_active_poll();

        self.ui.apply(UiUpdate::HideLink);
        self.ui.apply(UiUpdate::ControlsEnabled(false));
        self.status(
            StatusLevel::Pending,
            format!("⏳ Starting {} download...", format.label()),
        );

        let request = JobRequest {
            url: url.to_string(),
            format,
        };
        match self.api.start_job(&request).await {
            Ok(job_id) => {
                info!("job {} accepted via {}", job_id, self.api.name());
                self.status(
                    StatusLevel::Pending,
                    "🚀 Download in progress... keep this window open!".to_string(),
                );
                self.active_poll = Some(self.spawn_poll(job_id));
            }
            Err(ControllerError::Rejected(message)) => {
                warn!("start rejected: {}", message);
                self.status(StatusLevel::Error, format!("❌ Failed to start: {}", message));
                self.ui.apply(UiUpdate::ControlsEnabled(true));
            }
            Err(err) => {
                warn!("start failed: {}", err);
                self.status(
                    StatusLevel::Error,
                    format!("🚨 Server connection error: {}", err),
                );
                self.ui.apply(UiUpdate::ControlsEnabled(true));
            }
        }
    }

    /// Block until the live poll session (if any) reaches a terminal
    /// state. Leaves the controller idle.
    pub async fn wait(&mut self) {
        if let Some(mut session) = self.active_poll.take() {
            let _ = (&mut session.handle).await;
        }
    }

    /// Identifier of the job currently being polled, if any
    pub fn active_job(&self) -> Option<&str> {
        self.active_poll.as_ref().map(|s| s.job_id())
    }

    fn cancel_active_poll(&mut self) {
        if let Some(session) = self.active_poll.take() {
            info!("cancelling poll session for job {}", session.job_id());
            drop(session);
        }
    }

    fn status(&self, level: StatusLevel, message: String) {
        self.ui.apply(UiUpdate::Status { level, message });
    }

    fn spawn_poll(&self, job_id: String) -> PollSession {
        let api = Arc::clone(&self.api);
        let ui = Arc::clone(&self.ui);
        let interval = self.poll_interval;
        let id = job_id.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match poll_once(api.as_ref(), ui.as_ref(), &id).await {
                    PollOutcome::KeepWaiting => {}
                    PollOutcome::Finished => break,
                }
            }
        });

        PollSession { job_id, handle }
    }
}

/// One status query, exhaustive over every reply the service can give
async fn poll_once(api: &dyn ConversionApi, ui: &dyn StatusSink, job_id: &str) -> PollOutcome {
    match api.job_status(job_id).await {
        // Not picked up yet; keep waiting silently
        Ok(JobStatus::Pending) => PollOutcome::KeepWaiting,

        Ok(JobStatus::Downloading) => {
            ui.apply(UiUpdate::Status {
                level: StatusLevel::Pending,
                message: "🔄 Downloading and converting... please wait.".to_string(),
            });
            PollOutcome::KeepWaiting
        }

        Ok(JobStatus::Complete { filename, size }) => {
            let size = utils::size_label(size.as_deref());
            info!("job {} complete: {} ({})", job_id, filename, size);

            ui.apply(UiUpdate::Status {
                level: StatusLevel::Success,
                message: format!("✅ Ready! ({})", size),
            });
            let href = api.file_url(&filename);
            let label = utils::link_label(&filename, &size);
            ui.apply(UiUpdate::ShowLink(DownloadLink {
                filename,
                href,
                label,
            }));
            ui.apply(UiUpdate::ControlsEnabled(true));
            ui.apply(UiUpdate::ClearInput);
            PollOutcome::Finished
        }

        Ok(JobStatus::Error { message }) => {
            let message = message.unwrap_or_else(|| "Unknown error".to_string());
            warn!("job {} failed: {}", job_id, message);

            ui.apply(UiUpdate::Status {
                level: StatusLevel::Error,
                message: format!("❌ ERROR: {}", message),
            });
            ui.apply(UiUpdate::ControlsEnabled(true));
            PollOutcome::Finished
        }

        Err(err) => {
            warn!("status query for job {} failed: {}", job_id, err);

            ui.apply(UiUpdate::Status {
                level: StatusLevel::Error,
                message: format!("🚨 Communication error: {}", err),
            });
            ui.apply(UiUpdate::ControlsEnabled(true));
            PollOutcome::Finished
        }
    }
}
