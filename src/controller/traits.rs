// Service seam and UI sink trait definitions

use async_trait::async_trait;

use super::errors::ControllerError;
use super::models::{JobRequest, JobStatus, UiUpdate};

/// Client of the conversion service's two operations
#[async_trait]
pub trait ConversionApi: Send + Sync {
    /// Name of the backing transport (for logging)
    fn name(&self) -> &'static str;

    /// Ask the service to start a job; resolves to the job identifier
    async fn start_job(&self, request: &JobRequest) -> Result<String, ControllerError>;

    /// Query the current state of a job
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ControllerError>;

    /// Retrieval URL for a finished file. Only ever displayed; the
    /// controller never fetches it.
    fn file_url(&self, filename: &str) -> String;
}

/// Receiver of UI effects. The terminal front-end renders them; tests
/// record them.
pub trait StatusSink: Send + Sync {
    fn apply(&self, update: UiUpdate);
}
