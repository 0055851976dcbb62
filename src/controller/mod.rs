// Download request controller - client-side glue for the conversion service

pub mod api;
pub mod errors;
pub mod models;
pub mod session;
pub mod traits;
pub mod utils;

pub use api::HttpConversionApi;
pub use errors::ControllerError;
pub use models::{
    ApiConfig, DownloadLink, JobRequest, JobStatus, MediaFormat, StartReply, StatusLevel, UiState,
    UiUpdate,
};
pub use session::{Controller, PollSession};
pub use traits::{ConversionApi, StatusSink};
