pub mod controller;

pub use controller::{
    ApiConfig, Controller, ControllerError, ConversionApi, DownloadLink, HttpConversionApi,
    JobRequest, JobStatus, MediaFormat, StartReply, StatusLevel, StatusSink, UiState, UiUpdate,
};
