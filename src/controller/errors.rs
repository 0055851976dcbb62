// Error types for the download request controller

use std::fmt;

/// Everything that can end a submission attempt. Every variant is
/// terminal for the attempt: no retry, surface the message, back to idle.
#[derive(Debug, Clone)]
pub enum ControllerError {
    /// Input rejected locally; no network call was made
    InvalidUrl(String),

    /// The service declined to start the job
    Rejected(String),

    /// Network failure reaching the service
    Transport(String),

    /// Reply did not match the documented contract
    Protocol(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(input) => write!(f, "Invalid URL: {}", input),
            Self::Rejected(msg) => write!(f, "{}", msg),
            Self::Transport(msg) => write!(f, "{}", msg),
            Self::Protocol(msg) => write!(f, "Unexpected reply: {}", msg),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<reqwest::Error> for ControllerError {
    fn from(err: reqwest::Error) -> Self {
        // Classify: body decode means the exchange happened but the
        // contract didn't hold; everything else is transport.
        if err.is_decode() {
            return Self::Protocol(err.to_string());
        }
        if err.is_timeout() {
            return Self::Transport(format!("request timed out ({})", err));
        }
        Self::Transport(err.to_string())
    }
}
