// Input validation and display helpers

use lazy_static::lazy_static;
use regex::Regex;

/// Check that the input is a plausible video URL: an explicit http(s)
/// scheme followed by something. Anything else is rejected before any
/// network traffic happens.
pub fn is_http_url(input: &str) -> bool {
    lazy_static! {
        static ref SCHEME_RE: Regex = Regex::new(r"^https?://\S+$").unwrap();
    }
    SCHEME_RE.is_match(input)
}

/// Size string for display, with a fallback when the service omits it
pub fn size_label(size: Option<&str>) -> String {
    match size {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "unknown size".to_string(),
    }
}

/// Link label combining filename and size
pub fn link_label(filename: &str, size: &str) -> String {
    format!("Download {} ({})", filename, size)
}
