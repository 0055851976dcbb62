// Terminal front-end for the download request controller

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use tubegrab::{
    ApiConfig, Controller, DownloadLink, HttpConversionApi, MediaFormat, StatusLevel, StatusSink,
    UiState, UiUpdate,
};

/// Renders controller updates as terminal lines and keeps the folded
/// surface snapshot around.
struct TerminalUi {
    state: Mutex<UiState>,
}

impl TerminalUi {
    fn new() -> Self {
        Self {
            state: Mutex::new(UiState::default()),
        }
    }
}

impl StatusSink for TerminalUi {
    fn apply(&self, update: UiUpdate) {
        match &update {
            UiUpdate::Status { level, message } => {
                let tag = match level {
                    StatusLevel::Info => "info",
                    StatusLevel::Pending => "....",
                    StatusLevel::Success => " ok ",
                    StatusLevel::Error => "FAIL",
                };
                println!("[{}] {}", tag, message);
            }
            UiUpdate::ShowLink(DownloadLink { href, label, .. }) => {
                println!("       {} -> {}", label, href);
            }
            // Nothing to draw; folded into the snapshot below
            UiUpdate::HideLink | UiUpdate::ControlsEnabled(_) | UiUpdate::ClearInput => {}
        }
        self.state.lock().unwrap().apply(&update);
    }
}

/// Read one trimmed line; None on EOF
fn prompt(text: &str) -> Option<String> {
    print!("{}", text);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubegrab=info".into()),
        )
        .init();

    // Allow overriding the service address (e.g. a deployed instance).
    // Example: export TUBEGRAB_SERVER="http://media.example.com:8000"
    let base_url = std::env::var("TUBEGRAB_SERVER")
        .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    let config = ApiConfig::default().with_base_url(&base_url);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);

    let api = match HttpConversionApi::new(&config) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            eprintln!("cannot set up HTTP client: {}", err);
            std::process::exit(1);
        }
    };
    let ui = Arc::new(TerminalUi::new());
    let mut controller = Controller::new(api, ui, poll_interval);

    info!("using conversion service at {}", base_url);
    println!("tubegrab - turn a video URL into an mp3/mp4 download link.");
    println!("(q to quit)");

    loop {
        let Some(url) = prompt("\nVideo URL> ") else { break };
        if url == "q" || url == "quit" {
            break;
        }

        let Some(choice) = prompt("Format [mp3/mp4]> ") else { break };
        let format = match choice.to_lowercase().as_str() {
            "mp3" => MediaFormat::Mp3,
            "mp4" => MediaFormat::Mp4,
            _ => {
                println!("[FAIL] Pick mp3 or mp4.");
                continue;
            }
        };

        controller.submit(&url, format).await;
        controller.wait().await;
    }
}
