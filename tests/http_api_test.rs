use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tubegrab::{
    ApiConfig, Controller, ConversionApi, HttpConversionApi, MediaFormat, StatusLevel, StatusSink,
    UiState, UiUpdate,
};

/// Scripted conversion service: one canned start reply, then a fixed
/// sequence of status replies (the last one repeats).
#[derive(Clone)]
struct FakeService {
    start_reply: Value,
    statuses: Arc<Mutex<Vec<Value>>>,
    started_bodies: Arc<Mutex<Vec<Value>>>,
    polled_ids: Arc<Mutex<Vec<String>>>,
}

impl FakeService {
    fn new(start_reply: Value, statuses: Vec<Value>) -> Self {
        Self {
            start_reply,
            statuses: Arc::new(Mutex::new(statuses)),
            started_bodies: Arc::new(Mutex::new(Vec::new())),
            polled_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn download_start(State(svc): State<FakeService>, Json(body): Json<Value>) -> Json<Value> {
    svc.started_bodies.lock().unwrap().push(body);
    Json(svc.start_reply.clone())
}

async fn download_status(
    State(svc): State<FakeService>,
    Path(id): Path<String>,
) -> Json<Value> {
    svc.polled_ids.lock().unwrap().push(id);
    let mut statuses = svc.statuses.lock().unwrap();
    let reply = if statuses.len() > 1 {
        statuses.remove(0)
    } else {
        statuses[0].clone()
    };
    Json(reply)
}

async fn start_server(service: FakeService) -> SocketAddr {
    let app = Router::new()
        .route("/download_start", post(download_start))
        .route("/download_status/:id", get(download_status))
        .with_state(service);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[derive(Default)]
struct RecordingUi {
    updates: Mutex<Vec<UiUpdate>>,
}

impl RecordingUi {
    fn state(&self) -> UiState {
        let mut state = UiState::default();
        for update in self.updates.lock().unwrap().iter() {
            state.apply(update);
        }
        state
    }
}

impl StatusSink for RecordingUi {
    fn apply(&self, update: UiUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

fn client_for(addr: SocketAddr) -> (Arc<HttpConversionApi>, ApiConfig) {
    let config = ApiConfig::default()
        .with_base_url(&format!("http://{}", addr))
        .with_timeout(5)
        .with_poll_interval_ms(20);
    let api = Arc::new(HttpConversionApi::new(&config).unwrap());
    (api, config)
}

#[tokio::test]
async fn test_full_job_lifecycle() {
    let service = FakeService::new(
        json!({"success": true, "download_id": "job-42"}),
        vec![
            json!({"status": "pending"}),
            json!({"status": "downloading"}),
            json!({"status": "complete", "filename": "clip.mp3", "size": "3.2MB"}),
        ],
    );
    let addr = start_server(service.clone()).await;
    let (api, config) = client_for(addr);

    let ui = Arc::new(RecordingUi::default());
    let mut controller = Controller::new(
        api,
        ui.clone(),
        Duration::from_millis(config.poll_interval_ms),
    );

    controller
        .submit("https://youtu.be/dQw4w9WgXcQ", MediaFormat::Mp3)
        .await;
    controller.wait().await;

    // The start body matches the documented contract
    let bodies = service.started_bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["url"], "https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(bodies[0]["format"], "mp3");

    // Every status query went to the returned identifier
    let ids = service.polled_ids.lock().unwrap().clone();
    assert!(ids.len() >= 3);
    assert!(ids.iter().all(|id| id == "job-42"));

    let state = ui.state();
    assert!(state.controls_enabled);
    assert!(state.status.contains("3.2MB"));
    let link = state.link.expect("link must be revealed");
    assert_eq!(link.filename, "clip.mp3");
    assert_eq!(link.href, format!("http://{}/get_file/clip.mp3", addr));
    assert!(link.label.contains("clip.mp3"));
    assert!(link.label.contains("3.2MB"));
}

#[tokio::test]
async fn test_rejected_start() {
    let service = FakeService::new(
        json!({"success": false, "message": "unsupported site"}),
        vec![json!({"status": "pending"})],
    );
    let addr = start_server(service.clone()).await;
    let (api, config) = client_for(addr);

    let ui = Arc::new(RecordingUi::default());
    let mut controller = Controller::new(
        api,
        ui.clone(),
        Duration::from_millis(config.poll_interval_ms),
    );

    controller
        .submit("https://youtu.be/dQw4w9WgXcQ", MediaFormat::Mp4)
        .await;
    controller.wait().await;

    let state = ui.state();
    assert!(state.status.contains("unsupported site"));
    assert!(state.controls_enabled);
    assert!(state.link.is_none());
    assert!(service.polled_ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_accepted_reply_without_id_is_an_error() {
    let service = FakeService::new(
        json!({"success": true}),
        vec![json!({"status": "pending"})],
    );
    let addr = start_server(service.clone()).await;
    let (api, config) = client_for(addr);

    let ui = Arc::new(RecordingUi::default());
    let mut controller = Controller::new(
        api,
        ui.clone(),
        Duration::from_millis(config.poll_interval_ms),
    );

    controller
        .submit("https://youtu.be/dQw4w9WgXcQ", MediaFormat::Mp3)
        .await;
    controller.wait().await;

    let state = ui.state();
    assert!(state.controls_enabled);
    assert!(state.status.contains("download_id"));
    assert!(service.polled_ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_surfaces_transport_error() {
    // Bind a port, then drop the listener so nothing answers there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (api, config) = client_for(addr);
    let ui = Arc::new(RecordingUi::default());
    let mut controller = Controller::new(
        api,
        ui.clone(),
        Duration::from_millis(config.poll_interval_ms),
    );

    controller
        .submit("https://youtu.be/dQw4w9WgXcQ", MediaFormat::Mp3)
        .await;

    let state = ui.state();
    assert_eq!(state.link, None);
    assert!(state.controls_enabled);
    assert_eq!(state.level, StatusLevel::Error);
}

#[tokio::test]
async fn test_file_url_pattern() {
    let config = ApiConfig::default().with_base_url("http://media.local:8000");
    let api = HttpConversionApi::new(&config).unwrap();
    assert_eq!(
        api.file_url("song.mp3"),
        "http://media.local:8000/get_file/song.mp3"
    );
}
