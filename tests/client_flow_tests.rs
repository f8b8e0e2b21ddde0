//! Integration tests for the memovox client core
//!
//! These drive the public API end to end against a mock server: login,
//! generation with optimistic updates, the recording store, and playback
//! selection.

use memovox::api::ApiClient;
use memovox::generation::{
    GenerationClient, GenerationOrchestrator, RecordingStatus, RecordingStore,
    PENDING_DURATION_LABEL,
};
use memovox::playback::{PlaybackController, PlaybackPhase};
use memovox::session::{CredentialStore, FileCredentialStore, SessionManager};
use memovox::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn one_second_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for _ in 0..16_000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer.into_inner()
}

async fn wait_for(timeout: Duration, mut pred: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < timeout {
        if pred() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    pred()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_generate_and_select_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_id": 1,
            "username": "ada",
            "email": "ada@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate-audio-cloned"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(one_second_wav()))
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_base_url(server.uri());
    let api = ApiClient::new(&config);

    // Credential persistence goes through the real file store
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileCredentialStore::at(dir.path().join("credentials.toml")));

    let manager = SessionManager::new(api.clone(), store.clone());
    assert!(manager.login("ada@example.com", "pw").await);
    assert!(manager.is_authenticated());
    assert!(wait_for(Duration::from_secs(2), || manager.current_user().is_some()).await);

    // The persisted credential survives a fresh manager restore
    let manager2 = SessionManager::new(api.clone(), store.clone());
    manager2.restore();
    assert!(manager2.is_authenticated());

    // Generate one memo and pump updates into the recording list
    let orchestrator =
        GenerationOrchestrator::new(Arc::new(GenerationClient::new(api, store.clone())));
    let updates = orchestrator.update_receiver();
    let recordings = RecordingStore::new();

    let id = orchestrator.generate("Movies", "Inception").expect("accepted");

    let pending = updates.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(pending.duration_label, PENDING_DURATION_LABEL);
    assert!(recordings.apply(pending));
    assert_eq!(recordings.get(id).unwrap().status, RecordingStatus::Pending);

    let ready = updates.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(ready.id, id);
    assert!(recordings.apply(ready));

    let record = recordings.get(id).unwrap();
    assert_eq!(record.status, RecordingStatus::Ready);
    assert_eq!(record.duration_label, "00:01");
    assert!(record.has_audio());

    // Selecting the finished memo probes the clip for its real duration
    let mut playback = PlaybackController::new();
    playback.select(&record);
    let session = playback.session();
    assert_eq!(session.active, Some(id));
    assert_eq!(session.phase, PlaybackPhase::Selected);
    assert_eq!(session.total, Duration::from_secs(1));

    // Selecting another record leaves only that one active
    let other = orchestrator.generate("Stars", "Vega").expect("accepted");
    recordings.apply(updates.recv_timeout(Duration::from_secs(5)).unwrap());
    recordings.apply(updates.recv_timeout(Duration::from_secs(5)).unwrap());
    playback.select(&recordings.get(other).unwrap());
    assert_eq!(playback.session().active, Some(other));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_restore_purges_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "token expired"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileCredentialStore::at(dir.path().join("credentials.toml")));
    store.set("tok-stale").unwrap();

    let config = ClientConfig::default().with_base_url(server.uri());
    let manager = SessionManager::new(ApiClient::new(&config), store.clone());

    manager.restore();
    // Optimistic window: authenticated before the profile fetch resolves
    assert!(manager.is_authenticated());

    assert!(wait_for(Duration::from_secs(2), || !manager.is_authenticated()).await);
    assert_eq!(store.get().unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_generation_lands_in_store_with_error_label() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-audio-cloned"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(serde_json::json!({"error": "overloaded"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileCredentialStore::at(dir.path().join("credentials.toml")));
    store.set("tok").unwrap();

    let config = ClientConfig::default().with_base_url(server.uri());
    let orchestrator = GenerationOrchestrator::new(Arc::new(GenerationClient::new(
        ApiClient::new(&config),
        store,
    )));
    let updates = orchestrator.update_receiver();
    let recordings = RecordingStore::new();

    let id = orchestrator.generate("Movies", "Inception").expect("accepted");
    recordings.apply(updates.recv_timeout(Duration::from_secs(5)).unwrap());
    recordings.apply(updates.recv_timeout(Duration::from_secs(5)).unwrap());

    let record = recordings.get(id).unwrap();
    assert_eq!(record.status, RecordingStatus::Failed);
    assert_eq!(record.duration_label, "Error");
    assert!(record.title.contains("Movies"));
    assert!(record.title.contains("overloaded"));
}
