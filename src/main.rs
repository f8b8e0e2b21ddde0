use anyhow::Result;
use memovox::api::ApiClient;
use memovox::session::{FileCredentialStore, SessionManager};
use memovox::ClientConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Smoke entrypoint: restore the persisted session against the configured
/// server and report what the client sees.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memovox=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::var("MEMOVOX_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let config = ClientConfig::default().with_base_url(base_url);
    config.validate().map_err(anyhow::Error::msg)?;

    info!("Starting memovox client (server: {})", config.base_url);

    let store = Arc::new(FileCredentialStore::default_location()?);
    let manager = SessionManager::new(ApiClient::new(&config), store);
    manager.restore();

    // Give the background profile fetch a moment before reporting
    tokio::time::sleep(std::time::Duration::from_millis(750)).await;

    let session = manager.snapshot();
    if session.is_authenticated {
        match &session.current_user {
            Some(user) => info!("session active for {} <{}>", user.username, user.email),
            None => info!("session active, profile still pending"),
        }
    } else {
        info!("no active session; log in to generate voice memos");
    }

    Ok(())
}
