//! Authenticated audio generation requests

use crate::api::client::ApiClient;
use crate::error::{MemovoxError, Result};
use crate::session::credentials::CredentialStore;
use std::sync::Arc;
use tracing::debug;

/// Issues one authenticated generation request per call
///
/// No retries and no coalescing: every call is a single attempt whose
/// failure is visible to the caller.
pub struct GenerationClient {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
}

impl GenerationClient {
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self { api, store }
    }

    /// Request synthesized audio for `topic`/`value`
    ///
    /// The credential check happens before any network traffic; a missing
    /// credential fails with [`MemovoxError::NotAuthenticated`].
    pub async fn generate(&self, topic: &str, value: &str) -> Result<Vec<u8>> {
        let token = self.store.get()?.ok_or(MemovoxError::NotAuthenticated)?;
        debug!(topic, "requesting audio generation");
        self.api.generate_audio(&token, topic, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::credentials::MemoryCredentialStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_without_credential_skips_network() {
        let server = MockServer::start().await;
        let api = ApiClient::new(&ClientConfig::default().with_base_url(server.uri()));
        let client = GenerationClient::new(api, Arc::new(MemoryCredentialStore::new()));

        let err = client.generate("Movies", "Inception").await.unwrap_err();
        assert!(matches!(err, MemovoxError::NotAuthenticated));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-audio-cloned"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 128]))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new());
        store.set("tok").unwrap();
        let api = ApiClient::new(&ClientConfig::default().with_base_url(server.uri()));
        let client = GenerationClient::new(api, store);

        let bytes = client.generate("Movies", "Inception").await.expect("generate");
        assert_eq!(bytes.len(), 128);
    }

    #[tokio::test]
    async fn test_generate_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-audio-cloned"))
            .respond_with(
                ResponseTemplate::new(502)
                    .set_body_json(serde_json::json!({"error": "synthesis backend down"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new());
        store.set("tok").unwrap();
        let api = ApiClient::new(&ClientConfig::default().with_base_url(server.uri()));
        let client = GenerationClient::new(api, store);

        let err = client.generate("Movies", "Inception").await.unwrap_err();
        assert!(matches!(err, MemovoxError::ServerRejected(ref m) if m == "synthesis backend down"));
    }
}
