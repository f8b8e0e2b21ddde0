//! HTTP client for the voice-memo server

use crate::api::types::{
    ApiErrorBody, GenerateRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    TokenResponse, User,
};
use crate::config::ClientConfig;
use crate::error::{MemovoxError, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Client for the voice-memo server's HTTP API
///
/// One instance wraps one pooled `reqwest::Client`; the Session Manager and
/// the Generation Client share it by cloning.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    generation_timeout: Duration,
}

impl ApiClient {
    /// Create a client for the server named in `config`
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generation_timeout: config.generation_timeout,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to the error taxonomy: a parseable
    /// `{error}` body becomes `ServerRejected`, anything else is opaque.
    async fn rejection(response: reqwest::Response) -> MemovoxError {
        let status = response.status().as_u16();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => MemovoxError::ServerRejected(body.error),
            Err(_) => MemovoxError::ServerRejectedOpaque(status),
        }
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post(self.url("/login")).json(&body).send().await?;

        if response.status() == StatusCode::OK {
            Ok(response.json().await?)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Create an account; success is HTTP 201 and does not authenticate
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        activation_code: &str,
    ) -> Result<()> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            activation_code: activation_code.to_string(),
        };
        let response = self.client.post(self.url("/register")).json(&body).send().await?;

        if response.status() == StatusCode::CREATED {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Replace a forgotten password using an activation code
    pub async fn reset_password(
        &self,
        email: &str,
        activation_code: &str,
        new_password: &str,
    ) -> Result<()> {
        let body = ResetPasswordRequest {
            email: email.to_string(),
            activation_code: activation_code.to_string(),
            new_password: new_password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/reset-password"))
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Notify the server of a logout; any response status is accepted
    pub async fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        debug!(status = response.status().as_u16(), "logout notified");
        Ok(())
    }

    /// Fetch the authenticated user's profile
    pub async fn me(&self, token: &str) -> Result<User> {
        let response = self.client.get(self.url("/me")).bearer_auth(token).send().await?;

        if response.status() == StatusCode::OK {
            Ok(response.json().await?)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// Request synthesized audio; a 200 body is the raw audio bytes
    pub async fn generate_audio(&self, token: &str, topic: &str, value: &str) -> Result<Vec<u8>> {
        let body = GenerateRequest {
            topic: topic.to_string(),
            value: value.to_string(),
        };
        let response = self
            .client
            .post(self.url("/generate-audio-cloned"))
            .bearer_auth(token)
            .timeout(self.generation_timeout)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(Self::rejection(response).await)
        }
    }
}
