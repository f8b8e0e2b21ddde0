//! Configuration for the client core
//!
//! Provides centralized configuration for the API client and the playback
//! progress poll.

use std::time::Duration;

/// Configuration for the memovox client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the voice-memo server
    pub base_url: String,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Timeout for session endpoints (login, register, profile)
    pub request_timeout: Duration,

    /// Timeout for the audio generation endpoint; server-side synthesis can
    /// take considerably longer than the session calls
    pub generation_timeout: Duration,

    /// Interval of the playback progress poll
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            generation_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the session request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the generation request timeout
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the playback progress poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url is required".to_string());
        }
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than zero".to_string());
        }
        Ok(())
    }
}
