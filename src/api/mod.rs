//! Wire types and HTTP client for the voice-memo server API

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{User, UserSettings};
