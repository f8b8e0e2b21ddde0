use serde::{Deserialize, Serialize};

/// Body of `POST /login`. The server keys the identifier as `email` even
/// when the user typed a username.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `POST /register`. Success is HTTP 201 with no useful body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub activation_code: String,
}

/// Body of `POST /reset-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub activation_code: String,
    pub new_password: String,
}

/// Body of `POST /generate-audio-cloned`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub value: String,
}

/// Structured failure body returned by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Logged-in user profile as served by `GET /me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<UserSettings>,
}

/// Per-user synthesis preferences, optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub language: String,
    pub voice_similarity: f32,
    pub stability: f32,
    pub add_background_sound: bool,
    pub background_volume: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_wire_shape() {
        let user: User = serde_json::from_str(
            r#"{"user_id": 7, "username": "ada", "email": "ada@example.com"}"#,
        )
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.username, "ada");
        assert!(user.settings.is_none());
    }

    #[test]
    fn test_user_decodes_settings() {
        let user: User = serde_json::from_str(
            r#"{
                "user_id": 1,
                "username": "ada",
                "email": "ada@example.com",
                "settings": {
                    "language": "en",
                    "voice_similarity": 0.8,
                    "stability": 0.5,
                    "add_background_sound": true,
                    "background_volume": 0.2,
                    "voice_ids": ["v1", "v2"]
                }
            }"#,
        )
        .unwrap();

        let settings = user.settings.unwrap();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.voice_ids.as_deref(), Some(&["v1".to_string(), "v2".to_string()][..]));
    }

    #[test]
    fn test_login_request_uses_email_field() {
        let body = serde_json::to_value(LoginRequest {
            email: "ada".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();

        assert!(body.get("email").is_some());
        assert!(body.get("identifier").is_none());
    }
}
