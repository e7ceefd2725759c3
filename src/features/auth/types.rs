//! Request and response types for auth API endpoints.
//!
//! Types carrying passwords or tokens implement `Debug` by hand so they never
//! end up in logs.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Serialize, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by login and signup.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
    pub reset_token: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("new_password", &"***")
            .field("reset_token", &"***")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_uses_mongo_id_and_camel_case() {
        let user: User = serde_json::from_value(json!({
            "_id": "65f1",
            "name": "Ada",
            "email": "ada@example.com",
            "createdAt": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, "65f1");
        assert_eq!(user.created_at.as_deref(), Some("2024-03-01T10:00:00.000Z"));
        assert!(user.updated_at.is_none());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], "65f1");
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn reset_password_request_is_camel_case() {
        let request = ResetPasswordRequest {
            new_password: "n3w-secret".to_string(),
            reset_token: "reset-123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"newPassword": "n3w-secret", "resetToken": "reset-123"})
        );
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let login = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let signup = SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let reset = ResetPasswordRequest {
            new_password: "hunter2".to_string(),
            reset_token: "reset-123".to_string(),
        };

        assert!(!format!("{login:?}").contains("hunter2"));
        assert!(!format!("{signup:?}").contains("hunter2"));
        let reset = format!("{reset:?}");
        assert!(!reset.contains("hunter2"));
        assert!(!reset.contains("reset-123"));
    }
}
