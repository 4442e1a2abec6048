//! Account endpoints.
//!
//! Login and registration store the issued token in the session; logout
//! clears it even when the backend call fails.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::error::ApiError;

const LOGIN_PATH: &str = "/api/auth/api/login/";
const REGISTER_PATH: &str = "/api/auth/api/register/";
const LOGOUT_PATH: &str = "/api/auth/api/logout/";
const PROFILE_PATH: &str = "/api/auth/api/profile/";
const STATS_PATH: &str = "/api/auth/stats/";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard counters. Soft-deleted properties and inactive locations
/// are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub properties: u64,
    #[serde(default)]
    pub bookings: u64,
    #[serde(default)]
    pub customers: u64,
    #[serde(default)]
    pub locations: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post_json(LOGIN_PATH, credentials).await?;
        self.session().set_token(response.token.clone());
        tracing::info!(username = %response.user.username, "Logged in");
        Ok(response)
    }

    pub async fn register(&self, registration: &Registration) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post_json(REGISTER_PATH, registration).await?;
        self.session().set_token(response.token.clone());
        tracing::info!(username = %response.user.username, "Registered");
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.request(Method::POST, LOGOUT_PATH) {
            Ok(builder) => self.send(builder).await.map(|_| ()),
            Err(e) => Err(e),
        };
        self.session().clear();
        result
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get_json(PROFILE_PATH).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json(STATS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_keeps_extra_user_fields() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "t0k", "user": {"id": 7, "username": "ana", "email": "a@x.io", "is_premium": true}}"#,
        )
        .unwrap();
        assert_eq!(response.token, "t0k");
        assert_eq!(response.user.email.as_deref(), Some("a@x.io"));
        assert_eq!(response.user.extra["is_premium"], Value::Bool(true));
    }

    #[test]
    fn test_stats_missing_counters_are_zero() {
        let stats: Stats = serde_json::from_str(r#"{"properties": 4, "bookings": 12}"#).unwrap();
        assert_eq!(stats.properties, 4);
        assert_eq!(stats.bookings, 12);
        assert_eq!(stats.customers, 0);
        assert_eq!(stats.locations, 0);
    }
}
