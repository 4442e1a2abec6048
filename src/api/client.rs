//! HTTP plumbing shared by all endpoints.
//!
//! # Responsibilities
//! - Resolve endpoint paths against the configured base URL
//! - Attach `Authorization: Token …`, `X-CSRFToken` and `x-request-id`
//! - Turn non-success responses into [`ApiError::Status`]

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::context::Session;
use crate::error::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const CSRF_COOKIE: &str = "csrftoken";

const CSRF_PATH: &str = "/api/auth/csrf/";

/// REST client for the dashboard and CRM backends.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    cookies: Arc<Jar>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| ApiError::Unexpected(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_provider(cookies.clone())
            .build()
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            session,
            cookies,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path such as `/api/llm/chat/`.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Unexpected(format!("Invalid path '{}': {}", path, e)))
    }

    /// Start a request with session headers attached.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mutating = matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);

        let mut builder = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|e| ApiError::Unexpected(format!("Invalid auth token: {}", e)))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if mutating {
            if let Some(csrf) = self.session.csrf_token() {
                builder = builder.header(CSRF_HEADER, csrf);
            }
        }
        Ok(builder)
    }

    /// Send a request and fail on non-success statuses.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body_len = text.len(), "Backend returned error status");
        Err(ApiError::status(status.as_u16(), &text))
    }

    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?;
        self.send_json(builder).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send_json(builder).await
    }

    /// Fetch the CSRF cookie and remember its value. Failures are ignored.
    pub async fn ensure_csrf(&self) -> Option<String> {
        if let Ok(builder) = self.request(Method::GET, CSRF_PATH) {
            if let Err(e) = builder.send().await {
                tracing::debug!(error = %e, "CSRF cookie request failed");
            }
        }

        let header = self.cookies.cookies(&self.base_url)?;
        let token = parse_cookie(header.to_str().ok()?, CSRF_COOKIE)?;
        self.session.set_csrf_token(token.clone());
        Some(token)
    }
}

/// Value of cookie `name` in a `Cookie` header string.
pub fn parse_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base.into(),
            ..ApiConfig::default()
        };
        ApiClient::new(&config, Arc::new(Session::new())).unwrap()
    }

    #[test]
    fn test_url_joins_under_base_path() {
        let c = client("http://backend:8000/prefix");
        assert_eq!(
            c.url("/api/llm/chat/").unwrap().as_str(),
            "http://backend:8000/prefix/api/llm/chat/"
        );

        let c = client("http://backend:8000/");
        assert_eq!(c.url("api/tasks/").unwrap().as_str(), "http://backend:8000/api/tasks/");
    }

    #[test]
    fn test_bad_base_url() {
        let config = ApiConfig {
            base_url: "::nope".into(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config, Arc::new(Session::new())),
            Err(ApiError::Unexpected(_))
        ));
    }

    #[test]
    fn test_parse_cookie() {
        let header = "sessionid=s1; csrftoken=abc123; theme=dark";
        assert_eq!(parse_cookie(header, "csrftoken").as_deref(), Some("abc123"));
        assert_eq!(parse_cookie(header, "missing"), None);
        assert_eq!(parse_cookie("csrftoken=", "csrftoken"), None);
    }

    #[test]
    fn test_auth_and_csrf_headers() {
        let c = client("http://backend:8000");
        c.session().set_token("tok");
        c.session().set_csrf_token("csrf");

        let get = c.request(Method::GET, "/api/tasks/").unwrap().build().unwrap();
        assert_eq!(get.headers()[AUTHORIZATION], "Token tok");
        assert!(get.headers().get(CSRF_HEADER).is_none());
        assert!(get.headers().get(REQUEST_ID_HEADER).is_some());

        let post = c.request(Method::POST, "/api/tasks/").unwrap().build().unwrap();
        assert_eq!(post.headers()[CSRF_HEADER], "csrf");
    }
}
