//! REST client for the public monitor API.
//!
//! ## Endpoints
//!
//! - `GET  /api/monitors` - all public monitors
//! - `GET  /api/monitors/{id}` - aggregate detail of one monitor
//! - `GET  /api/monitors/{id}/agents` - latest observation per agent
//! - `GET  /api/monitors/{id}/history?range=1d` - labeled time-series
//! - `POST /api/login` - exchange credentials for a bearer token
//!
//! ## Example
//!
//! ```rust,no_run
//! use probewatch_client::{ApiClient, MonitorApi};
//! use probewatch_types::TimeRange;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .build()?;
//!
//!     let history = client.history("monitor-1", TimeRange::OneDay).await?;
//!     for series in history.response_time_series() {
//!         println!("{:?}: {} points", series.agent_id(), series.data.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use probewatch_types::{AgentMonitorStat, MetricsResponse, PublicMonitor, TimeRange};

use crate::session::{Session, UserInfo};
use crate::{ClientError, MonitorApi};

/// Client for the monitor API.
///
/// Cheap to clone; clones share the connection pool and the [`Session`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
    session: Session,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL every path is joined onto.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The session whose token is attached to requests.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a token and store it in the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserInfo, ClientError> {
        let url = format!("{}/api/login", self.endpoint);
        debug!(%url, username, "logging in");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Auth("Invalid credentials".to_string()));
        }
        let response = check_status(response, "/api/login")?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let user = body.user.clone().unwrap_or_default();
        self.session.establish(body.token, body.user);
        Ok(user)
    }

    /// Drop the session token. Subsequent requests are anonymous.
    pub fn logout(&self) {
        self.session.clear();
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, ?query, "GET");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.authorized(request).send().await?;
        let response = check_status(response, path)?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MonitorApi for ApiClient {
    async fn list_monitors(&self) -> Result<Vec<PublicMonitor>, ClientError> {
        let monitors: Option<Vec<PublicMonitor>> = self.get_json("/api/monitors", &[]).await?;
        Ok(monitors.unwrap_or_default())
    }

    async fn monitor(&self, id: &str) -> Result<PublicMonitor, ClientError> {
        let path = format!("/api/monitors/{}", monitor_segment(id)?);
        self.get_json(&path, &[]).await
    }

    async fn agent_stats(&self, id: &str) -> Result<Vec<AgentMonitorStat>, ClientError> {
        let path = format!("/api/monitors/{}/agents", monitor_segment(id)?);
        let stats: Option<Vec<AgentMonitorStat>> = self.get_json(&path, &[]).await?;
        Ok(stats.unwrap_or_default())
    }

    async fn history(&self, id: &str, range: TimeRange) -> Result<MetricsResponse, ClientError> {
        let path = format!("/api/monitors/{}/history", monitor_segment(id)?);
        self.get_json(&path, &[("range", range.as_str())]).await
    }
}

/// Map error statuses onto [`ClientError`] variants.
fn check_status(response: Response, path: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ClientError::Auth(format!("API returned status {}", status)))
        }
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
        _ => Err(ClientError::Http(format!("API returned status {}", status))),
    }
}

/// Validate and encode a monitor id for use as a path segment.
fn monitor_segment(id: &str) -> Result<String, ClientError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::MissingId);
    }
    Ok(encode_path_segment(id))
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    session: Option<Session>,
}

impl ApiClientBuilder {
    /// Set the API base URL (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an existing session instead of an anonymous one.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(ApiClient {
            client,
            endpoint,
            session: self.session.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<UserInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use probewatch_types::MonitorStatus;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::builder().endpoint(server.url()).build().unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = ApiClient::builder().build().unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080");
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = ApiClient::builder()
            .endpoint("http://monitor.local:9000/")
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "http://monitor.local:9000");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("simple-id_1.2~"), "simple-id_1.2~");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("a b?"), "a%20b%3F");
        assert_eq!(encode_path_segment("é"), "%C3%A9");
    }

    #[tokio::test]
    async fn test_missing_id_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(client.monitor("").await, Err(ClientError::MissingId)));
        assert!(matches!(client.agent_stats("  ").await, Err(ClientError::MissingId)));
        assert!(matches!(
            client.history("", TimeRange::OneDay).await,
            Err(ClientError::MissingId)
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_monitor_detail() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/monitors/m1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"m1","name":"Homepage","type":"http","status":"down"}"#)
            .create_async()
            .await;

        let monitor = client_for(&server).monitor("m1").await.unwrap();
        assert_eq!(monitor.name, "Homepage");
        assert_eq!(monitor.status, MonitorStatus::Down);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_history_sends_range() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/monitors/m1/history")
            .match_query(Matcher::UrlEncoded("range".into(), "6h".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"series":[{"name":"response_time","labels":{"agent_id":"a1"},"data":[{"timestamp":1,"value":2.0}]}]}"#,
            )
            .create_async()
            .await;

        let history = client_for(&server)
            .history("m1", TimeRange::SixHours)
            .await
            .unwrap();
        assert_eq!(history.series.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_history_accepts_backend_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/monitors/m1/history")
            .match_query(Matcher::UrlEncoded("range".into(), "1d".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"agentId":"","type":"monitor","range":"1700000000000-1700086400000","series":[{"name":"response_time","labels":{"agent_id":"a1"},"data":[{"timestamp":1700000000000,"value":42.0}]},{"name":"response_time","labels":{"agent_id":"a2"},"data":null}]}"#,
            )
            .create_async()
            .await;

        let history = client_for(&server)
            .history("m1", TimeRange::OneDay)
            .await
            .unwrap();
        assert_eq!(history.range, "1700000000000-1700086400000");
        assert_eq!(history.series.len(), 2);
        assert!(history.series[1].data.is_empty());
    }

    #[tokio::test]
    async fn test_history_with_null_series_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/monitors/m1/history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"agentId":"","type":"monitor","range":"1-2","series":null}"#)
            .create_async()
            .await;

        let history = client_for(&server)
            .history("m1", TimeRange::OneHour)
            .await
            .unwrap();
        assert!(history.series.is_empty());
    }

    #[tokio::test]
    async fn test_null_agent_list_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/monitors/m1/agents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let stats = client_for(&server).agent_stats("m1").await.unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_and_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/monitors/missing")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/api/monitors")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.monitor("missing").await,
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(client.list_monitors().await, Err(ClientError::Http(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/monitors")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client_for(&server).list_monitors().await;
        assert!(matches!(result, Err(ClientError::Parse(_))));
    }

    #[tokio::test]
    async fn test_login_attaches_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .match_body(Matcher::Json(serde_json::json!({
                "username": "admin",
                "password": "secret"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"tok-123","user":{"id":"u1","username":"admin"}}"#)
            .create_async()
            .await;
        let authed = server
            .mock("GET", "/api/monitors")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        let user = client.login("admin", "secret").await.unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(client.session().token().as_deref(), Some("tok-123"));

        client.list_monitors().await.unwrap();
        authed.assert_async().await;

        client.logout();
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.login("admin", "wrong").await;
        assert!(matches!(result, Err(ClientError::Auth(_))));
        assert!(!client.session().is_authenticated());
    }
}
