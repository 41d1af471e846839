//! HTTP side of the console: request building, response normalisation and
//! the [`ModerationApi`] implementation over any [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    api::ModerationApi,
    error::ApiError,
    models::{
        BlockedUser, DashboardStats, LoginRequest, Message, MessageKey, Report, ReportId,
        ReportStatus, UserId, UserIdentity,
    },
};

/// Budget for ordinary calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Budget for the `/test-connection` probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// Prefix of every moderation endpoint.
pub const ADMIN_API_PREFIX: &str = "/admin";

/// HTTP verbs used by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing call, independent of the HTTP stack that will carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Verb.
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    /// Query pairs, already filtered of absent values.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Time budget; the transport must fail with [`ApiError::Timeout`] once
    /// it is spent.
    pub timeout: Duration,
}

impl ApiRequest {
    /// Request with the default time budget.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Append a query pair; `None` values are skipped.
    pub fn query<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the time budget.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL under `base`, with the query string percent-encoded.
    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{}{}", base.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect::<Vec<_>>()
                .join("&");
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }
}

/// What a transport got back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Raw body; may be empty.
    pub body: String,
}

impl ApiResponse {
    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
    }
}

/// Successful body, either parsed JSON or the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// JSON body.
    Json(Value),
    /// Anything else, returned verbatim.
    Text(String),
}

impl ApiPayload {
    /// The JSON value, or [`ApiError::InvalidResponseShape`] for text.
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            ApiPayload::Json(value) => Ok(value),
            ApiPayload::Text(text) => Err(ApiError::InvalidResponseShape(format!(
                "expected JSON, got text: {}",
                crate::format::truncate(&text, 80)
            ))),
        }
    }
}

/// One HTTP exchange. Implementations attach credentials, enforce
/// [`ApiRequest::timeout`] and map stack failures onto
/// [`ApiError::Timeout`] / [`ApiError::NetworkUnreachable`]. They never
/// retry.
#[async_trait(?Send)]
pub trait Transport {
    /// Perform the exchange.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a raw response into a payload or a normalised error.
pub fn normalize_response(response: ApiResponse) -> Result<ApiPayload, ApiError> {
    if !response.is_success() {
        let payload = serde_json::from_str::<ErrorPayload>(&response.body).unwrap_or_default();
        let message = payload
            .message
            .or(payload.error)
            .filter(|message| !message.trim().is_empty());
        if response.status == 404 {
            return Err(ApiError::NotFound(message.unwrap_or_else(|| "Resource".to_string())));
        }
        return Err(ApiError::Http {
            status: response.status,
            message,
        });
    }

    if response.is_json() {
        match serde_json::from_str(&response.body) {
            Ok(value) => return Ok(ApiPayload::Json(value)),
            Err(err) => {
                tracing::warn!("response declared JSON but failed to parse: {err}");
            },
        }
    }
    Ok(ApiPayload::Text(response.body))
}

fn envelope<D: DeserializeOwned>(payload: ApiPayload, field: &str) -> Result<D, ApiError> {
    let mut value = payload.into_json()?;
    let inner = value
        .get_mut(field)
        .map(Value::take)
        .filter(|inner| !inner.is_null())
        .ok_or_else(|| ApiError::InvalidResponseShape(format!("missing `{field}` field")))?;
    serde_json::from_value(inner)
        .map_err(|err| ApiError::InvalidResponseShape(format!("bad `{field}` field: {err}")))
}

/// Time budgets applied by [`RemoteClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Budget for ordinary calls.
    pub request_timeout: Duration,
    /// Budget for the connectivity probe.
    pub probe_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// [`ModerationApi`] over an HTTP [`Transport`].
pub struct RemoteClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> RemoteClient<T> {
    /// Client with the default time budgets.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Client with explicit time budgets.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The configured budgets.
    pub fn config(&self) -> ClientConfig {
        self.config
    }

    /// Generic call: send, then normalise status and body.
    pub async fn call(&self, request: ApiRequest) -> Result<ApiPayload, ApiError> {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "api request");
        let path = request.path.clone();
        let response = self.transport.send(request).await.inspect_err(|err| {
            tracing::warn!(path = %path, "api request failed: {err}");
        })?;
        normalize_response(response)
    }

    fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest {
        ApiRequest::new(method, path).timeout(self.config.request_timeout)
    }

    fn admin(&self, method: Method, path: &str) -> ApiRequest {
        self.request(method, format!("{ADMIN_API_PREFIX}{path}"))
    }
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    #[serde(default)]
    authenticated: Option<bool>,
    #[serde(default)]
    user: Option<UserIdentity>,
}

fn session_envelope(payload: ApiPayload) -> Result<SessionEnvelope, ApiError> {
    serde_json::from_value(payload.into_json()?)
        .map_err(|err| ApiError::InvalidResponseShape(format!("bad session payload: {err}")))
}

#[async_trait(?Send)]
impl<T: Transport> ModerationApi for RemoteClient<T> {
    async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, ApiError> {
        let body = serde_json::to_value(request)
            .map_err(|err| ApiError::Validation(format!("cannot encode login request: {err}")))?;
        let payload = self
            .call(self.request(Method::Post, "/auth/login").json(body))
            .await?;
        session_envelope(payload)?.user.ok_or_else(|| {
            ApiError::InvalidResponseShape("Login failed: Invalid response from server".to_string())
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.call(self.request(Method::Post, "/auth/logout"))
            .await
            .map(|_| ())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, ApiError> {
        let payload = self.call(self.request(Method::Get, "/auth/me")).await?;
        let envelope = session_envelope(payload)?;
        if envelope.authenticated == Some(false) {
            return Ok(None);
        }
        Ok(envelope.user)
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, ApiError> {
        let request = self
            .admin(Method::Get, "/reports")
            .query("status", status.map(ReportStatus::as_str));
        envelope(self.call(request).await?, "reports")
    }

    async fn update_report_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .admin(Method::Patch, &format!("/reports/{report_id}"))
            .json(json!({ "status": status }));
        self.call(request).await.map(|_| ())
    }

    async fn blocked_users(&self) -> Result<Vec<BlockedUser>, ApiError> {
        let payload = self.call(self.admin(Method::Get, "/blocked-users")).await?;
        match payload {
            ApiPayload::Json(Value::Array(rows)) => serde_json::from_value(Value::Array(rows))
                .map_err(|err| ApiError::InvalidResponseShape(format!("bad blocked users: {err}"))),
            other => envelope(other, "blocked_users"),
        }
    }

    async fn block_user(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), ApiError> {
        let request = self
            .admin(Method::Post, "/block-user")
            .json(json!({ "blocker_id": blocker_id, "blocked_id": blocked_id }));
        self.call(request).await.map(|_| ())
    }

    async fn unblock_user(&self, block_id: i64) -> Result<(), ApiError> {
        self.call(self.admin(Method::Delete, &format!("/unblock-user/{block_id}")))
            .await
            .map(|_| ())
    }

    async fn message_detail(&self, key: MessageKey) -> Result<Message, ApiError> {
        let path = format!("/message/{}/{}", key.message_type, key.message_id);
        let not_found = || ApiError::NotFound(format!("Message {key}"));
        let mut value = match self.call(self.admin(Method::Get, &path)).await {
            Ok(payload) => payload.into_json()?,
            Err(ApiError::NotFound(_)) => return Err(not_found()),
            Err(err) => return Err(err),
        };
        let message = value
            .get_mut("message")
            .map(Value::take)
            .filter(|inner| !inner.is_null())
            .ok_or_else(not_found)?;
        Message::from_json(key.message_type, message)
            .map_err(|err| ApiError::InvalidResponseShape(format!("bad message: {err}")))
    }

    async fn delete_message(&self, key: MessageKey) -> Result<(), ApiError> {
        let path = format!("/message/{}/{}", key.message_type, key.message_id);
        match self.call(self.admin(Method::Delete, &path)).await {
            Ok(_) => Ok(()),
            Err(ApiError::NotFound(_)) => Err(ApiError::NotFound(format!("Message {key}"))),
            Err(err) => Err(err),
        }
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        envelope(self.call(self.admin(Method::Get, "/dashboard-stats")).await?, "stats")
    }

    async fn test_connection(&self) -> Result<Value, ApiError> {
        let request = self
            .request(Method::Get, "/test-connection")
            .timeout(self.config.probe_timeout);
        self.call(request).await?.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }

    #[test]
    fn url_skips_absent_query_values() {
        let request = ApiRequest::new(Method::Get, "/admin/reports")
            .query("status", None::<&str>)
            .query("q", Some("a b&c"));
        assert_eq!(
            request.url("http://localhost:5000/api/"),
            "http://localhost:5000/api/admin/reports?q=a%20b%26c"
        );
    }

    #[test]
    fn error_payload_message_is_used() {
        let err = normalize_response(response(
            400,
            Some("application/json"),
            r#"{"message":"bad status"}"#,
        ))
        .expect_err("400 must fail");
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                message: Some("bad status".to_string())
            }
        );
    }

    #[test]
    fn error_without_body_is_generic_http_error() {
        let err = normalize_response(response(503, None, "")).expect_err("503 must fail");
        assert_eq!(
            err,
            ApiError::Http {
                status: 503,
                message: None
            }
        );
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = normalize_response(response(404, Some("text/html"), "<h1>nope</h1>"))
            .expect_err("404 must fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn non_json_success_returns_text() {
        let payload = normalize_response(response(200, Some("text/plain"), "pong"))
            .expect("200 text is fine");
        assert_eq!(payload, ApiPayload::Text("pong".to_string()));
        assert!(matches!(payload.into_json(), Err(ApiError::InvalidResponseShape(_))));
    }

    #[test]
    fn malformed_json_degrades_to_text() {
        let payload =
            normalize_response(response(200, Some("application/json; charset=utf-8"), "{oops"))
                .expect("malformed body is not a failure");
        assert_eq!(payload, ApiPayload::Text("{oops".to_string()));
    }

    #[test]
    fn envelope_reports_missing_field() {
        let payload = ApiPayload::Json(json!({ "items": [] }));
        let err = envelope::<Vec<Report>>(payload, "reports").expect_err("missing field");
        assert_eq!(err, ApiError::InvalidResponseShape("missing `reports` field".to_string()));
    }
}
