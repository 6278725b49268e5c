use crate::domain::{
    AuthGrant, CreatedTrip, LoginRequest, RegisterRequest, Trip, TripCreationRequest, TripId,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Attaches the bearer credential when one is present. A blank token is the
/// same as no token: the request goes out unauthenticated.
pub fn decorate(mut request: ApiRequest, token: Option<&str>) -> ApiRequest {
    request
        .headers
        .retain(|(key, _)| !key.eq_ignore_ascii_case(AUTHORIZATION));
    if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
        request
            .headers
            .push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
    }
    request
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One round trip, no retries, no caching.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let result = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(&url).header("Accept", "application/json");
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = self.agent.post(&url).header("Accept", "application/json");
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|error| TransportError(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|error| TransportError(error.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct HttpError {
    /// `None` when no response arrived at all.
    pub status: Option<u16>,
    pub message: String,
    /// The `message` field of the server's error body, when it sent one.
    pub server_message: Option<String>,
}

impl HttpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            server_message: None,
        }
    }

    fn from_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty());
        Self {
            status: Some(status),
            message: server_message
                .clone()
                .unwrap_or_else(|| format!("HTTP {status}")),
            server_message,
        }
    }

    fn decode(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            server_message: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `{ success, message, data, timestamp }` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn request(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse, HttpError> {
        let request = decorate(request, token);
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            authenticated = request.header(AUTHORIZATION).is_some(),
            "dispatching request"
        );

        let response = self
            .transport
            .send(&request)
            .map_err(|error| HttpError::transport(error.to_string()))?;
        if response.status >= 400 {
            return Err(HttpError::from_status(response.status, &response.body));
        }
        Ok(response)
    }

    pub fn register(
        &self,
        body: &RegisterRequest,
        token: Option<&str>,
    ) -> Result<AuthGrant, HttpError> {
        self.post_data("/auth/register", body, token)
    }

    pub fn login(&self, body: &LoginRequest, token: Option<&str>) -> Result<AuthGrant, HttpError> {
        self.post_data("/auth/login", body, token)
    }

    pub fn create_trip(
        &self,
        body: &TripCreationRequest,
        token: Option<&str>,
    ) -> Result<CreatedTrip, HttpError> {
        self.post_data("/trips/plan", body, token)
    }

    pub fn get_trip(&self, trip_id: TripId, token: Option<&str>) -> Result<Trip, HttpError> {
        self.data(ApiRequest::get(format!("/trips/{trip_id}")), token)
    }

    pub fn get_my_trips(&self, token: Option<&str>) -> Result<Vec<Trip>, HttpError> {
        self.data(ApiRequest::get("/trips/my-trips"), token)
    }

    fn post_data<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<R, HttpError> {
        let body = serde_json::to_value(body)
            .map_err(|error| HttpError::transport(format!("failed to encode request: {error}")))?;
        self.data(ApiRequest::post(path, body), token)
    }

    fn data<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> Result<R, HttpError> {
        let response = self.request(request, token)?;
        let envelope: Envelope<R> = serde_json::from_str(&response.body).map_err(|error| {
            HttpError::decode(response.status, format!("invalid response body: {error}"))
        })?;
        envelope.data.ok_or_else(|| {
            HttpError::decode(
                response.status,
                envelope
                    .message
                    .unwrap_or_else(|| "response has no data".to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_trip;
    use crate::infra::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn decorate_adds_bearer_header() {
        let request = decorate(ApiRequest::get("/trips/my-trips"), Some("jwt"));
        assert_eq!(request.header("authorization"), Some("Bearer jwt"));
    }

    #[test]
    fn decorate_without_token_sends_no_credential() {
        assert_eq!(
            decorate(ApiRequest::get("/x"), None).header(AUTHORIZATION),
            None
        );
        assert_eq!(
            decorate(ApiRequest::get("/x"), Some("  ")).header(AUTHORIZATION),
            None
        );
    }

    #[test]
    fn decorate_replaces_stale_credential() {
        let mut request = ApiRequest::get("/x");
        request
            .headers
            .push((AUTHORIZATION.to_string(), "Bearer old".to_string()));

        let cleared = decorate(request.clone(), None);
        assert_eq!(cleared.header(AUTHORIZATION), None);

        let replaced = decorate(request, Some("new"));
        assert_eq!(replaced.header(AUTHORIZATION), Some("Bearer new"));
        assert_eq!(replaced.headers.len(), 1);
    }

    #[test]
    fn get_trip_unwraps_envelope_and_sends_token() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({
            "success": true,
            "message": "Trip retrieved successfully",
            "data": sample_trip(4, 1200.0, "DRAFT"),
            "timestamp": "2025-01-01T00:00:00"
        }));
        let client = ApiClient::new(transport.clone());

        let trip = client.get_trip(4, Some("jwt")).expect("trip");
        assert_eq!(trip.trip_id, 4);

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/trips/4");
        assert_eq!(sent[0].header(AUTHORIZATION), Some("Bearer jwt"));
    }

    #[test]
    fn error_status_carries_server_message() {
        let transport = ScriptedTransport::new();
        transport.push_status(400, json!({"success": false, "message": "Invalid dates"}));
        let client = ApiClient::new(transport);

        let error = client.get_my_trips(None).expect_err("should fail");
        assert_eq!(error.status, Some(400));
        assert_eq!(error.server_message.as_deref(), Some("Invalid dates"));
        assert_eq!(error.to_string(), "Invalid dates");
    }

    #[test]
    fn error_status_without_body_uses_status_line() {
        let transport = ScriptedTransport::new();
        transport.push_raw(500, "<html>oops</html>");
        let client = ApiClient::new(transport);

        let error = client.get_my_trips(None).expect_err("should fail");
        assert_eq!(error.status, Some(500));
        assert_eq!(error.server_message, None);
        assert_eq!(error.message, "HTTP 500");
    }

    #[test]
    fn transport_failure_has_no_status() {
        let transport = ScriptedTransport::new();
        transport.push_transport_error("connection refused");
        let client = ApiClient::new(transport);

        let error = client.get_my_trips(None).expect_err("should fail");
        assert_eq!(error.status, None);
        assert_eq!(error.message, "connection refused");
    }

    #[test]
    fn login_posts_credentials() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({
            "success": true,
            "data": {"token": "t", "userId": 1, "username": "u", "email": "u@x.io", "role": "USER"}
        }));
        let client = ApiClient::new(transport.clone());

        let grant = client
            .login(
                &LoginRequest {
                    email: "u@x.io".to_string(),
                    password: "secret".to_string(),
                },
                None,
            )
            .expect("login");
        assert_eq!(grant.user_id, 1);

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/auth/login");
        assert_eq!(
            sent[0].body,
            Some(json!({"email": "u@x.io", "password": "secret"}))
        );
    }

    #[test]
    fn missing_data_is_an_error() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({"success": true, "message": "nothing here", "data": null}));
        let client = ApiClient::new(transport);

        let error = client.get_trip(1, None).expect_err("should fail");
        assert_eq!(error.message, "nothing here");
    }
}
