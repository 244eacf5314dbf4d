//! Research API client for backend communication.
//!
//! Wraps an [`HttpClient`] with the two endpoints the session needs:
//! `POST /research`, whose body is an SSE stream, and `GET /health`.

use std::sync::Arc;

use crate::error::{SessionError, SessionResult};
use crate::models::{HealthStatus, ResearchRequest};
use crate::sse::{records, RecordStream};
use crate::traits::{Headers, HttpClient, HttpError};

/// Upper bound on how much of an error body is read for its `detail`.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Client for the research backend.
///
/// Cheap to clone; clones share the underlying HTTP client.
pub struct ResearchClient<H: HttpClient> {
    /// Base URL without a trailing slash
    base_url: String,
    http: Arc<H>,
}

impl<H: HttpClient> Clone for ResearchClient<H> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> ResearchClient<H> {
    /// Create a client for `base_url`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>, http: H) -> Self {
        Self::with_shared(base_url, Arc::new(http))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_shared(base_url: impl Into<String>, http: Arc<H>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open the research stream.
    ///
    /// Sends `POST /research` and classifies the response head:
    /// non-success statuses become [`SessionError::HttpStatus`] with the
    /// backend's `detail`, a missing body becomes
    /// [`SessionError::NoResponseBody`]. On success the body is returned as
    /// a lazy stream of SSE records.
    pub async fn open_stream(&self, request: &ResearchRequest) -> SessionResult<RecordStream> {
        let url = format!("{}/research", self.base_url);
        let body = serde_json::to_string(request)
            .map_err(|e| SessionError::InvalidRequest(e.to_string()))?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(%url, depth = request.research_depth.as_u8(), "Opening research stream");
        let response = self.http.post_stream(&url, &body, &headers).await?;

        if !response.is_success() {
            let status = response.status;
            let body = match response.collect_body(ERROR_BODY_LIMIT).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(status, error = %e, "Could not read error response body");
                    Default::default()
                }
            };
            return Err(SessionError::from_status(status, &body));
        }

        match response.body {
            Some(body) => Ok(records(body)),
            None => Err(SessionError::NoResponseBody),
        }
    }

    /// Query `GET /health`.
    pub async fn health_check(&self) -> SessionResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url, &Headers::new()).await?;

        if !response.is_success() {
            return Err(SessionError::from_status(response.status, &response.body));
        }

        response.json::<HealthStatus>().map_err(|e| {
            SessionError::Transport(HttpError::Other(format!(
                "invalid health response: {}",
                e
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::ResearchDepth;
    use crate::sse::SseRecord;
    use futures::StreamExt;

    const RESEARCH_URL: &str = "http://localhost:8000/research";

    fn client(mock: &MockHttpClient) -> ResearchClient<MockHttpClient> {
        ResearchClient::new("http://localhost:8000/", mock.clone())
    }

    fn request() -> ResearchRequest {
        ResearchRequest::new("coffee subscriptions", ResearchDepth::Standard)
    }

    #[tokio::test]
    async fn test_open_stream_sends_request() {
        let mock = MockHttpClient::new();
        mock.set_response(RESEARCH_URL, MockResponse::sse(["event: complete\ndata: {}\n\n"]));

        let mut stream = client(&mock).open_stream(&request()).await.unwrap();
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            SseRecord::new("complete", "{}")
        );

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, RESEARCH_URL);
        assert_eq!(
            requests[0].headers.get("Accept").map(String::as_str),
            Some("text/event-stream")
        );
        assert_eq!(
            requests[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"topic": "coffee subscriptions", "research_depth": 1})
        );
    }

    #[tokio::test]
    async fn test_open_stream_error_status_uses_detail() {
        let mock = MockHttpClient::new();
        mock.set_response(
            RESEARCH_URL,
            MockResponse::status(500, r#"{"detail":"quota exceeded"}"#),
        );

        let err = client(&mock).open_stream(&request()).await.err().unwrap();
        assert_eq!(
            err,
            SessionError::HttpStatus {
                status: 500,
                message: "quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_open_stream_error_status_without_body() {
        let mock = MockHttpClient::new();
        mock.set_response(RESEARCH_URL, MockResponse::NoBody { status: 503 });

        let err = client(&mock).open_stream(&request()).await.err().unwrap();
        assert_eq!(err.user_message(), "HTTP error: 503");
    }

    #[tokio::test]
    async fn test_open_stream_missing_body() {
        let mock = MockHttpClient::new();
        mock.set_response(RESEARCH_URL, MockResponse::NoBody { status: 200 });

        let err = client(&mock).open_stream(&request()).await.err().unwrap();
        assert_eq!(err, SessionError::NoResponseBody);
    }

    #[tokio::test]
    async fn test_open_stream_connection_failure() {
        let mock = MockHttpClient::new();
        mock.set_response(
            RESEARCH_URL,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let err = client(&mock).open_stream(&request()).await.err().unwrap();
        assert_eq!(err.user_message(), "Connection failed: refused");
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://localhost:8000/health",
            MockResponse::status(200, r#"{"status":"healthy","model":"gemini-2.0-flash"}"#),
        );

        let health = client(&mock).health_check().await.unwrap();
        assert!(health.is_healthy());
    }

    #[tokio::test]
    async fn test_health_check_invalid_body() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://localhost:8000/health",
            MockResponse::status(200, "not json"),
        );

        let err = client(&mock).health_check().await.unwrap_err();
        assert!(err.user_message().contains("invalid health response"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let mock = MockHttpClient::new();
        assert_eq!(client(&mock).base_url(), "http://localhost:8000");
    }
}
