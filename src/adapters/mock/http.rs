//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses, chunked body streams, or errors for testing purposes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, StreamingResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a complete response. On a streaming request the body is sent as one chunk.
    Success(Response),
    /// Fail before any response arrives
    Error(HttpError),
    /// Stream the chunks in order, then end
    Stream { status: u16, chunks: Vec<Bytes> },
    /// Stream the chunks, then fail with the error
    StreamWithError { chunks: Vec<Bytes>, error: HttpError },
    /// Stream the chunks, then never yield again
    Pending { chunks: Vec<Bytes> },
    /// Respond without a body
    NoBody { status: u16 },
}

impl MockResponse {
    /// A 200 stream made of string chunks.
    pub fn sse<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream {
            status: 200,
            chunks: chunks.into_iter().map(|c| Bytes::from(c.into())).collect(),
        }
    }

    /// A 200 stream that stays open after the given chunks.
    pub fn pending<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Pending {
            chunks: chunks.into_iter().map(|c| Bytes::from(c.into())).collect(),
        }
    }

    /// A non-streaming response with a status and body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

/// Mock HTTP client for testing.
///
/// This client can be configured to return specific responses for URLs,
/// allowing tests to verify HTTP interactions without network access.
///
/// # Example
///
/// ```ignore
/// use marketlens::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8000/research",
///     MockResponse::sse(["event: complete\ndata: {}\n\n"]),
/// );
///
/// let requests = client.get_requests();
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a specific URL.
    ///
    /// The URL is matched exactly first, then as a prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
    stream::iter(chunks.into_iter().map(Ok))
}

fn boxed<S>(body: S) -> Option<ByteStream>
where
    S: futures::Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
{
    Some(Box::pin(body))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::NoBody { status }) => Ok(Response::new(status, Bytes::new())),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        let (status, body) = match self.get_response(url) {
            Some(MockResponse::Success(response)) => {
                (response.status, boxed(chunk_stream(vec![response.body])))
            }
            Some(MockResponse::Error(err)) => return Err(err),
            Some(MockResponse::Stream { status, chunks }) => {
                (status, boxed(chunk_stream(chunks)))
            }
            Some(MockResponse::StreamWithError { chunks, error }) => (
                200,
                boxed(chunk_stream(chunks).chain(stream::once(async move { Err(error) }))),
            ),
            Some(MockResponse::Pending { chunks }) => {
                (200, boxed(chunk_stream(chunks).chain(stream::pending())))
            }
            Some(MockResponse::NoBody { status }) => (status, None),
            None => {
                return Err(HttpError::Other(format!(
                    "No mock response for URL: {}",
                    url
                )))
            }
        };

        Ok(StreamingResponse::new(status, body))
    }
}
