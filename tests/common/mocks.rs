//! Mock fixtures for integration tests.
//!
//! Re-exports the mock HTTP client from `marketlens::adapters::mock` and
//! adds a builder for controllers backed by it.

pub use marketlens::adapters::mock::{MockHttpClient, MockResponse};
pub use marketlens::traits::{Headers, HttpClient, HttpError, Response};

use marketlens::client::ResearchClient;
use marketlens::session::SessionController;

/// Base URL used with the mock client.
pub const MOCK_BASE_URL: &str = "http://mock.local:8000";

/// Research endpoint under [`MOCK_BASE_URL`].
pub fn research_url() -> String {
    format!("{}/research", MOCK_BASE_URL)
}

/// Configuration for setting up a mock-backed controller.
pub struct MockBackend {
    client: MockHttpClient,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Stream these chunks from `/research`.
    pub fn with_stream<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client
            .set_response(&research_url(), MockResponse::sse(chunks));
        self
    }

    /// Answer `/research` with the given response.
    pub fn with_research_response(self, response: MockResponse) -> Self {
        self.client.set_response(&research_url(), response);
        self
    }

    /// The mock client, for inspecting recorded requests.
    pub fn http(&self) -> MockHttpClient {
        self.client.clone()
    }

    pub fn controller(&self) -> SessionController<MockHttpClient> {
        SessionController::new(ResearchClient::new(MOCK_BASE_URL, self.client.clone()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}
