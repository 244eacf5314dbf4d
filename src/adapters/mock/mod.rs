//! Mock implementations for testing.
//!
//! Test doubles for the trait abstractions, enabling unit testing without
//! network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and body streams

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
