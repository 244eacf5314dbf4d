//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, streaming POST)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamingResponse};
