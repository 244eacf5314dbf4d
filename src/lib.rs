//! marketlens - streaming client for multi-stage market research jobs
//!
//! The library turns the backend's SSE stream into a single published
//! [`models::SessionSnapshot`]:
//!
//! - [`sse`] tokenizes byte chunks into `(event, data)` records and decodes them
//! - [`session`] reduces decoded events and owns the session lifecycle
//! - [`client`] talks to `/research` and `/health` through [`traits::HttpClient`]
//! - [`adapters`] provides the reqwest client and a mock for tests

pub mod adapters;
pub mod cli;
pub mod cli_output;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
