//! CLI output utilities for line-based research progress.
//!
//! This module provides functions for rendering stage transitions, log
//! lines, and the final report as plain text.

mod boxes;

pub use boxes::*;
