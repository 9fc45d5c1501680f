//! Survey response source.
//!
//! This module fetches the raw response collection from the remote JSON
//! endpoint and coerces it into typed records.

pub mod client;

pub use client::{normalize, SourceError, SurveySource};
