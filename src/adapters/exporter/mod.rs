//! Export server transport
//!
//! This module provides the HTTP client that submits export requests to the
//! remote rendering server and returns the packaged result.

pub mod client;

pub use client::{ExportClient, TransportOptions, EXPORT_API_PATH};
