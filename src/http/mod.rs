//! HTTP client module
//!
//! Provides the HTTP client used by remote record sources.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Retry-After**: 429 responses wait as long as the server asks

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
