//! talent-client
//!
//! Async client for the assessment backend: a request builder with mock
//! fallback, session tokens with one-shot refresh on 401, the persisted
//! client config, and typed wrappers for every endpoint.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod session;
pub mod transport;

pub use client::{ApiClient, Fetched};
pub use error::{ApiError, ConfigError};
