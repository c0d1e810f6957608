//! # wash-http
//!
//! REST backend for the carwash booking client.
//!
//! [`HttpBackend`] implements [`wash_core::BookingBackend`] with `reqwest`:
//! - bearer-token auth read from the session on every call
//! - `X-Request-Id` correlation header per request
//! - HTTP 401 mapped to `BookingError::Unauthorized` so the session is cleared
//! - bounded retry on timeouts and connection failures only
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wash_core::{BookingSession, ClientContext, FileSessionStore, Session};
//! use wash_http::{ClientConfig, HttpBackend};
//!
//! let config = ClientConfig::from_env()?;
//! let store = Arc::new(FileSessionStore::new(&config.session_file));
//! let backend = Arc::new(HttpBackend::new(config)?);
//!
//! let ctx = ClientContext::new(backend, Session::init(store));
//! let mut booking = BookingSession::load(ctx, invoice_id).await?;
//! ```

pub mod client;
pub mod config;
pub mod endpoints;

// Re-exports
pub use client::{HttpBackend, REQUEST_ID_HEADER};
pub use config::{ClientConfig, FileConfig, DEFAULT_API_BASE_URL, MAX_RETRIES_CAP};
pub use endpoints::{Endpoint, EndpointMethod};
