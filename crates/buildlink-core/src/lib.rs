//! BuildLink core types
//!
//! Shared building blocks for the BuildLink telemetry aggregation services:
//!
//! - **Error**: the single error type surfaced by every telemetry source
//! - **config**: defaults, environment variables and TOML loading
//! - **HttpTransport**: the outbound HTTP seam that telemetry clients are written against
//!
//! Telemetry clients never talk to `reqwest` directly. They receive an
//! `Arc<dyn HttpTransport>` so that tests can substitute a scripted transport.

pub mod config;
pub mod error;
pub mod http;

pub use config::{AppConfig, BmsConfig, DoorCounterConfig, HttpConfig, ServerConfig};
pub use error::{DecodeError, Error, Result};
pub use http::{BasicAuth, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
