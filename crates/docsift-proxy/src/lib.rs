//! HTTP proxy that fetches the configured filing on behalf of the browser.
//!
//! The upstream rejects requests without an identifying `User-Agent` and
//! does not send CORS headers, so the viewer fetches through this service.

pub mod config;
pub mod error;
pub mod server;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use server::{build_router, serve};
pub use upstream::{Fetched, Upstream};
