//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default URL for new requests
pub const DEFAULT_URL: &str = "https://httpbin.org/get";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Courier";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header names offered by the header-key completer
pub const COMMON_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Encoding",
    "Accept-Language",
    "Authorization",
    "Cache-Control",
    "Content-Length",
    "Content-Type",
    "Cookie",
    "Host",
    "If-Match",
    "If-Modified-Since",
    "If-None-Match",
    "Origin",
    "Referer",
    "User-Agent",
    "X-Api-Key",
    "X-Requested-With",
];
