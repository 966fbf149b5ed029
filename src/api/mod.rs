//! API Module
//!
//! HTTP surface of the proxy: a single catch-all route.
//!
//! Every method on every path is handled by `proxy_handler`; the request
//! path and query are appended verbatim to the upstream base URL.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
