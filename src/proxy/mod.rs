//! Proxy Module
//!
//! Forwards requests to the upstream movie-database API.

mod upstream;

pub use upstream::{UpstreamClient, UpstreamResponse};
