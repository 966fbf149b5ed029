//! Response models for the proxy
//!
//! Bodies produced by the proxy itself. Upstream bodies are relayed untouched
//! and never pass through these types.

pub mod responses;

pub use responses::ErrorResponse;
