//! TMDB Proxy - A caching reverse proxy for the movie-database API
//!
//! Forwards any request to the upstream API, adds CORS headers, and caches
//! 200 responses in memory with TTL expiration and a size bound.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
