pub mod config;
pub mod constants;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod normalize;
pub mod rate_limiter;
pub mod survey;
pub mod types;

// Use cases and the ports they depend on
pub mod app;
// Adapters for the ports: HTTP, timer, output file
pub mod infra;
