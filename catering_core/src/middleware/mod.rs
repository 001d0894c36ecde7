//! Middleware components for the HTTP API

pub mod cors;
pub mod logging;
pub mod rate_limit;
