//! HTTP API: bearer-token gate mounted on an axum router.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod profiles;
