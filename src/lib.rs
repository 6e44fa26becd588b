//! A small subscription intake service.
//! Stores `{email, name}` submissions in SQLite and lets an admin holding the api key list them.

pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod web;

pub use app::{App, AppState};
pub use error::{Error, Result};
pub use web::serve::{serve, serve_with_shutdown};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Compact, timeless output with span timings. Used in debug builds and tests.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter())
        .compact()
        .init();
}

/// Plain output without colors, meant for log collectors.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(env_filter())
        .init();
}
