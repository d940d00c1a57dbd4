//! ChiroChart: client-side core of a chiropractic/physical-therapy EMR.
//!
//! Patient and visit documents (the visit is a tagged union over
//! initial / follow-up / discharge), form controllers with debounced
//! draft auto-save, a REST persistence client, and narrative PDF
//! report generation.

pub mod api;
pub mod config;
pub mod db;
pub mod delivery;
pub mod form;
pub mod models;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries/hosts embedding this crate.
///
/// Respects `RUST_LOG`; falls back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
