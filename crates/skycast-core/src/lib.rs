//! Application core for Skycast
//!
//! Owns the single source-of-truth `AppState` and the controller that
//! mutates it. The rendering layer is a pure consumer of published
//! snapshots.

pub mod controller;
pub mod state;

pub use controller::AppStateController;
pub use state::{suggested_cities, AppState, ErrorKind};

use anyhow::Result;

/// Initialize logging for the application.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Skycast core initialized");
    Ok(())
}
