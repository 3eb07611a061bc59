//! # dcx
//!
//! Drives the data contract XML encoder over the sample graphs, one
//! scheduling slice at a time, and optionally records or checks the sink
//! calls it makes.

pub mod config;
pub mod driver;
pub mod fixtures;

pub use config::DriverConfig;
pub use driver::{RunSummary, run};

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence over
/// `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dcx={},dcx_xml={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
