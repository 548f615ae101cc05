//! Logging setup for the simulator.
//!
//! The engine only emits `tracing` events; installing a subscriber is up to
//! the binary (or a test that wants to see them).
//!
//! ```bash
//! RUST_LOG=debug gacha-sim --config config.json
//! RUST_LOG=gacha_sim::simulator=trace gacha-sim --config config.json
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber at `level`, unless `RUST_LOG` says otherwise.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Install a subscriber driven entirely by `RUST_LOG` (default `info`).
pub fn init_logging_from_env() {
    init_logging("info");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("warn");
        init_logging("debug");
        tracing::info!("logging initialized twice");
    }
}
