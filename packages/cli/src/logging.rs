//! Process-wide logging setup
//!
//! `env_logger` backs both the `log` facade and, through the `tracing` `log`
//! feature, every event the token library emits. Levels come from `RUST_LOG`:
//! - `RUST_LOG=warn` - rejected requests only
//! - `RUST_LOG=jwtsmith_jwt=debug` - every pipeline step

use log::debug;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging bootstrap for the binary
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (first call wins)
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            debug!("logging initialized");
        });
    }

    /// Initialize logging for tests
    #[cfg(test)]
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Record where the key came from without touching its contents
    pub fn log_key_source(source: &str, len: usize) {
        debug!("read private key from {source} ({len} bytes)");
    }
}
