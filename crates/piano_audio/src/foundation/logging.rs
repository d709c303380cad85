//! Logging setup for applications built on this crate
//!
//! The library itself only emits records through the `log` facade:
//! worker start/stop at `info`, each queued or played sound at `trace`,
//! pool failures at `warn`.

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize `env_logger` from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize `env_logger` with `default_level` unless `RUST_LOG` overrides it
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(default_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
