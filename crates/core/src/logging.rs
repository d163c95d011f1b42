//! Process-wide logging setup
//!
//! The library only emits `tracing` events. Binaries call [`init_logging`]
//! once at start-up to install a subscriber; `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing to stderr
///
/// Returns `false` when a global subscriber was already installed, which
/// makes repeated calls harmless.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        init_logging("debug");
        assert!(!init_logging("info"));
    }
}
