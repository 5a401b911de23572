//! `tracing` subscriber setup for binaries and the C ABI.
//!
//! Library code only emits events; whoever owns the process decides whether
//! a subscriber is installed.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `filter` (an `EnvFilter` directive
/// such as `info` or `bookshelf_core=debug`). Returns false when the filter
/// does not parse or a global subscriber is already set.
pub fn init(filter: &str) -> bool {
    let Ok(filter) = EnvFilter::try_new(filter) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
