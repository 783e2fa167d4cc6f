//! Ambient tracing setup for collaborators of this crate.
//!
//! The core (`graph`, `detect`, `recovery`) never emits a tracing event —
//! it is silent per design, and callers branch on [`crate::errors::CoreError`]
//! instead of reading logs. This module exists purely so demos, integration
//! tests, and a future interactive front-end have one place to install a
//! subscriber, in the style of the reference codebase's own `logging`
//! module (trimmed down: no file rotation, no async writers, no structured
//! JSON log-entry type — there is no I/O here to justify any of that).

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber at `INFO` level, honoring `RUST_LOG`
/// if set. Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Install a global `tracing` subscriber at the given default level.
///
/// Only the first call across the process takes effect.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        init_with_level(Level::DEBUG);
    }
}
