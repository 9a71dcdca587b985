//! Tracing subscriber setup for the `swarm-manager` binary and tests.

use tracing::Level;

/// Install a `fmt` subscriber that records events at `level` and above.
///
/// Level names are the ones `tracing` parses (`error` through `trace`, any
/// case, or `1`-`5`). Anything else records at `info` and says so once the
/// subscriber is up. A subscriber that is already installed is kept.
pub fn init(level: &str) {
    let parsed = parse_level(level);

    let installed = tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_target(false)
        .try_init()
        .is_ok();

    if installed && parsed.is_none() {
        tracing::warn!(requested = level, "unknown log level, recording at info");
    }
}

pub(crate) fn parse_level(name: &str) -> Option<Level> {
    name.trim().parse().ok()
}
