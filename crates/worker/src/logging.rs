//! Tracing setup for the `wjd` binary: an `EnvFilter` over `RUST_LOG`
//! (defaulting to `info`) feeding a plain `fmt` subscriber, the same pair
//! the teacher's crates pull `tracing-subscriber` in for.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. Safe to call at most once per
/// process; a second call is a logic error in the caller, not something
/// this function guards against.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}
