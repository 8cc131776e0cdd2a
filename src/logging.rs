//! Tracing setup
//!
//! Logs go to stderr so stdout stays clean for `--json` and for callers that
//! capture the printed version.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with the PORT_RAIL_LOG environment variable
///
/// Defaults to `warn`; each `-v` raises it one level (debug, then trace).
pub fn init_tracing(verbose: u8) {
  let filter = EnvFilter::try_from_env("PORT_RAIL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
    .init();
}

fn default_level(verbose: u8) -> &'static str {
  match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  }
}
