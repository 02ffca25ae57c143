use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an explicit filter, e.g. `photo_import_session=trace`.
pub const LOG_ENV: &str = "PHOTO_IMPORT_LOG";

/// Logs go to stderr so they never mix with command output.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time().with_target(verbosity > 2))
        .with(filter)
        .init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
