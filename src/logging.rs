use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Error;

const DEFAULT_FILTER: &str = "info";

/// Installs a file-backed `tracing` subscriber.
///
/// The terminal is in raw mode while the game runs, so events never go to
/// stdout or stderr. `RUST_LOG` overrides the default `info` filter.
pub fn init_file_logging(path: &Path) -> Result<(), Error> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| Error::Logging(error.to_string()))
}
