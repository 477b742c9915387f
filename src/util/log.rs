use std::{fs, path::Path, sync::Mutex};

use color_eyre::eyre::Context;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "SPOTLITE_LOG";
const LOG_FILE: &str = "spotlite.log";

/// The terminal belongs to the UI, so logs go to a file in the data directory.
pub fn initialize_logging(data_dir: &Path) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)
        .wrap_err_with(|| format!("Could not create {}", data_dir.display()))?;

    let log_path = data_dir.join(LOG_FILE);
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("Could not open {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
