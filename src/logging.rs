use std::fs::{self, File};

use color_eyre::{Result, eyre::WrapErr};
use time::macros::format_description;
use tracing::Level;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::LocalTime},
    prelude::*,
};

use crate::config;

const LOG_ENV: &str = "FOLDERVIEW_LOG_LEVEL";

/// Sends all tracing output to the log file in the data dir.
pub fn init() -> Result<()> {
    let log_path = config::get_log_path();
    if let Some(directory) = log_path.parent() {
        fs::create_dir_all(directory)?;
    }
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("failed to create log file {}", log_path.display()))?;
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
    ));

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_timer(timer)
        .with_filter(env_filter()?);
    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}

/// `RUST_LOG` wins, then `FOLDERVIEW_LOG_LEVEL`, then INFO.
fn env_filter() -> Result<EnvFilter> {
    let builder = EnvFilter::builder().with_default_directive(Level::INFO.into());
    let filter = builder
        .try_from_env()
        .or_else(|_| builder.with_env_var(LOG_ENV).from_env())?;
    Ok(filter)
}
