use std::path::PathBuf;

use clap::Parser;

use crate::config::{get_config_dir, get_data_dir};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0, value_parser = parse_rate)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 30.0, value_parser = parse_rate)]
    pub frame_rate: f64,

    /// Catalog file (.json5 or .json) to browse instead of the built-in one
    #[arg(short, long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

/// Rates become interval lengths, so they must be positive and finite.
fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("{raw} is not a positive number"))
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let describe = option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown");
    let build_date = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");

    let config_dir_path = get_config_dir().display().to_string();
    let data_dir_path = get_data_dir().display().to_string();

    let version = env!("CARGO_PKG_VERSION");
    format!(
        "\
{version}-{describe} ({build_date})

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
