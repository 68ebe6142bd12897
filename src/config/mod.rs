mod colors;
pub(crate) mod keys;

use std::{env, path::PathBuf};

use color_eyre::Result;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::warn;

pub use crate::config::{
    colors::Styles,
    keys::{KeyBindings, key_event_to_string},
};

const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

const DEFAULT_CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
    /// Catalog file to browse instead of the built-in one.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Result<Self> {
        let default_config: Config = json5::from_str(DEFAULT_CONFIG)?;
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("config_dir", config_dir.to_string_lossy().as_ref())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            warn!(
                "no configuration file in {}, using defaults",
                config_dir.display()
            );
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.merge_defaults(default_config);
        Ok(cfg)
    }

    /// Fills in every binding and style the user did not set from `defaults`.
    fn merge_defaults(&mut self, defaults: Config) {
        for (mode, default_bindings) in defaults.keybindings.iter() {
            let user_bindings = self.keybindings.entry(*mode).or_default();
            for (key, action) in default_bindings.iter() {
                user_bindings
                    .entry(key.clone())
                    .or_insert_with(|| action.clone());
            }
        }
        for (mode, default_styles) in defaults.styles.iter() {
            let user_styles = self.styles.entry(*mode).or_default();
            for (style_key, style) in default_styles.iter() {
                user_styles.entry(style_key.clone()).or_insert(*style);
            }
        }
        if self.catalog.is_none() {
            self.catalog = defaults.catalog;
        }
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(data_folder) = env::var("FOLDERVIEW_DATA").ok().map(PathBuf::from) {
        data_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Where the file logger writes, and where panic reports point users to.
pub fn get_log_path() -> PathBuf {
    get_data_dir().join(LOG_FILE)
}

pub fn get_config_dir() -> PathBuf {
    if let Some(config_folder) = env::var("FOLDERVIEW_CONFIG").ok().map(PathBuf::from) {
        config_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("de.marma", "", env!("CARGO_PKG_NAME"))
}
