//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use dataconv_core::DataconvConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dataconv")
        .join("config.json")
}

/// Configuration file in effect: `--config` when given, else the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DataconvConfig> {
    if let Some(path) = config_path {
        return Ok(DataconvConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration from {}", path.display());
        Ok(DataconvConfig::from_file(&path)?)
    } else {
        Ok(DataconvConfig::default())
    }
}

/// Warn when the category has no keywords; its documents will list no products.
pub fn warn_unknown_category(config: &DataconvConfig, category: &str) {
    let known = config
        .categories
        .0
        .keys()
        .any(|name| name.to_lowercase() == category.to_lowercase());

    if !known {
        let names: Vec<&str> = config.categories.0.keys().map(String::as_str).collect();
        warn!(
            "Unknown category '{}', no products will be retained. Configured categories: {}",
            category,
            names.join(", ")
        );
    }
}
