mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/house-cup/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("house-cup"))
}

/// Get the default config file path (~/.config/house-cup/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `house-cup init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Write a default config file. Refuses to overwrite unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<Config> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let config = Config {
        default_max_points: Some(crate::model::DEFAULT_MAX_POINTS),
        ..Config::default()
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize config")?;
    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;
    Ok(config)
}

/// Data file from config, falling back to ~/.config/house-cup/data.json
pub fn data_path(config: &Config) -> Result<PathBuf> {
    match config.data_file {
        Some(ref path) => Ok(path.clone()),
        None => crate::store::get_data_path(),
    }
}
