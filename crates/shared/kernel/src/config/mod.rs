mod error;

pub use error::{ConfigError, ConfigErrorExt};

use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "PBILL";
const DEFAULT_CONFIG_FILE: &str = "billing";

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `billing.toml`). If no path is provided, it defaults to `"billing"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `PBILL__`.
///    Nested structures are accessed using double underscores (e.g., `PBILL__PURCHASE_UPDATES__CAPACITY`
///    maps to `purchase_updates.capacity`).
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_from(path, None)
}

/// Same as [`load_config`], but reads overrides from `env` instead of the process
/// environment when it is given.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_from<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
