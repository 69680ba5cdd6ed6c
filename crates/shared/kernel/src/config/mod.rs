mod settings;

pub use settings::BrokerSettings;

use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file stem, looked up in the working directory with any supported extension.
pub const DEFAULT_CONFIG_STEM: &str = "broker";

/// Custom error type for config loading.
#[osb_derive::osb_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
    #[error("Invalid value for {key}{}: {message}", format_context(.context))]
    Invalid { key: &'static str, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Invalid { key, message: message.into(), context: None }
    }
}

/// Loads configuration from an optional file layered under the process environment.
///
/// 1. **Base file**: `path`, or `broker.{toml,yaml,json,...}` in the working directory.
///    The file is optional; a missing file leaves every key unset.
/// 2. **Environment**: plain variables such as `SERVICE_NAME` or `PORT` override the file.
///    Keys are matched in snake case, so `FAKE_ASYNC` fills `fake_async`.
///
/// # Errors
/// Fails when the file exists but cannot be parsed, or the merged values do not fit `T`.
///
/// # Example
/// ```rust,no_run
/// use osb_kernel::config::{BrokerSettings, load_config};
///
/// let settings: BrokerSettings = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_from(path, None)
}

/// Same as [`load_config`], reading variables from `env` instead of the process environment
/// when given.
pub fn load_config_from<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_STEM), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(Environment::default().convert_case(config::Case::Snake).source(env));

    info!("Loading config from {} and the environment", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
