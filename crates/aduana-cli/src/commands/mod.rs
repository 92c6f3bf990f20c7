//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod requirements;
pub mod suggest;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use aduana_core::{AduanaConfig, AduanaError, Validator};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aduana")
        .join("config.json")
}

/// Configuration from `--config`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AduanaConfig> {
    if let Some(path) = config_path {
        return Ok(AduanaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(AduanaConfig::from_file(&default_path)?)
    } else {
        Ok(AduanaConfig::default())
    }
}

/// Build the validator, falling back to deterministic rules when the
/// advisory service cannot be set up.
///
/// Must run on a blocking thread: the advisory HTTP client owns its own runtime.
pub fn build_validator(config: &AduanaConfig, ai: bool) -> anyhow::Result<Validator> {
    let mut config = config.clone();
    config.advisor.enabled |= ai;

    match Validator::from_config(&config) {
        Ok(validator) => Ok(validator),
        Err(AduanaError::Advisory(e)) => {
            warn!("Advisory service unavailable ({}), running deterministic rules only", e);
            config.advisor.enabled = false;
            Ok(Validator::from_config(&config)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read and parse a JSON document.
pub fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))
}

/// Run synchronous work off the async runtime.
pub async fn blocking<T, F>(work: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
