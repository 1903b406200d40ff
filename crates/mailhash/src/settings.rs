//! Runner settings.
//!
//! Read from `<config dir>/mailhash/config.json` when that file exists, then
//! overridden by `MAILHASH_REDIS_URL` and `MAILHASH_ACCOUNTS_KEY`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mailhash_core::StoreConfig;
use tracing::debug;

const URL_VAR: &str = "MAILHASH_REDIS_URL";
const KEY_VAR: &str = "MAILHASH_ACCOUNTS_KEY";

/// Location of the settings file.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailhash")
        .join("config.json")
}

/// Load the store configuration from file and environment.
pub async fn load() -> Result<StoreConfig> {
    let path = settings_path();
    let mut config = if path.exists() {
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        parse(&contents).with_context(|| format!("parsing {}", path.display()))?
    } else {
        StoreConfig::default()
    };

    apply_overrides(
        &mut config,
        std::env::var(URL_VAR).ok(),
        std::env::var(KEY_VAR).ok(),
    );
    config.validate()?;
    Ok(config)
}

fn parse(contents: &str) -> Result<StoreConfig> {
    Ok(serde_json::from_str(contents)?)
}

fn apply_overrides(config: &mut StoreConfig, url: Option<String>, key: Option<String>) {
    if let Some(url) = url {
        config.url = url;
    }
    if let Some(key) = key {
        config.accounts_key = key;
    }
}
