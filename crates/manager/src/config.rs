//! Configuration loading for the manager.

use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use crate::types::ManagerConfig;

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/OptionTrail.toml";

/// Loads manager configuration by merging a TOML file with
/// `OPTION_TRAIL_`-prefixed environment variables.
///
/// Missing file is fine: defaults apply, env vars still override.
///
/// # Errors
///
/// Returns an error if the file or environment values cannot be parsed.
pub fn load(path: Option<&Path>) -> Result<ManagerConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

    let config: ManagerConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("OPTION_TRAIL_"))
        .extract()?;

    config.validate()?;
    Ok(config)
}
