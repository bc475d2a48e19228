/// Config file loading and creation for the tierduel CLI.
///
/// Config lives at ~/.config/tierduel/config.toml.
/// All fields are optional; CLI args override config values.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tierduel_core::{EngineConfig, Refinement};

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct TierduelConfig {
    /// Tier-list file used when `--list` is not given.
    pub list: Option<PathBuf>,
    /// Destination tier IDs, best first. Defaults to every ranked tier in the list.
    pub default_tiers: Option<Vec<String>>,
    pub confidence_z: Option<f64>,
    pub refinement: Option<Refinement>,
}

impl TierduelConfig {
    /// Engine settings from this config, with defaults for anything unset.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            confidence_z: self.confidence_z.unwrap_or(defaults.confidence_z),
            refinement: self.refinement.unwrap_or(defaults.refinement),
        };
        config.validate()?;
        Ok(config)
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# tierduel configuration
# All values here can be overridden by CLI flags.

# Tier-list file to rank when --list is not given
# list = \"/path/to/my-tierlist.json\"

# Destination tiers, best first (default: every tier in the list)
# default_tiers = [\"s\", \"a\", \"b\", \"c\"]

# z-score for the Wilson confidence interval (1.96 = 95%)
# confidence_z = 1.96

# Second pass over ambiguous pairs: \"overlap\" or \"off\"
# refinement = \"overlap\"
";

/// Returns the default config path: ~/.config/tierduel/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("tierduel").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<TierduelConfig> {
    Ok(toml::from_str(content)?)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<TierduelConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TierduelConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
