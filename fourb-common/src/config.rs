//! Configuration loading and config file resolution

use crate::params::EngineParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Engine configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Tracing filter directive (e.g. "fourb_engine=debug")
    pub log_filter: Option<String>,

    /// Engine tuning parameters
    #[serde(default)]
    pub params: EngineParams,
}

/// Config file resolution following priority order:
/// 1. Explicit path argument (highest priority)
/// 2. FOURB_CONFIG environment variable
/// 3. Platform config directory (~/.config/fourb/config.toml)
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    // Priority 1: explicit path
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var("FOURB_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Priority 3: platform config directory
    let candidate = dirs::config_dir().map(|d| d.join("fourb").join("config.toml"));
    if let Some(path) = candidate {
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Load configuration, degrading to defaults when no file is found
///
/// A missing config file is not an error: the engine starts with compiled
/// defaults and a warning. A file that exists but fails to parse is an
/// error, since silently ignoring operator-provided thresholds would be
/// worse than refusing to start.
pub fn load_config(explicit: Option<&str>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(explicit) else {
        warn!("No config file found; using compiled defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} does not exist; using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Write configuration back to a TOML file
pub fn write_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
