//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.bcr/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BcrConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// File holding the base64 registry payload. Relative paths are
    /// resolved against `~/.bcr/`.
    pub path: Option<String>,
    /// Site root the browser is served from.
    pub base_url: Option<String>,
    /// Site root `symbols.pb.gz` is fetched from, when it differs.
    pub symbols_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub start_location: Option<String>,
    pub keyboard_shortcuts: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://registry.bazel.build";
pub const DEFAULT_REGISTRY_FILE: &str = "registry.b64";
pub const DEFAULT_START_LOCATION: &str = "";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` only when no home directory could be found and nothing was
    /// configured.
    pub registry_path: Option<PathBuf>,
    pub base_url: String,
    pub symbols_url: String,
    pub start_location: String,
    pub keyboard_shortcuts: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// `~/.bcr`, home of the config, preferences and the default payload.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".bcr"))
}

/// Returns the path to `~/.bcr/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.bcr/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BcrConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BcrConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BcrConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(BcrConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<BcrConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BcrConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# bcr configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [registry]
# path = "registry.b64"                      # Or set BCR_REGISTRY; relative to ~/.bcr/
# base_url = "https://registry.bazel.build"  # Or set BCR_BASE_URL
# symbols_url = "https://registry.bazel.build"  # Or set BCR_SYMBOLS_URL

# [ui]
# start_location = "modules"
# keyboard_shortcuts = true
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Command-line overrides; `None` means the flag was not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub registry: Option<String>,
    pub base_url: Option<String>,
    pub symbols_url: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &BcrConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with(
    config: &BcrConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Registry payload: CLI → env → config → ~/.bcr/registry.b64
    let registry_path = cli
        .registry
        .clone()
        .or_else(|| env("BCR_REGISTRY"))
        .or_else(|| config.registry.path.clone())
        .map(|p| expand_path(&p))
        .or_else(|| config_dir().map(|d| d.join(DEFAULT_REGISTRY_FILE)));

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("BCR_BASE_URL"))
        .or_else(|| config.registry.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Symbols URL: CLI → env → config → base URL
    let symbols_url = cli
        .symbols_url
        .clone()
        .or_else(|| env("BCR_SYMBOLS_URL"))
        .or_else(|| config.registry.symbols_url.clone())
        .unwrap_or_else(|| base_url.clone());

    ResolvedConfig {
        registry_path,
        base_url,
        symbols_url,
        start_location: config
            .ui
            .start_location
            .clone()
            .unwrap_or_else(|| DEFAULT_START_LOCATION.to_string()),
        keyboard_shortcuts: config.ui.keyboard_shortcuts.unwrap_or(true),
    }
}

/// Absolute paths pass through; relative ones live under `~/.bcr/`.
fn expand_path(path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return p;
    }
    match config_dir() {
        Some(dir) => dir.join(p),
        None => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = BcrConfig::default();
        assert!(config.registry.path.is_none());
        assert!(config.ui.start_location.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&BcrConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.symbols_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.start_location, "");
        assert!(resolved.keyboard_shortcuts);
    }

    #[test]
    fn test_symbols_url_follows_base_url() {
        let config = BcrConfig {
            registry: RegistryConfig {
                base_url: Some("http://localhost:8080".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.symbols_url, "http://localhost:8080");
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = BcrConfig {
            registry: RegistryConfig {
                path: Some("/data/config.b64".to_string()),
                symbols_url: Some("http://config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "BCR_REGISTRY" => Some("/data/env.b64".to_string()),
            "BCR_SYMBOLS_URL" => Some("http://env".to_string()),
            _ => None,
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.registry_path, Some(PathBuf::from("/data/env.b64")));
        assert_eq!(resolved.symbols_url, "http://env");

        let cli = CliOverrides {
            registry: Some("/data/cli.b64".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with(&config, &cli, env);
        assert_eq!(resolved.registry_path, Some(PathBuf::from("/data/cli.b64")));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[ui]
start_location = "modules"
"#;
        let config: BcrConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.start_location.as_deref(), Some("modules"));
        assert!(config.ui.keyboard_shortcuts.is_none());
        assert!(config.registry.base_url.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[registry]
path = "/tmp/registry.b64"
base_url = "https://bcr.example.com"
symbols_url = "https://cdn.example.com"

[ui]
keyboard_shortcuts = false
"#;
        let config: BcrConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.registry_path, Some(PathBuf::from("/tmp/registry.b64")));
        assert_eq!(resolved.base_url, "https://bcr.example.com");
        assert_eq!(resolved.symbols_url, "https://cdn.example.com");
        assert!(!resolved.keyboard_shortcuts);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("bcr-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[registry\npath = 1").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
