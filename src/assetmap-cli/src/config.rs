//! Configuration management for the assetmap CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One-line file naming the FFDec installation, kept next to the asset map
pub const DECOMPILER_PATH_FILE: &str = "ffdec-path.txt";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub decompiler_path: Option<PathBuf>,
    pub launcher: Option<String>,
    pub zoom: Option<u32>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("assetmap");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }
}

/// Read the decompiler path from `<export_dir>/ffdec-path.txt`, if present
pub fn read_decompiler_path_file(export_dir: &Path) -> Result<Option<PathBuf>> {
    let path = export_dir.join(DECOMPILER_PATH_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(trimmed)))
}

/// Pick the FFDec installation: explicit flag, then `ffdec-path.txt`, then
/// the saved config
pub fn resolve_decompiler_path(
    flag: Option<&Path>,
    export_dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = read_decompiler_path_file(export_dir)? {
        return Ok(path);
    }
    config.decompiler_path.clone().with_context(|| {
        format!(
            "FFDec path not set. Pass --decompiler, set FFDEC_PATH, write {}, \
            or run `assetmap configure --decompiler <dir>`",
            export_dir.join(DECOMPILER_PATH_FILE).display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            decompiler_path: Some(PathBuf::from("C:/Program Files/FFDec")),
            launcher: None,
            zoom: Some(4),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_resolve_prefers_flag_then_file_then_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            decompiler_path: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };

        let resolved = resolve_decompiler_path(None, dir.path(), &config).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/config"));

        fs::write(dir.path().join(DECOMPILER_PATH_FILE), "  /from/file \n").unwrap();
        let resolved = resolve_decompiler_path(None, dir.path(), &config).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/file"));

        let resolved =
            resolve_decompiler_path(Some(Path::new("/from/flag")), dir.path(), &config).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag"));
    }

    #[test]
    fn test_resolve_fails_without_any_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_decompiler_path(None, dir.path(), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("FFDec path not set"));
    }
}
