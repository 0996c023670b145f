//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up FFDec defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(
    decompiler: Option<PathBuf>,
    launcher: Option<String>,
    zoom: Option<u32>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if !apply(&mut config, decompiler, launcher, zoom) {
        show_usage();
        return Ok(());
    }

    config.save()?;
    show_config(&config);
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Merge the given settings into `config`; false when nothing was given
fn apply(
    config: &mut Config,
    decompiler: Option<PathBuf>,
    launcher: Option<String>,
    zoom: Option<u32>,
) -> bool {
    let changed = decompiler.is_some() || launcher.is_some() || zoom.is_some();
    if let Some(path) = decompiler {
        config.decompiler_path = Some(path);
    }
    if let Some(name) = launcher {
        config.launcher = Some(name);
    }
    if let Some(zoom) = zoom {
        config.zoom = Some(zoom);
    }
    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.decompiler_path {
        Some(path) => println!("FFDec path: {}", path.display()),
        None => println!("No FFDec path configured"),
    }
    if let Some(launcher) = &config.launcher {
        println!("Launcher: {}", launcher);
    }
    if let Some(zoom) = config.zoom {
        println!("Shape zoom: {}", zoom);
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: assetmap configure --decompiler <FFDEC_DIR> [--launcher NAME] [--zoom N]");
    println!("   or: assetmap configure --show");
}
