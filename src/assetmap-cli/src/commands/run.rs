//! Run command handler
//!
//! Resolves the project layout, then hands the asset map to the executor.

use crate::cli::RunArgs;
use crate::config::{resolve_decompiler_path, Config};
use anyhow::{Context, Result};
use assetmap::{ExportConfig, Executor, FfdecExporter};
use std::fs;

/// Build the executor configuration from CLI arguments and saved config
pub fn export_config(args: &RunArgs, config: &Config) -> Result<ExportConfig> {
    let map_path = args
        .map
        .clone()
        .unwrap_or_else(|| args.export_dir.join("assetmap.txt"));
    let asset_map_text = fs::read_to_string(&map_path)
        .with_context(|| format!("Failed to read asset map {}", map_path.display()))?;

    Ok(ExportConfig {
        decompiler_path: resolve_decompiler_path(
            args.decompiler.as_deref(),
            &args.export_dir,
            config,
        )?,
        asset_map_text,
        origin_root: args
            .origin
            .clone()
            .unwrap_or_else(|| args.export_dir.join("OriginalAssets")),
        destination_root: args.destination.clone(),
        staging_root: args.staging.clone().unwrap_or_else(|| args.export_dir.clone()),
    })
}

/// Handle the run command
pub fn handle(args: &RunArgs) -> Result<()> {
    let config = Config::load()?;
    let export = export_config(args, &config)?;

    let mut exporter = FfdecExporter::new(&export.decompiler_path);
    if let Some(launcher) = &config.launcher {
        exporter = exporter.with_launcher(launcher.clone());
    }
    if let Some(zoom) = config.zoom {
        exporter = exporter.with_zoom(zoom);
    }

    tracing::info!("Using FFDec at {}", export.decompiler_path.display());
    let summary = Executor::with_exporter(export, exporter)
        .with_filter(args.filter.into())
        .run()
        .context("Asset export failed")?;

    for path in &summary.placed {
        tracing::debug!("Wrote {}", path.display());
    }
    println!(
        "Exported {} shape(s) and {} font file(s) from {} archive mapping(s)",
        summary.shapes, summary.fonts, summary.blocks
    );

    Ok(())
}
