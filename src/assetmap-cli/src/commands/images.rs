//! Standalone image commands: crop, trim, scale

use anyhow::{Context, Result};
use assetmap::{
    apply_to_directory, crop_export_border, scale_image, trim_transparent_border, ResizeFilter,
    Scale,
};
use std::path::Path;

/// Crop the export border from every PNG in `input`
pub fn crop(input: &Path, output: &Path) -> Result<()> {
    run_batch(input, output, "Cropped", crop_export_border)
}

/// Trim transparent edges from every PNG in `input`
pub fn trim(input: &Path, output: &Path) -> Result<()> {
    run_batch(input, output, "Trimmed", trim_transparent_border)
}

/// Rescale one image by a "sx,sy" pair of scale expressions
pub fn scale(input: &Path, output: &Path, factors: &str, filter: ResizeFilter) -> Result<()> {
    let scale = Scale::parse_pair(factors)?;
    scale_image(input, output, scale, filter)
        .with_context(|| format!("Failed to scale {}", input.display()))?;
    println!("Scaled {} -> {}", input.display(), output.display());
    Ok(())
}

fn run_batch<F>(input: &Path, output: &Path, verb: &str, transform: F) -> Result<()>
where
    F: FnMut(&Path, &Path) -> assetmap::Result<()>,
{
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let produced = apply_to_directory(input, output, transform)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    for path in &produced {
        println!("{} {}", verb, path.display());
    }
    eprintln!("{} {} image(s) into {}", verb, produced.len(), output.display());
    Ok(())
}
