//! Apply a per-file transform to every PNG in a directory

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Whether a path has a `.png` extension (any case)
pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// List regular files directly inside `dir`, sorted by name
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => Error::io(path, io),
                None => Error::io(path, std::io::Error::other("filesystem loop")),
            }
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// List PNG files directly inside `dir` (no recursion)
pub fn list_png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_files(dir)?.into_iter().filter(|p| is_png(p)).collect())
}

/// Call `transform(input, output)` for each file, writing a same-named file
/// into `output_dir`. Returns the produced paths in input order.
pub fn apply_to_files<F>(
    files: &[PathBuf],
    output_dir: &Path,
    mut transform: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, &Path) -> Result<()>,
{
    let mut produced = Vec::with_capacity(files.len());
    for input in files {
        let Some(name) = input.file_name() else {
            continue;
        };
        let output = output_dir.join(name);
        transform(input, &output)?;
        produced.push(output);
    }
    Ok(produced)
}

/// Apply `transform` to every PNG in `input_dir`, writing into `output_dir`
pub fn apply_to_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    transform: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, &Path) -> Result<()>,
{
    let files = list_png_files(input_dir)?;
    tracing::debug!(
        "Applying transform to {} PNGs in {}",
        files.len(),
        input_dir.display()
    );
    apply_to_files(&files, output_dir, transform)
}
