//! FFDec exporter adapter
//!
//! Runs the decompiler as a blocking subprocess and reports what it wrote as
//! an [`ExportedFileSet`], so later stages consume an explicit manifest
//! instead of re-reading the staging directory.

use crate::batch::{is_png, list_files};
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default `-zoom` passed for shape exports
pub const DEFAULT_ZOOM: u32 = 10;

/// Resource type requested from the decompiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Shape,
    Font,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Shape => "shape",
            ExportKind::Font => "font",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files produced by one export, all directly inside `dir`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedFileSet {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl ExportedFileSet {
    pub fn new(dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        ExportedFileSet {
            dir: dir.into(),
            files,
        }
    }

    /// Snapshot the regular files currently in `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(ExportedFileSet::new(dir, list_files(dir)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn pngs(&self) -> Vec<PathBuf> {
        self.files.iter().filter(|p| is_png(p)).cloned().collect()
    }

    /// Staged `<name>.png`, if the export produced it
    pub fn find_png(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|p| is_png(p) && p.file_stem().and_then(|s| s.to_str()) == Some(name))
            .map(PathBuf::as_path)
    }

    /// Font files for a font index, paired with the name they are placed under
    ///
    /// FFDec names fonts `<index>_<FontName>[_variant].ttf`; the placed name
    /// drops everything up to and including the first underscore.
    pub fn fonts_for_index(&self, index: u32) -> Vec<(&Path, String)> {
        let prefix = format!("{}_", index);
        self.files
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                let is_ttf = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("ttf"));
                let stripped = name.strip_prefix(&prefix)?;
                (is_ttf && !stripped.is_empty()).then(|| (path.as_path(), stripped.to_string()))
            })
            .collect()
    }
}

/// Something that can extract resources from an archive into a directory
pub trait Exporter {
    /// Export every resource of `kind` from `source` into `output_dir`.
    ///
    /// `output_dir` exists and is empty when this is called.
    fn export(&self, kind: ExportKind, source: &Path, output_dir: &Path)
        -> Result<ExportedFileSet>;
}

/// Invokes the FFDec command-line launcher
#[derive(Debug, Clone)]
pub struct FfdecExporter {
    pub install_dir: PathBuf,
    pub launcher: String,
    pub zoom: u32,
}

impl FfdecExporter {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        FfdecExporter {
            install_dir: install_dir.into(),
            launcher: default_launcher().to_string(),
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Build the decompiler invocation. Paths are made absolute because the
    /// child runs from the installation directory.
    pub fn command(&self, kind: ExportKind, source: &Path, output_dir: &Path) -> Result<Command> {
        let source = std::path::absolute(source).map_err(|e| Error::io(source, e))?;
        let output_dir = std::path::absolute(output_dir).map_err(|e| Error::io(output_dir, e))?;
        let install =
            std::path::absolute(&self.install_dir).map_err(|e| Error::io(&self.install_dir, e))?;

        let mut cmd = Command::new(install.join(&self.launcher));
        cmd.current_dir(&install);
        if kind == ExportKind::Shape {
            cmd.arg("-zoom")
                .arg(self.zoom.to_string())
                .arg("-format")
                .arg("shape:png");
        }
        cmd.arg("-export").arg(kind.as_str()).arg(output_dir).arg(source);
        Ok(cmd)
    }
}

impl Exporter for FfdecExporter {
    fn export(
        &self,
        kind: ExportKind,
        source: &Path,
        output_dir: &Path,
    ) -> Result<ExportedFileSet> {
        let mut cmd = self.command(kind, source, output_dir)?;
        let rendered = format!("{:?}", cmd);
        tracing::debug!("Running {}", rendered);

        let output = cmd.output().map_err(|e| Error::SubprocessFailure {
            command: rendered.clone(),
            reason: format!("failed to launch: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(Error::SubprocessFailure {
                command: rendered,
                reason: if detail.is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    format!("exited with {}: {}", output.status, detail)
                },
            });
        }

        let exported = ExportedFileSet::from_dir(output_dir)?;
        tracing::debug!(
            "Exported {} {} file(s) from {}",
            exported.len(),
            kind,
            source.display()
        );
        Ok(exported)
    }
}

fn default_launcher() -> &'static str {
    if cfg!(windows) {
        "ffdec.bat"
    } else {
        "ffdec.sh"
    }
}

/// Remove `dir` if present and recreate it empty
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Remove `dir` and its contents; a missing directory is not an error
pub fn remove_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}

/// Rename `from` to `to`, copying when they sit on different filesystems
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| Error::io(to, e))?;
    fs::remove_file(from).map_err(|e| Error::io(from, e))
}
