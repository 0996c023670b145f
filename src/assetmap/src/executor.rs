//! Asset map execution
//!
//! Parses the whole map up front, then walks each mapping block in order,
//! staging decompiler output and placing finished files into the
//! destination tree. Both staging directories live for the whole run and
//! are removed once at the end, whether or not the run succeeded.

use crate::batch::apply_to_files;
use crate::exporter::{
    move_file, remove_dir, reset_dir, ExportKind, ExportedFileSet, Exporter, FfdecExporter,
};
use crate::image_ops::{ImageOps, PngImageOps, ResizeFilter};
use crate::map::{self, AssetMap, Directive, FontEntry, MappingBlock, ShapeEntry};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Raw decompiler output, relative to the staging root
pub const RAW_STAGING_DIR: &str = "temp";

/// Border-cropped shapes, relative to the staging root
pub const CROP_STAGING_DIR: &str = "croptemp";

/// Everything a run needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// FFDec installation directory
    pub decompiler_path: PathBuf,
    /// Asset map source text
    pub asset_map_text: String,
    /// Root that mapping origins are resolved against
    pub origin_root: PathBuf,
    /// Root that mapping destinations are resolved against
    pub destination_root: PathBuf,
    /// Directory holding the two staging directories
    pub staging_root: PathBuf,
}

/// What a run placed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: usize,
    pub shapes: usize,
    pub fonts: usize,
    pub placed: Vec<PathBuf>,
}

pub struct Executor<E: Exporter, I: ImageOps = PngImageOps> {
    config: ExportConfig,
    exporter: E,
    images: I,
}

impl Executor<FfdecExporter> {
    /// Executor backed by the FFDec installation named in the config
    pub fn new(config: ExportConfig) -> Self {
        let exporter = FfdecExporter::new(&config.decompiler_path);
        Executor::with_exporter(config, exporter)
    }
}

impl<E: Exporter> Executor<E> {
    pub fn with_exporter(config: ExportConfig, exporter: E) -> Self {
        Executor {
            config,
            exporter,
            images: PngImageOps::default(),
        }
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.images.filter = filter;
        self
    }
}

impl<E: Exporter, I: ImageOps> Executor<E, I> {
    /// Swap the image transforms applied to staged shapes
    pub fn with_image_ops<J: ImageOps>(self, images: J) -> Executor<E, J> {
        Executor {
            config: self.config,
            exporter: self.exporter,
            images,
        }
    }

    pub fn raw_staging(&self) -> PathBuf {
        self.config.staging_root.join(RAW_STAGING_DIR)
    }

    pub fn crop_staging(&self) -> PathBuf {
        self.config.staging_root.join(CROP_STAGING_DIR)
    }

    /// Parse the configured asset map and execute it
    pub fn run(&self) -> Result<RunSummary> {
        let map = map::parse(&self.config.asset_map_text)?;
        self.execute(&map)
    }

    /// Execute an already parsed map, then tear down staging
    pub fn execute(&self, map: &AssetMap) -> Result<RunSummary> {
        let result = self.execute_blocks(map);
        let cleanup = remove_dir(&self.raw_staging()).and(remove_dir(&self.crop_staging()));

        let summary = result?;
        cleanup?;
        tracing::info!(
            "Placed {} shape(s) and {} font file(s) from {} mapping block(s)",
            summary.shapes,
            summary.fonts,
            summary.blocks
        );
        Ok(summary)
    }

    fn execute_blocks(&self, map: &AssetMap) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for block in &map.blocks {
            self.execute_block(block, &mut summary)?;
            summary.blocks += 1;
        }

        Ok(summary)
    }

    fn execute_block(&self, block: &MappingBlock, summary: &mut RunSummary) -> Result<()> {
        let origin = self.config.origin_root.join(&block.origin);
        let destination = self.config.destination_root.join(&block.destination);
        tracing::info!("{} -> {}", block.origin, block.destination);

        for directive in &block.directives {
            if directive.is_empty() {
                tracing::warn!(
                    "Empty '{}' directive in block at line {}",
                    directive.keyword(),
                    block.line
                );
            }
            match directive {
                Directive::Shape(entries) => {
                    self.export_shapes(&origin, &destination, entries, summary)?
                }
                Directive::Font(entries) => {
                    self.export_fonts(&origin, &destination, entries, summary)?
                }
            }
        }

        Ok(())
    }

    /// Stage `kind` resources of `origin` into a freshly cleared raw staging dir
    fn stage(&self, kind: ExportKind, origin: &Path) -> Result<ExportedFileSet> {
        let raw = self.raw_staging();
        reset_dir(&raw)?;
        let exported = self.exporter.export(kind, origin, &raw)?;
        tracing::info!(
            "Staged {} {} file(s) from {}",
            exported.len(),
            kind,
            origin.display()
        );
        Ok(exported)
    }

    fn export_shapes(
        &self,
        origin: &Path,
        destination: &Path,
        entries: &[ShapeEntry],
        summary: &mut RunSummary,
    ) -> Result<()> {
        let exported = self.stage(ExportKind::Shape, origin)?;

        let crop = self.crop_staging();
        reset_dir(&crop)?;
        let cropped = apply_to_files(&exported.pngs(), &crop, |input, output| {
            self.images.crop_export_border(input, output)
        })?;
        let cropped = ExportedFileSet::new(&crop, cropped);

        for entry in entries {
            let source = cropped
                .find_png(&entry.internal_name)
                .ok_or_else(|| Error::MissingResource {
                    path: crop.join(format!("{}.png", entry.internal_name)),
                })?;
            let target = destination.join(format!("{}.png", entry.output_name));

            self.images.scale_image(source, &target, entry.scale)?;
            tracing::debug!("Placed {}", target.display());

            summary.shapes += 1;
            summary.placed.push(target);
        }

        Ok(())
    }

    fn export_fonts(
        &self,
        origin: &Path,
        destination: &Path,
        entries: &[FontEntry],
        summary: &mut RunSummary,
    ) -> Result<()> {
        let exported = self.stage(ExportKind::Font, origin)?;

        for entry in entries {
            let fonts = exported.fonts_for_index(entry.index);
            if fonts.is_empty() {
                return Err(Error::MissingResource {
                    path: exported.dir().join(format!("{}_*.ttf", entry.index)),
                });
            }

            for (source, name) in fonts {
                let target = destination.join(name);
                move_file(source, &target)?;
                tracing::debug!("Placed {}", target.display());

                summary.fonts += 1;
                summary.placed.push(target);
            }
        }

        Ok(())
    }
}
