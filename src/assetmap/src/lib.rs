//! Asset-map interpreter for FFDec exports
//!
//! Reads a line-oriented asset map describing which shapes and fonts to pull
//! out of each SWF archive, drives the FFDec decompiler to stage them, then
//! finalizes every file into the game's asset tree.
//!
//! # Asset Map Format
//!
//! ```text
//! interface.swf -> UI/Interface
//! shape
//! 12 = close_button
//! 40 = background[0.5,0.5]
//! font
//! 3
//!
//! game.swf -> Games/ThinIce
//! shape
//! 7 = tile[1/10,1/10]
//! ```
//!
//! - A mapping block starts with `<origin> -> <destination>` and ends at a
//!   blank line or the end of the file.
//! - `shape` sub-lines map an exported shape name to an output PNG name,
//!   optionally followed by `[sx,sy]` scale expressions.
//! - `font` sub-lines are bare font indices; every `<index>_*.ttf` the
//!   decompiler produced is moved into the destination with the prefix
//!   stripped.

pub mod batch;
pub mod executor;
pub mod exporter;
pub mod image_ops;
pub mod map;
pub mod scale;

use std::path::PathBuf;

pub use batch::{apply_to_directory, apply_to_files, list_png_files};
pub use executor::{ExportConfig, Executor, RunSummary};
pub use exporter::{ExportKind, ExportedFileSet, Exporter, FfdecExporter};
pub use image_ops::{
    crop_export_border, scale_image, trim_transparent_border, ImageOps, PngImageOps, ResizeFilter,
};
pub use map::{parse as parse_map, AssetMap, Directive, FontEntry, MappingBlock, ShapeEntry};
pub use scale::Scale;

/// Errors from parsing or executing an asset map
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("line {line}: malformed asset map: {reason}")]
    MalformedMap { line: usize, reason: String },

    #[error("line {line}: unknown directive '{directive}' (expected 'shape' or 'font')")]
    UnknownDirective { line: usize, directive: String },

    #[error("missing resource: {path}")]
    MissingResource { path: PathBuf },

    #[error("decompiler failed ({command}): {reason}")]
    SubprocessFailure { command: String, reason: String },

    #[error("invalid scale '{expr}': {reason}")]
    InvalidScale { expr: String, reason: String },

    #[error("degenerate image {path}: {reason}")]
    DegenerateImage { path: PathBuf, reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Error::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_line_numbers() {
        let err = Error::UnknownDirective {
            line: 3,
            directive: "sprite".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 3: unknown directive 'sprite' (expected 'shape' or 'font')"
        );

        let err = Error::MalformedMap {
            line: 1,
            reason: "expected '<origin> -> <destination>'".to_string(),
        };
        assert!(err.to_string().starts_with("line 1: malformed asset map"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = Error::io(
            "staging/temp",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("staging/temp"));
    }
}
