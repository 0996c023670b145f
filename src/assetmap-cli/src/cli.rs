//! CLI argument definitions for assetmap

use assetmap::ResizeFilter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetmap")]
#[command(about = "Export SWF shapes and fonts into a game asset tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log every staged and placed file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the asset map: export, crop, scale and place every listed asset
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Parse the asset map and print what it would do
    Check {
        /// Asset map file
        #[arg(short, long, default_value = "AssetExporting/assetmap.txt")]
        map: PathBuf,

        /// Print the parsed map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the one-pixel export border from every PNG in a directory
    Crop {
        /// Directory with exported PNGs
        input: PathBuf,
        /// Output directory (created if missing)
        output: PathBuf,
    },

    /// Trim fully transparent edges from every PNG in a directory
    Trim {
        /// Directory with PNGs
        input: PathBuf,
        /// Output directory (created if missing)
        output: PathBuf,
    },

    /// Rescale a single image
    Scale {
        /// Input PNG
        input: PathBuf,
        /// Output PNG
        output: PathBuf,
        /// Scale factors as "sx,sy" (e.g. "0.5,0.5" or "1/10,1/10")
        #[arg(short, long)]
        scale: String,
        /// Resampling filter
        #[arg(long, value_enum, default_value = "catmull-rom")]
        filter: FilterArg,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the FFDec installation directory
        #[arg(long)]
        decompiler: Option<PathBuf>,

        /// Set the FFDec launcher script name
        #[arg(long)]
        launcher: Option<String>,

        /// Set the zoom used for shape exports
        #[arg(long)]
        zoom: Option<u32>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding assetmap.txt, ffdec-path.txt and OriginalAssets/
    #[arg(short, long, default_value = "AssetExporting")]
    pub export_dir: PathBuf,

    /// Asset map file (default: <export-dir>/assetmap.txt)
    #[arg(short, long)]
    pub map: Option<PathBuf>,

    /// Root for mapping origins (default: <export-dir>/OriginalAssets)
    #[arg(short, long)]
    pub origin: Option<PathBuf>,

    /// Root for mapping destinations
    #[arg(short, long, default_value = "Assets")]
    pub destination: PathBuf,

    /// Where the temp/ and croptemp/ staging directories go (default: <export-dir>)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// FFDec installation directory
    #[arg(long, env = "FFDEC_PATH")]
    pub decompiler: Option<PathBuf>,

    /// Resampling filter for scaled shapes
    #[arg(long, value_enum, default_value = "catmull-rom")]
    pub filter: FilterArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<FilterArg> for ResizeFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResizeFilter::Nearest,
            FilterArg::Triangle => ResizeFilter::Triangle,
            FilterArg::CatmullRom => ResizeFilter::CatmullRom,
            FilterArg::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}
