//! Image primitives applied to decompiler output
//!
//! FFDec renders every shape one pixel too wide and one pixel too tall, so
//! staged PNGs pass through [`crop_export_border`] before anything else.

use crate::scale::Scale;
use crate::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::path::Path;

/// Resampling filter used when rescaling shapes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Image transforms the executor applies to staged shapes
pub trait ImageOps {
    /// Drop the extra right column and bottom row from a decompiler render
    fn crop_export_border(&self, input: &Path, output: &Path) -> Result<()>;

    /// Resize by independent X/Y factors
    fn scale_image(&self, input: &Path, output: &Path, scale: Scale) -> Result<()>;
}

/// [`ImageOps`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngImageOps {
    pub filter: ResizeFilter,
}

impl PngImageOps {
    pub fn new(filter: ResizeFilter) -> Self {
        PngImageOps { filter }
    }
}

impl ImageOps for PngImageOps {
    fn crop_export_border(&self, input: &Path, output: &Path) -> Result<()> {
        crop_export_border(input, output)
    }

    fn scale_image(&self, input: &Path, output: &Path, scale: Scale) -> Result<()> {
        scale_image(input, output, scale, self.filter)
    }
}

fn load(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            Error::MissingResource {
                path: path.to_path_buf(),
            }
        }
        other => Error::image(path, other),
    })
}

fn save(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|e| Error::image(path, e))
}

/// Target dimensions for a scale, rounded to the nearest pixel
pub fn scaled_dimensions(width: u32, height: u32, scale: Scale) -> (u32, u32) {
    let w = (f64::from(width) * scale.x).round();
    let h = (f64::from(height) * scale.y).round();
    (w.clamp(0.0, f64::from(u32::MAX)) as u32, h.clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Load `input`, resize it by independent X/Y factors and save to `output`
pub fn scale_image(input: &Path, output: &Path, scale: Scale, filter: ResizeFilter) -> Result<()> {
    let img = load(input)?;

    if scale.is_identity() {
        return save(&img, output);
    }

    let (width, height) = scaled_dimensions(img.width(), img.height(), scale);
    if width == 0 || height == 0 {
        return Err(Error::DegenerateImage {
            path: input.to_path_buf(),
            reason: format!(
                "scaling {}x{} by ({}, {}) gives {}x{}",
                img.width(),
                img.height(),
                scale.x,
                scale.y,
                width,
                height
            ),
        });
    }

    tracing::debug!(
        "Scaling {} {}x{} -> {}x{}",
        input.display(),
        img.width(),
        img.height(),
        width,
        height
    );
    save(&img.resize_exact(width, height, filter.into()), output)
}

/// Remove the last column and last row added by the decompiler
pub fn crop_export_border(input: &Path, output: &Path) -> Result<()> {
    let img = load(input)?;
    let (width, height) = img.dimensions();
    if width <= 1 || height <= 1 {
        return Err(Error::DegenerateImage {
            path: input.to_path_buf(),
            reason: format!("cannot crop export border from a {}x{} image", width, height),
        });
    }

    tracing::debug!("Cropped export border: {}", input.display());
    save(&img.crop_imm(0, 0, width - 1, height - 1), output)
}

/// Strip fully transparent rows and columns from every edge
pub fn trim_transparent_border(input: &Path, output: &Path) -> Result<()> {
    let img = load(input)?;
    if !img.color().has_alpha() {
        return save(&img, output);
    }

    let bounds = opaque_bounds(&img.to_rgba8()).ok_or_else(|| Error::DegenerateImage {
        path: input.to_path_buf(),
        reason: "image is fully transparent".to_string(),
    })?;

    save(
        &img.crop_imm(bounds.left, bounds.top, bounds.width(), bounds.height()),
        output,
    )
}

/// Half-open pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Shrink edges one at a time (top, right, left, bottom) while they are fully
/// transparent. Returns `None` once either dimension reaches zero.
pub fn opaque_bounds(img: &RgbaImage) -> Option<Bounds> {
    let transparent = |x: u32, y: u32| img.get_pixel(x, y)[3] == 0;
    let mut b = Bounds {
        left: 0,
        top: 0,
        right: img.width(),
        bottom: img.height(),
    };

    if b.width() == 0 || b.height() == 0 {
        return None;
    }

    while b.height() > 0 && (b.left..b.right).all(|x| transparent(x, b.top)) {
        b.top += 1;
    }
    if b.height() == 0 {
        return None;
    }

    while b.width() > 0 && (b.top..b.bottom).all(|y| transparent(b.right - 1, y)) {
        b.right -= 1;
    }
    if b.width() == 0 {
        return None;
    }

    while b.width() > 0 && (b.top..b.bottom).all(|y| transparent(b.left, y)) {
        b.left += 1;
    }
    while b.height() > 0 && (b.left..b.right).all(|x| transparent(x, b.bottom - 1)) {
        b.bottom -= 1;
    }

    (b.width() > 0 && b.height() > 0).then_some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::PathBuf;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    /// 10x8 transparent canvas with an opaque 3x2 block at (4, 2)
    fn framed() -> RgbaImage {
        RgbaImage::from_fn(10, 8, |x, y| {
            if (4..7).contains(&x) && (2..4).contains(&y) {
                RED
            } else {
                CLEAR
            }
        })
    }

    #[test]
    fn test_crop_export_border_shrinks_by_one() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &RgbaImage::from_pixel(7, 5, RED));
        let output = dir.path().join("out.png");

        crop_export_border(&input, &output).unwrap();

        let out = image::open(&output).unwrap();
        assert_eq!(out.dimensions(), (6, 4));
    }

    #[test]
    fn test_crop_export_border_keeps_top_left_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let input = write_png(dir.path(), "in.png", &img);
        let output = dir.path().join("out.png");

        crop_export_border(&input, &output).unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(1, 1), &Rgba([1, 1, 0, 255]));
    }

    #[test]
    fn test_crop_export_border_rejects_single_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &RgbaImage::from_pixel(1, 1, RED));
        let output = dir.path().join("out.png");

        let err = crop_export_border(&input, &output).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let err = crop_export_border(&dir.path().join("nope.png"), &dir.path().join("out.png"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
    }

    #[test]
    fn test_opaque_bounds() {
        let bounds = opaque_bounds(&framed()).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                left: 4,
                top: 2,
                right: 7,
                bottom: 4
            }
        );
    }

    #[test]
    fn test_opaque_bounds_fully_transparent_terminates() {
        assert_eq!(opaque_bounds(&RgbaImage::from_pixel(5, 5, CLEAR)), None);
        assert_eq!(opaque_bounds(&RgbaImage::from_pixel(1, 1, CLEAR)), None);
        assert_eq!(opaque_bounds(&RgbaImage::new(0, 0)), None);
    }

    #[test]
    fn test_trim_transparent_border() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &framed());
        let output = dir.path().join("out.png");

        trim_transparent_border(&input, &output).unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (3, 2));
        assert!(out.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_trim_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &framed());
        let once = dir.path().join("once.png");
        let twice = dir.path().join("twice.png");

        trim_transparent_border(&input, &once).unwrap();
        trim_transparent_border(&once, &twice).unwrap();

        let a = image::open(&once).unwrap().to_rgba8();
        let b = image::open(&twice).unwrap().to_rgba8();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_trim_fully_transparent_is_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &RgbaImage::from_pixel(4, 4, CLEAR));
        let err = trim_transparent_border(&input, &dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { .. }));
    }

    #[test]
    fn test_scale_identity_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &framed());
        let output = dir.path().join("out.png");

        scale_image(&input, &output, Scale::IDENTITY, ResizeFilter::default()).unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (10, 8));
        assert_eq!(out.as_raw(), framed().as_raw());
    }

    #[test]
    fn test_scale_independent_axes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &RgbaImage::from_pixel(10, 8, RED));
        let output = dir.path().join("out.png");

        scale_image(&input, &output, Scale::new(2.0, 0.5), ResizeFilter::Nearest).unwrap();

        assert_eq!(image::open(&output).unwrap().dimensions(), (20, 4));
    }

    #[test]
    fn test_scale_to_zero_is_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &RgbaImage::from_pixel(4, 4, RED));
        let err = scale_image(
            &input,
            &dir.path().join("out.png"),
            Scale::new(0.1, 1.0),
            ResizeFilter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { .. }));
    }

    #[test]
    fn test_scaled_dimensions_round() {
        assert_eq!(scaled_dimensions(10, 10, Scale::new(0.25, 0.375)), (3, 4));
        assert_eq!(scaled_dimensions(3, 3, Scale::new(1.0 / 3.0, 2.0)), (1, 6));
    }
}
