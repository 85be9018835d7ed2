//! Image sizing and resolution
//!
//! Pictures are sized in HWPUNIT from the requested `width`/`height`
//! attributes and, when the file can be decoded, its pixel dimensions.
//!
//! # Units
//!
//! - 1 mm = 283.465 HWPUNIT
//! - 1 px = 25.4 / 96 mm (unit-less values and unknown units are pixels)
//! - 1 pt = 25.4 / 72 mm, 1 in = 25.4 mm, 1 cm = 10 mm
//! - `%` is a share of a fixed page width ([`LayoutConfig::percent_basis_mm`])

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{LayoutConfig, HWPUNIT_PER_MM};
use crate::error::Result;

/// Millimetres per CSS pixel
const MM_PER_PX: f64 = 25.4 / 96.0;

/// HWPUNIT per CSS pixel
pub const HWPUNIT_PER_PX: f64 = MM_PER_PX * HWPUNIT_PER_MM;

/// Parse a dimension such as `300px`, `5cm` or `50%` into HWPUNIT
///
/// Returns `None` for empty or malformed values.
pub fn parse_dimension(value: &str, percent_basis_mm: f64) -> Option<u32> {
    static DIMENSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = DIMENSION_RE.get_or_init(|| Regex::new(r"^([0-9.]+)([a-z%]+)?$").unwrap());

    let lowered = value.trim().to_lowercase();
    let caps = re.captures(&lowered)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let mm = match caps.get(2).map(|m| m.as_str()) {
        None | Some("px") => number * MM_PER_PX,
        Some("in") => number * 25.4,
        Some("cm") => number * 10.0,
        Some("mm") => number,
        Some("pt") => number * 25.4 / 72.0,
        Some("%") => number * percent_basis_mm / 100.0,
        Some(_) => number * MM_PER_PX,
    };
    Some((mm * HWPUNIT_PER_MM) as u32)
}

/// Source of pixel dimensions for image files
pub trait ImageMetrics {
    /// Pixel width and height of the image at `path`
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;
}

/// Reads dimensions with the `image` crate's decoders
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoderMetrics;

impl ImageMetrics for DecoderMetrics {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        Ok(image::image_dimensions(path)?)
    }
}

/// Compute the final picture size in HWPUNIT
///
/// With known pixel dimensions, a missing requested dimension follows the
/// source aspect ratio, and with nothing requested the pixel size is used.
/// Without pixels the requested values (or the default) are used. The width
/// is finally clamped to the page text width, scaling the height with it.
pub fn compute_image_size(
    requested_width: Option<u32>,
    requested_height: Option<u32>,
    pixels: Option<(u32, u32)>,
    config: &LayoutConfig,
) -> (u32, u32) {
    let default = config.default_image_size;
    let (mut width, mut height) = match (pixels, requested_width, requested_height) {
        (Some(_), Some(w), Some(h)) => (w, h),
        (Some((px_w, px_h)), Some(w), None) => {
            let ratio = f64::from(px_h) / f64::from(px_w.max(1));
            (w, (f64::from(w) * ratio) as u32)
        }
        (Some((px_w, px_h)), None, Some(h)) => {
            let ratio = f64::from(px_w) / f64::from(px_h.max(1));
            ((f64::from(h) * ratio) as u32, h)
        }
        (Some((px_w, px_h)), None, None) => (
            (f64::from(px_w) * HWPUNIT_PER_PX) as u32,
            (f64::from(px_h) * HWPUNIT_PER_PX) as u32,
        ),
        (None, w, h) => (w.unwrap_or(default), h.unwrap_or(default)),
    };

    let max_width = config.page_text_width;
    if width > max_width {
        let ratio = f64::from(max_width) / f64::from(width);
        width = max_width;
        height = (f64::from(height) * ratio) as u32;
    }
    (width, height)
}

/// Archive file extension for an image source
///
/// Vector images keep their own extension; their bytes are embedded as is.
pub fn image_extension(source: &str) -> &'static str {
    let lower = source.to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "jpg"
    } else if lower.ends_with(".gif") {
        "gif"
    } else if lower.ends_with(".bmp") {
        "bmp"
    } else if lower.ends_with(".svg") {
        "svg"
    } else {
        "png"
    }
}

/// Get the MIME type for an archive image extension
pub fn media_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

/// Resolve an image reference to an existing file
///
/// Tries the path as given when absolute, then relative to `input_dir`,
/// then relative to the working directory.
pub fn resolve_image_path(source: &str, input_dir: &Path) -> Option<PathBuf> {
    let path = Path::new(source);
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }
    let candidate = input_dir.join(path);
    if candidate.exists() {
        return Some(candidate);
    }
    if path.exists() {
        return std::fs::canonicalize(path).ok().or_else(|| Some(path.to_path_buf()));
    }
    None
}

/// An image referenced from the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Binary item ID, e.g. `image1`
    pub id: String,
    /// Source path as written in the document
    pub source: String,
    /// Existing file the source resolved to
    pub resolved: Option<PathBuf>,
    /// Width in HWPUNIT
    pub width: u32,
    /// Height in HWPUNIT
    pub height: u32,
    /// Archive extension without the dot
    pub extension: &'static str,
}

impl ImageRef {
    /// Entry name inside the package
    pub fn archive_path(&self) -> String {
        format!("BinData/{}.{}", self.id, self.extension)
    }

    pub fn media_type(&self) -> &'static str {
        media_type_for_extension(self.extension)
    }
}
