//! Icon discovery, squaring, and resizing.
//!
//! The first `*.png` in the input directory (case-insensitive) becomes the
//! package icon. A missing icon is not an error; the package is built
//! without icon files.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};

pub const ICON_EXTENSION: &str = ".png";

/// One encoded icon file, relative to the app directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconOutput {
    pub size: u32,
    pub path: &'static str,
}

pub const ICON_OUTPUTS: &[IconOutput] = &[
    IconOutput {
        size: 64,
        path: "ICON.PNG",
    },
    IconOutput {
        size: 256,
        path: "ICON_256.PNG",
    },
    IconOutput {
        size: 64,
        path: "app/ui/images/icon-64.png",
    },
    IconOutput {
        size: 256,
        path: "app/ui/images/icon-256.png",
    },
];

/// Find, square, resize, and write the package icons.
///
/// Returns the source icon path, or `None` when the input has no icon.
pub fn process_icons(input_dir: &Path, app_dir: &Path) -> Result<Option<PathBuf>, IconError> {
    let Some(icon_path) = find_icon(input_dir)? else {
        tracing::debug!(dir = %input_dir.display(), "no icon found, skipping icons");
        return Ok(None);
    };
    tracing::debug!(path = %icon_path.display(), "found icon");

    let source = image::open(&icon_path).map_err(|e| IconError::Decode {
        path: icon_path.clone(),
        source: e,
    })?;

    let square = square_image(source);
    tracing::debug!(
        width = square.width(),
        height = square.height(),
        "icon prepared"
    );

    for output in ICON_OUTPUTS {
        let dest = app_dir.join(output.path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IconError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        resize_icon(&square, output.size)
            .save_with_format(&dest, ImageFormat::Png)
            .map_err(|e| IconError::Encode {
                path: dest.clone(),
                source: e,
            })?;
        tracing::debug!(path = %dest.display(), size = output.size, "written icon");
    }

    Ok(Some(icon_path))
}

/// The first regular file in `dir` ending in `.png`, by file name.
pub fn find_icon(dir: &Path) -> Result<Option<PathBuf>, IconError> {
    let entries = std::fs::read_dir(dir).map_err(|e| IconError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IconError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_png = entry
            .file_name()
            .to_string_lossy()
            .to_ascii_lowercase()
            .ends_with(ICON_EXTENSION);
        if is_png {
            candidates.push(path);
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Pad a non-square image onto a transparent square canvas, centered.
///
/// The canvas side is the larger dimension. Offsets use integer division,
/// so an odd difference leaves the extra pixel on the bottom/right. Square
/// input is returned untouched.
pub fn square_image(source: DynamicImage) -> DynamicImage {
    let (width, height) = source.dimensions();
    if width == height {
        return source;
    }

    let size = width.max(height);
    let mut canvas = RgbaImage::new(size, size);
    let offset_x = (size - width) / 2;
    let offset_y = (size - height) / 2;
    imageops::replace(
        &mut canvas,
        &source.to_rgba8(),
        i64::from(offset_x),
        i64::from(offset_y),
    );

    DynamicImage::ImageRgba8(canvas)
}

/// Lanczos resize to `size`×`size`.
pub fn resize_icon(source: &DynamicImage, size: u32) -> DynamicImage {
    source.resize_exact(size, size, FilterType::Lanczos3)
}

#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("failed to read input directory {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open icon {path}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to save icon {path}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}
