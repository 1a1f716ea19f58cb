//! Image sources
//!
//! Resolves an item's icon from a theme name, a file path, or an
//! in-memory pixbuf. Sources are capability objects: a failed lookup
//! or decode degrades to "no image this frame" instead of raising.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;
use tracing::warn;

/// Error at the decode seam. Callers of the trait surface never see
/// it; `get_pixbuf` degrades to `None`.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Resolves a themed/file/memory icon at a requested size.
pub trait ImageSource {
    /// The image for the given size, or `None` if unavailable.
    fn get_pixbuf(&self, size: u32) -> Option<RgbaImage>;

    /// The backing file path, or `None` for in-memory sources.
    fn get_path(&self, _size: u32) -> Option<PathBuf> {
        None
    }
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage, ImageLoadError> {
    let data = std::fs::read(path)?;
    let img = image::load_from_memory(&data)?;
    Ok(img.to_rgba8())
}

/// Looks an icon name up across a list of theme directories.
pub struct ThemedIcon {
    pub icon_name: String,
    search_dirs: Vec<PathBuf>,
}

impl ThemedIcon {
    pub fn new(icon_name: &str, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            icon_name: icon_name.to_string(),
            search_dirs,
        }
    }

    fn lookup(&self) -> Option<PathBuf> {
        for dir in &self.search_dirs {
            for ext in ["png", "PNG"] {
                let candidate = dir.join(format!("{}.{ext}", self.icon_name));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

impl ImageSource for ThemedIcon {
    fn get_pixbuf(&self, _size: u32) -> Option<RgbaImage> {
        let path = self.lookup()?;
        match load_image(&path) {
            Ok(img) => Some(img),
            Err(err) => {
                warn!(icon = %self.icon_name, path = %path.display(), "themed icon failed to load: {err}");
                None
            }
        }
    }

    fn get_path(&self, _size: u32) -> Option<PathBuf> {
        self.lookup()
    }
}

/// Loads an icon from a fixed path.
pub struct FileIcon {
    pub path: PathBuf,
}

impl FileIcon {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileIcon {
    fn get_pixbuf(&self, _size: u32) -> Option<RgbaImage> {
        match load_image(&self.path) {
            Ok(img) => Some(img),
            Err(err) => {
                warn!(path = %self.path.display(), "file icon failed to load: {err}");
                None
            }
        }
    }

    fn get_path(&self, _size: u32) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Wraps an already existing pixbuf.
pub struct PixbufIcon {
    pub pixbuf: RgbaImage,
}

impl PixbufIcon {
    pub fn new(pixbuf: RgbaImage) -> Self {
        Self { pixbuf }
    }
}

impl ImageSource for PixbufIcon {
    fn get_pixbuf(&self, _size: u32) -> Option<RgbaImage> {
        Some(self.pixbuf.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pixbuf_icon_returns_image() {
        let source = PixbufIcon::new(RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 4])));
        let img = source.get_pixbuf(32).unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));
        assert!(source.get_path(32).is_none());
    }

    #[test]
    fn test_file_icon_missing_degrades_to_none() {
        let source = FileIcon::new("/nonexistent/definitely/missing.png");
        assert!(source.get_pixbuf(32).is_none());
        // The path is still reported; only the pixel data is missing.
        assert!(source.get_path(32).is_some());
    }

    #[test]
    fn test_file_icon_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(4, 4, Rgba([9, 8, 7, 255]))
            .save(&path)
            .unwrap();

        let source = FileIcon::new(&path);
        let img = source.get_pixbuf(32).unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
        assert_eq!(img.get_pixel(0, 0)[0], 9);
    }

    #[test]
    fn test_file_icon_corrupt_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let source = FileIcon::new(&path);
        assert!(source.get_pixbuf(32).is_none());
    }

    #[test]
    fn test_themed_icon_searches_dirs_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([1, 0, 0, 255]))
            .save(second.path().join("app.png"))
            .unwrap();

        let source = ThemedIcon::new(
            "app",
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );
        let path = source.get_path(32).unwrap();
        assert!(path.starts_with(second.path()));
        assert!(source.get_pixbuf(32).is_some());
    }

    #[test]
    fn test_themed_icon_unknown_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = ThemedIcon::new("ghost", vec![dir.path().to_path_buf()]);
        assert!(source.get_pixbuf(32).is_none());
        assert!(source.get_path(32).is_none());
    }
}
