// Loads the photograph once at startup.
// Visual expectation: nothing on screen yet; we just hold the grayscale copy
// the filter pipeline reads every tick.
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::info;

use crate::error::{Error, Result};

pub struct SourceImage {
    pub path: PathBuf,
    pub gray: GrayImage,
}

impl SourceImage {
    /// Decode any format the `image` crate knows and keep the luma channel.
    /// Fails before any session state exists.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let gray = non_empty(decoded.to_luma8())?;

        info!(path = %path.display(), width = gray.width(), height = gray.height(), "image loaded");
        Ok(Self { path: path.to_path_buf(), gray })
    }

    /// Wrap an already-decoded grayscale buffer. Empty images are rejected.
    pub fn from_gray(gray: GrayImage) -> Result<Self> {
        Ok(Self { path: PathBuf::new(), gray: non_empty(gray)? })
    }

    /// File stem used to name saved stencils ("photo" for "photo.jpg").
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("stencil"))
    }
}

fn non_empty(gray: GrayImage) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("pochoir_test_missing").join("nope.png");
        match SourceImage::open(&path) {
            Err(Error::Load { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected load error, got {:?}", other.err()),
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(
            SourceImage::from_gray(GrayImage::new(0, 5)),
            Err(Error::EmptyImage { width: 0, height: 5 })
        ));
    }

    #[test]
    fn color_image_loads_as_gray() {
        let dir = std::env::temp_dir().join("pochoir_test_source");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("photo.png");
        image::RgbImage::from_pixel(6, 4, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let src = SourceImage::open(&path).unwrap();
        assert_eq!(src.gray.dimensions(), (6, 4));
        assert!(src.gray.pixels().all(|p| p.0[0] == 255));
        assert_eq!(src.stem(), "photo");
        assert_eq!(src.path, path);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
