// Writes stencils to disk as numbered files next to each other:
// photo_pochoir_001.png, photo_pochoir_002.png, ...
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::info;

use crate::error::{Error, Result};

pub struct StencilSink {
    dir: PathBuf,
    stem: String,
    /// Number the next save will try first.
    counter: u32,
    /// Successful writes this session.
    saved: u32,
}

impl StencilSink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self { dir: dir.into(), stem: stem.into(), counter: 1, saved: 0 }
    }

    /// Stencils written so far this session.
    pub fn saved(&self) -> u32 {
        self.saved
    }

    /// `<dir>/<stem>_pochoir_<NNN>.png`, skipping names already on disk.
    pub fn next_path(&self) -> (u32, PathBuf) {
        let mut n = self.counter;
        loop {
            let path = self.dir.join(format!("{}_pochoir_{:03}.png", self.stem, n));
            if !path.exists() {
                return (n, path);
            }
            n += 1;
        }
    }

    /// Encode and write. On failure nothing advances and the caller carries on.
    pub fn save(&mut self, stencil: &GrayImage) -> Result<PathBuf> {
        let (n, path) = self.next_path();
        write_stencil(&path, stencil)?;
        self.counter = n + 1;
        self.saved += 1;
        info!(path = %path.display(), "stencil saved");
        Ok(path)
    }
}

/// Write a 0/255 buffer losslessly; the format follows the extension.
pub fn write_stencil(path: &Path, stencil: &GrayImage) -> Result<()> {
    stencil.save(path).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })
}
