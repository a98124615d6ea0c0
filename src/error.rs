// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Pushing a frame to the window failed (treated as the surface going away).
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// The photograph could not be opened or decoded. Fatal, happens before any state exists.
    #[error("cannot open {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A decoded image with nothing in it.
    #[error("invalid image dimensions: {width}×{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Writing the stencil failed. Recoverable: the session keeps running.
    #[error("cannot write {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
