//! Pochoir: interactive stencil maker.
//!
//! A photograph is thresholded into a black/white stencil while the user
//! paints regions that freeze whenever the threshold slider moves. The core
//! (`vision`, `masks`, `freeze`, `compose`, `viewport`, `brush`, `session`)
//! is headless; `draw` and `panel` are the window-facing parts.

pub mod brush;
pub mod compose;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod freeze;
pub mod masks;
pub mod panel;
pub mod params;
pub mod session;
pub mod source;
pub mod types;
pub mod viewport;
pub mod vision;

pub use error::{Error, Result};
pub use session::{Session, TickReport};
pub use types::{Controls, FilterParameters, Isolate};
