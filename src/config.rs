// Fixed knobs of the editor plus the command line.
use std::path::PathBuf;

use clap::Parser;

use crate::types::{Controls, FilterParameters, Isolate};

/* --- Window layout --- */

/// Viewport size. The image is cropped to this, never scaled.
pub const VIEW_W: usize = 1024;
pub const VIEW_H: usize = 600;
/// Slider strip drawn under the viewport.
pub const PANEL_H: usize = 104;

/// One tick per 20 ms: the bounded wait where pending input is absorbed.
pub const TARGET_FPS: usize = 50;

/// Arrow keys pan by this many pixels per press.
pub const KEY_PAN_STEP: i32 = 32;

/* --- Colors (0x00RRGGBB) --- */

pub const FROZEN_TINT: u32 = 0x00_00_00_FF;        // blue
pub const PENDING_TINT: u32 = 0x00_00_FF_00;       // green
pub const PREVIEW_PAINT_TINT: u32 = 0x00_00_FF_00; // green
pub const PREVIEW_ERASE_TINT: u32 = 0x00_FF_00_00; // red
/// Letterbox when the image is smaller than the viewport.
pub const BACKGROUND: u32 = 0x00_30_30_30;
/// Brush preview opacity, in tenths.
pub const PREVIEW_ALPHA_TENTHS: u32 = 3;

/* --- Slider ranges --- */

pub const THRESHOLD_MAX: i32 = 255;
pub const SIMPLIFY_MAX: i32 = 20;
pub const MEDIAN_MAX: i32 = 10;
pub const ISOLATE_MAX: i32 = 2;
pub const BRUSH_MIN: i32 = 4;
pub const BRUSH_MAX: i32 = 64;

/// Pochoir: derive a black/white stencil from a photo, freezing regions as you go.
///
/// Left drag paints the pending zone (green); it freezes (blue) when the
/// threshold moves. Right drag pans. E toggles eraser, S saves, C clears,
/// Esc/Q quits.
#[derive(Parser, Debug)]
#[command(name = "pochoir", version)]
pub struct Args {
    /// Photograph to work from (png, jpeg, bmp, tiff, ...).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where saved stencils go. Defaults to the input's directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Initial threshold (0-255).
    #[arg(short, long, default_value_t = 128)]
    pub threshold: i32,

    /// Initial simplify radius (0-20).
    #[arg(short, long, default_value_t = 1)]
    pub simplify: i32,

    /// Initial median radius (0-10).
    #[arg(short, long, default_value_t = 0)]
    pub median: i32,

    /// Initial isolate mode: -1 keep background, 0 off, 1 keep subject.
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    pub isolate: i32,

    /// Initial brush radius in pixels (4-64).
    #[arg(short, long, default_value_t = 16)]
    pub brush: i32,
}

impl Args {
    /// Starting slider values, clamped to the slider ranges.
    pub fn initial_controls(&self) -> Controls {
        Controls {
            filter: FilterParameters {
                threshold: self.threshold.clamp(0, THRESHOLD_MAX) as u8,
                simplify: self.simplify.clamp(0, SIMPLIFY_MAX) as u32,
                median: self.median.clamp(0, MEDIAN_MAX) as u32,
                isolate: Isolate::from_signed(self.isolate),
            },
            brush: self.brush.clamp(BRUSH_MIN, BRUSH_MAX) as u32,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_slider_defaults() {
        let args = Args::parse_from(["pochoir", "photo.jpg"]);
        let c = args.initial_controls();
        assert_eq!(c.filter, FilterParameters::default());
        assert_eq!(c.brush, 16);
        assert_eq!(args.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let args = Args::parse_from([
            "pochoir", "in/photo.png", "-t", "400", "-s", "99", "-i", "-1", "-b", "1",
        ]);
        let c = args.initial_controls();
        assert_eq!(c.filter.threshold, 255);
        assert_eq!(c.filter.simplify, 20);
        assert_eq!(c.filter.isolate, Isolate::Background);
        assert_eq!(c.brush, 4);
        assert_eq!(args.output_dir(), PathBuf::from("in"));
    }
}
