// The four session buffers, allocated once per image and never resized.
// Visual: pending shows green, frozen shows blue, frozen_result is what the
// blue areas are locked to, last_output is the stencil as of the previous tick.
use image::GrayImage;

use crate::vision::ON;

pub struct StencilState {
    /// Painted since the last commit (0 / 255).
    pub pending: GrayImage,
    /// Locked pixels (0 / 255).
    pub frozen: GrayImage,
    /// Locked value per pixel; only meaningful where `frozen` is set.
    pub frozen_result: GrayImage,
    /// Pipeline output from the previous tick; the source of truth for a commit.
    pub last_output: GrayImage,
}

impl StencilState {
    /// Empty masks sized like `initial_output`, which becomes the first `last_output`.
    pub fn new(initial_output: GrayImage) -> Self {
        let (w, h) = initial_output.dimensions();
        Self {
            pending: GrayImage::new(w, h),
            frozen: GrayImage::new(w, h),
            frozen_result: GrayImage::new(w, h),
            last_output: initial_output,
        }
    }

    #[cfg(test)]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pending.dimensions()
    }

    /// Zero pending, frozen and frozen_result. `last_output` is a cache, not user state.
    pub fn clear(&mut self) {
        for buf in [&mut self.pending, &mut self.frozen, &mut self.frozen_result] {
            buf.fill(0);
        }
    }

    pub fn is_pending(&self, x: u32, y: u32) -> bool {
        self.pending.get_pixel(x, y).0[0] == ON
    }

    pub fn is_frozen(&self, x: u32, y: u32) -> bool {
        self.frozen.get_pixel(x, y).0[0] == ON
    }

    pub fn pending_count(&self) -> usize {
        count_set(&self.pending)
    }

    pub fn frozen_count(&self) -> usize {
        count_set(&self.frozen)
    }

    /// Pixels set in both pending and frozen. Zero right after every commit.
    pub fn overlap_count(&self) -> usize {
        self.pending
            .pixels()
            .zip(self.frozen.pixels())
            .filter(|(p, f)| p.0[0] == ON && f.0[0] == ON)
            .count()
    }
}

pub fn count_set(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] == ON).count()
}
