// Compositor: live output + frozen values → the stencil, then the on-screen view.
// Visual: black/white stencil; blue-tinted where frozen, green-tinted where
// pending, and a translucent disk under the cursor showing the brush.
//
// Overlays only ever land in the display FrameBuffer. The combined GrayImage
// is the exportable stencil and stays free of tints.
use image::GrayImage;

use crate::config::{
    BACKGROUND, FROZEN_TINT, PENDING_TINT, PREVIEW_ALPHA_TENTHS, PREVIEW_ERASE_TINT,
    PREVIEW_PAINT_TINT,
};
use crate::brush::BrushMode;
use crate::masks::StencilState;
use crate::types::FrameBuffer;
use crate::viewport::Viewport;
use crate::vision::ON;

/// `current` with every frozen pixel replaced by its locked value. Pure.
pub fn compose(current: &GrayImage, frozen: &GrayImage, frozen_result: &GrayImage) -> GrayImage {
    let mut combined = current.clone();
    for ((dst, f), v) in combined.pixels_mut().zip(frozen.pixels()).zip(frozen_result.pixels()) {
        if f.0[0] == ON {
            *dst = *v;
        }
    }
    combined
}

/// Paint the visible crop of `combined` into `fb` (top-left aligned, unscaled),
/// tinting frozen then pending pixels 50/50. Outside the image: letterbox.
pub fn render_view(combined: &GrayImage, state: &StencilState, viewport: &Viewport, fb: &mut FrameBuffer) {
    fb.fill(BACKGROUND);
    let (vis_w, vis_h) = viewport.visible_size();
    let (ox, oy) = (viewport.offset_x as u32, viewport.offset_y as u32);

    for vy in 0..vis_h.min(fb.height as u32) {
        let iy = oy + vy;
        let row = vy as usize * fb.width;
        for vx in 0..vis_w.min(fb.width as u32) {
            let ix = ox + vx;
            let g = combined.get_pixel(ix, iy).0[0] as u32;
            let mut px = (g << 16) | (g << 8) | g;
            if state.is_frozen(ix, iy) {
                px = blend_half(px, FROZEN_TINT);
            }
            if state.is_pending(ix, iy) {
                px = blend_half(px, PENDING_TINT);
            }
            fb.pixels[row + vx as usize] = px;
        }
    }
}

/// Translucent brush disk at window position (cx, cy); green to paint, red to erase.
/// Nothing is drawn when the center is outside the frame.
pub fn draw_brush_preview(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: u32, mode: BrushMode) {
    if cx < 0 || cy < 0 || cx >= fb.width as i32 || cy >= fb.height as i32 {
        return;
    }
    let tint = match mode {
        BrushMode::Paint => PREVIEW_PAINT_TINT,
        BrushMode::Erase => PREVIEW_ERASE_TINT,
    };
    let r = radius as i32;
    let r2 = r * r;

    // Scan just the bounding box
    for y in (cy - r).max(0)..=(cy + r).min(fb.height as i32 - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(fb.width as i32 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let idx = y as usize * fb.width + x as usize;
            fb.pixels[idx] = blend_tenths(fb.pixels[idx], tint, PREVIEW_ALPHA_TENTHS);
        }
    }
}

/// Per-channel (a + b) / 2.
#[inline]
fn blend_half(a: u32, b: u32) -> u32 {
    map_channels(a, b, |x, y| (x + y) / 2)
}

/// Per-channel mix: `alpha` tenths of `over`, the rest of `base`, rounded.
#[inline]
fn blend_tenths(base: u32, over: u32, alpha: u32) -> u32 {
    map_channels(base, over, |b, o| (o * alpha + b * (10 - alpha) + 5) / 10)
}

#[inline]
fn map_channels(a: u32, b: u32, f: impl Fn(u32, u32) -> u32) -> u32 {
    let ch = |shift: u32| f((a >> shift) & 0xFF, (b >> shift) & 0xFF).min(0xFF) << shift;
    ch(16) | ch(8) | ch(0)
}
