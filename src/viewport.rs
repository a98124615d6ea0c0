use crate::types::Point;

/// Fixed-size, unscaled crop window over the full image.
///
/// The window is `view_w × view_h` screen pixels; one screen pixel is always
/// one image pixel. When the image is smaller than the window in an axis, the
/// crop sits at the top-left and the rest of the window is letterbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Image pixel shown at the window's top-left corner.
    pub offset_x: i32,
    pub offset_y: i32,

    pub view_w: u32,
    pub view_h: u32,

    pub image_w: u32,
    pub image_h: u32,
}

impl Viewport {
    pub fn new(view_w: u32, view_h: u32, image_w: u32, image_h: u32) -> Self {
        Self { offset_x: 0, offset_y: 0, view_w, view_h, image_w, image_h }
    }

    /// Largest legal offset per axis: `max(0, dimension − view size)`.
    pub fn max_offset(&self) -> (i32, i32) {
        (
            self.image_w.saturating_sub(self.view_w) as i32,
            self.image_h.saturating_sub(self.view_h) as i32,
        )
    }

    /// Drag the image by a screen delta: the content follows the pointer, so
    /// the offset moves the opposite way. Always left clamped.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        let (max_x, max_y) = self.max_offset();
        self.offset_x = self.offset_x.saturating_sub(dx).clamp(0, max_x);
        self.offset_y = self.offset_y.saturating_sub(dy).clamp(0, max_y);
    }

    /// Window-local point → image point, if it lands on the visible image.
    pub fn to_image(&self, vx: i32, vy: i32) -> Option<Point> {
        if vx < 0 || vy < 0 || vx >= self.view_w as i32 || vy >= self.view_h as i32 {
            return None;
        }
        let p = Point::new(vx + self.offset_x, vy + self.offset_y);
        self.contains(p).then_some(p)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.image_w as i32 && p.y < self.image_h as i32
    }

    /// Size of the part of the window covered by image pixels.
    pub fn visible_size(&self) -> (u32, u32) {
        (
            self.view_w.min(self.image_w - self.offset_x as u32),
            self.view_h.min(self.image_h - self.offset_y as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_is_clamped() {
        let mut vp = Viewport::new(100, 50, 300, 80);
        assert_eq!(vp.max_offset(), (200, 30));

        vp.pan_by(-500, -500); // drag far left/up → show the far right/bottom
        assert_eq!((vp.offset_x, vp.offset_y), (200, 30));

        vp.pan_by(10, 5);
        assert_eq!((vp.offset_x, vp.offset_y), (190, 25));

        vp.pan_by(1000, 1000);
        assert_eq!((vp.offset_x, vp.offset_y), (0, 0));
    }

    #[test]
    fn clamp_holds_for_any_delta_sequence() {
        let mut vp = Viewport::new(64, 48, 150, 40);
        let (max_x, max_y) = vp.max_offset();
        assert_eq!(max_y, 0);
        let mut seed = 0x2545_f491u32;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let dx = (seed % 201) as i32 - 100;
            let dy = ((seed >> 8) % 201) as i32 - 100;
            vp.pan_by(dx, dy);
            assert!((0..=max_x).contains(&vp.offset_x));
            assert!((0..=max_y).contains(&vp.offset_y));
        }
    }

    #[test]
    fn small_image_never_pans() {
        let mut vp = Viewport::new(1024, 600, 100, 100);
        vp.pan_by(-50, -50);
        assert_eq!((vp.offset_x, vp.offset_y), (0, 0));
        assert_eq!(vp.visible_size(), (100, 100));
    }

    #[test]
    fn to_image_respects_offset_and_bounds() {
        let mut vp = Viewport::new(100, 100, 300, 120);
        vp.pan_by(-40, -10);
        assert_eq!(vp.to_image(0, 0), Some(Point::new(40, 10)));
        assert_eq!(vp.to_image(99, 99), Some(Point::new(139, 109)));
        assert_eq!(vp.to_image(100, 0), None); // past the window
        assert_eq!(vp.to_image(-1, 5), None);

        let small = Viewport::new(100, 100, 50, 50);
        assert_eq!(small.to_image(60, 10), None); // letterbox
        assert_eq!(small.visible_size(), (50, 50));
    }
}
