// Brush engine: pointer samples in, mask intents out.
// Visual: holding the left button paints green (pending) disks, or in erase
// mode wipes green *and* blue; dragging with the right button pans.
//
// The engine never touches the masks itself. It emits `Intent`s that the
// session applies, so the masks and the viewport have a single writer.
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

use crate::masks::StencilState;
use crate::types::Point;
use crate::viewport::Viewport;
use crate::vision::ON;

/// Smallest brush radius the surface may hand us.
pub const MIN_RADIUS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

/// One pointer sample, in window-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: Button, x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release { button: Button, x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushMode {
    Paint,
    Erase,
}

/// Discrete request consumed by the session (image coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Filled disk at `at`.
    Dab { mode: BrushMode, at: Point, radius: u32 },
    /// Thick segment (width 2×radius, round caps) from the previous anchor to `to`.
    Line { mode: BrushMode, from: Point, to: Point, radius: u32 },
    /// Drag the image by a screen delta.
    PanBy { dx: i32, dy: i32 },
}

#[derive(Debug, Default)]
pub struct BrushEngine {
    erase: bool,
    /// Last painted point of the current stroke (image coords); `Some` while stroking.
    anchor: Option<Point>,
    /// Last pointer position while right-dragging (window coords).
    pan_from: Option<(i32, i32)>,
    /// Latest pointer position (window coords), for the preview disk.
    hover: Option<(i32, i32)>,
}

impl BrushEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> BrushMode {
        if self.erase { BrushMode::Erase } else { BrushMode::Paint }
    }

    /// Flip paint/erase; returns the new mode.
    pub fn toggle_erase(&mut self) -> BrushMode {
        self.erase = !self.erase;
        self.mode()
    }

    pub fn is_stroking(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn hover(&self) -> Option<(i32, i32)> {
        self.hover
    }

    /// Turn one pointer sample into at most one intent.
    /// Samples that miss the image never draw but may still pan.
    pub fn handle(&mut self, event: PointerEvent, radius: u32, viewport: &Viewport) -> Option<Intent> {
        let radius = radius.max(MIN_RADIUS);
        let mode = self.mode();

        match event {
            PointerEvent::Press { button: Button::Left, x, y } => {
                self.hover = Some((x, y));
                let at = viewport.to_image(x, y)?;
                self.anchor = Some(at);
                Some(Intent::Dab { mode, at, radius })
            }
            PointerEvent::Press { button: Button::Right, x, y } => {
                self.hover = Some((x, y));
                self.pan_from = Some((x, y));
                None
            }
            PointerEvent::Move { x, y } => {
                self.hover = Some((x, y));
                // Off-image samples skip drawing but may still pan.
                if let (Some(from), Some(to)) = (self.anchor, viewport.to_image(x, y)) {
                    self.anchor = Some(to);
                    return Some(Intent::Line { mode, from, to, radius });
                }
                let (px, py) = self.pan_from?;
                self.pan_from = Some((x, y));
                Some(Intent::PanBy { dx: x - px, dy: y - py })
            }
            PointerEvent::Release { button: Button::Left, .. } => {
                self.anchor = None;
                None
            }
            PointerEvent::Release { button: Button::Right, .. } => {
                self.pan_from = None;
                None
            }
        }
    }
}

/* ------------------------- mask rasterisation ------------------------- */

/// Apply a dab or line to the masks. Paint reaches pending only; erase clears
/// pending, frozen and frozen_result together.
pub fn apply_stroke(state: &mut StencilState, intent: &Intent) {
    let (mode, stamps) = match *intent {
        Intent::Dab { mode, at, radius } => (mode, vec![(at, radius)]),
        Intent::Line { mode, from, to, radius } => (mode, segment_stamps(from, to, radius)),
        Intent::PanBy { .. } => return,
    };

    match mode {
        BrushMode::Paint => {
            for (at, r) in &stamps {
                stamp(&mut state.pending, *at, *r, ON);
            }
        }
        BrushMode::Erase => {
            for buf in [&mut state.pending, &mut state.frozen, &mut state.frozen_result] {
                for (at, r) in &stamps {
                    stamp(buf, *at, *r, 0);
                }
            }
        }
    }
}

#[inline]
fn stamp(mask: &mut GrayImage, at: Point, radius: u32, value: u8) {
    draw_filled_circle_mut(mask, (at.x, at.y), radius as i32, Luma([value]));
}

/// Disk centers every pixel along the segment, so the union is a capsule
/// of width 2×radius with round caps and no gaps.
fn segment_stamps(from: Point, to: Point, radius: u32) -> Vec<(Point, u32)> {
    let dx = (to.x - from.x) as f32;
    let dy = (to.y - from.y) as f32;
    let steps = dx.abs().max(dy.abs()).ceil() as i32;
    if steps == 0 {
        return vec![(from, radius)];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let p = Point::new(
                (from.x as f32 + dx * t).round() as i32,
                (from.y as f32 + dy * t).round() as i32,
            );
            (p, radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(100, 100, 200, 200)
    }

    fn press(x: i32, y: i32) -> PointerEvent {
        PointerEvent::Press { button: Button::Left, x, y }
    }

    #[test]
    fn press_then_move_paints_dab_then_line() {
        let mut b = BrushEngine::new();
        let v = vp();
        assert_eq!(
            b.handle(press(10, 10), 8, &v),
            Some(Intent::Dab { mode: BrushMode::Paint, at: Point::new(10, 10), radius: 8 })
        );
        assert!(b.is_stroking());
        assert_eq!(
            b.handle(PointerEvent::Move { x: 30, y: 12 }, 8, &v),
            Some(Intent::Line {
                mode: BrushMode::Paint,
                from: Point::new(10, 10),
                to: Point::new(30, 12),
                radius: 8
            })
        );
        b.handle(PointerEvent::Release { button: Button::Left, x: 30, y: 12 }, 8, &v);
        assert!(!b.is_stroking());
        assert_eq!(b.handle(PointerEvent::Move { x: 40, y: 40 }, 8, &v), None);
    }

    #[test]
    fn radius_is_clamped_to_minimum() {
        let mut b = BrushEngine::new();
        match b.handle(press(5, 5), 1, &vp()) {
            Some(Intent::Dab { radius, .. }) => assert_eq!(radius, MIN_RADIUS),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn erase_mode_is_carried_in_intents() {
        let mut b = BrushEngine::new();
        assert_eq!(b.toggle_erase(), BrushMode::Erase);
        match b.handle(press(5, 5), 6, &vp()) {
            Some(Intent::Dab { mode, .. }) => assert_eq!(mode, BrushMode::Erase),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn outside_samples_never_draw() {
        let small = Viewport::new(100, 100, 50, 50);
        let mut b = BrushEngine::new();
        assert_eq!(b.handle(press(70, 70), 8, &small), None);
        assert!(!b.is_stroking());

        b.handle(press(10, 10), 8, &small);
        assert_eq!(b.handle(PointerEvent::Move { x: 80, y: 10 }, 8, &small), None);
        // anchor kept: re-entering draws from the last inside point
        assert_eq!(
            b.handle(PointerEvent::Move { x: 20, y: 10 }, 8, &small),
            Some(Intent::Line {
                mode: BrushMode::Paint,
                from: Point::new(10, 10),
                to: Point::new(20, 10),
                radius: 8
            })
        );
    }

    #[test]
    fn right_drag_pans_even_outside_image() {
        let small = Viewport::new(100, 100, 50, 50);
        let mut b = BrushEngine::new();
        assert_eq!(b.handle(PointerEvent::Press { button: Button::Right, x: 90, y: 90 }, 8, &small), None);
        assert_eq!(
            b.handle(PointerEvent::Move { x: 80, y: 95 }, 8, &small),
            Some(Intent::PanBy { dx: -10, dy: 5 })
        );
        b.handle(PointerEvent::Release { button: Button::Right, x: 80, y: 95 }, 8, &small);
        assert_eq!(b.handle(PointerEvent::Move { x: 0, y: 0 }, 8, &small), None);
    }

    #[test]
    fn off_image_move_pans_during_a_stroke() {
        let small = Viewport::new(100, 100, 50, 50);
        let mut b = BrushEngine::new();
        b.handle(press(10, 10), 8, &small);
        b.handle(PointerEvent::Press { button: Button::Right, x: 10, y: 10 }, 8, &small);

        assert_eq!(
            b.handle(PointerEvent::Move { x: 80, y: 0 }, 8, &small),
            Some(Intent::PanBy { dx: 70, dy: -10 })
        );
        assert!(b.is_stroking());
    }

    #[test]
    fn line_has_no_gaps() {
        let mut state = StencilState::new(GrayImage::new(120, 60));
        let intent = Intent::Line {
            mode: BrushMode::Paint,
            from: Point::new(10, 30),
            to: Point::new(110, 30),
            radius: 4,
        };
        apply_stroke(&mut state, &intent);
        for x in 10..=110 {
            for y in 27..=33 {
                assert!(state.is_pending(x, y), "gap at ({x},{y})");
            }
        }
        assert!(!state.is_pending(60, 40));
        assert_eq!(state.frozen_count(), 0);
    }

    #[test]
    fn erase_clears_all_three_buffers() {
        let mut state = StencilState::new(GrayImage::new(40, 40));
        for buf in [&mut state.pending, &mut state.frozen, &mut state.frozen_result] {
            buf.fill(ON);
        }
        apply_stroke(
            &mut state,
            &Intent::Dab { mode: BrushMode::Erase, at: Point::new(20, 20), radius: 5 },
        );
        for (x, y) in [(20, 20), (24, 20), (20, 16), (17, 17)] {
            assert!(!state.is_pending(x, y));
            assert!(!state.is_frozen(x, y));
            assert_eq!(state.frozen_result.get_pixel(x, y).0[0], 0);
        }
        assert!(state.is_frozen(2, 2));
    }

    #[test]
    fn dab_off_the_edge_is_clipped() {
        let mut state = StencilState::new(GrayImage::new(10, 10));
        apply_stroke(
            &mut state,
            &Intent::Dab { mode: BrushMode::Paint, at: Point::new(0, 0), radius: 4 },
        );
        assert!(state.is_pending(0, 0));
        assert!(!state.is_pending(9, 9));
    }
}
