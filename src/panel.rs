// Slider strip under the viewport: the polled parameter surface.
// Visual: five labelled bars (Threshold, Simplify, Median, Isolate, Brush)
// plus a status column showing brush mode and how many stencils were saved.
use crate::brush::{BrushMode, Button, PointerEvent};
use crate::config::{
    BRUSH_MAX, BRUSH_MIN, ISOLATE_MAX, MEDIAN_MAX, PANEL_H, SIMPLIFY_MAX, THRESHOLD_MAX,
};
use crate::draw::{draw_rect, draw_text_5x7, fill_rect};
use crate::types::{Controls, FilterParameters, FrameBuffer, Isolate};

const ROW_H: i32 = 18;
const ROW_PAD: i32 = 6;
const TRACK_X: i32 = 96;
const TRACK_W: i32 = 512;
const TRACK_H: i32 = 10;
const VALUE_X: i32 = TRACK_X + TRACK_W + 12;
const STATUS_X: i32 = VALUE_X + 60;

const PANEL_BG: u32 = 0x00_20_20_20;
const TRACK_BG: u32 = 0x00_10_10_10;
const TRACK_FILL: u32 = 0x00_40_60_A0;
const TRACK_EDGE: u32 = 0x00_80_80_80;
const KNOB: u32 = 0x00_FF_FF_FF;
const TEXT: u32 = 0x00_E0_E0_E0;

const THRESHOLD: usize = 0;
const SIMPLIFY: usize = 1;
const MEDIAN: usize = 2;
const ISOLATE: usize = 3;
const BRUSH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    pub label: &'static str,
    pub min: i32,
    pub max: i32,
    pub value: i32,
}

impl Slider {
    fn new(label: &'static str, min: i32, max: i32, value: i32) -> Self {
        Self { label, min, max, value: value.clamp(min, max) }
    }

    /// Position along the track → value, rounded and clamped.
    fn set_from_track(&mut self, x: i32) {
        let t = (x - TRACK_X).clamp(0, TRACK_W - 1);
        let span = self.max - self.min;
        self.value = self.min + (t * span + (TRACK_W - 1) / 2) / (TRACK_W - 1);
    }

    fn knob_x(&self) -> i32 {
        let span = (self.max - self.min).max(1);
        TRACK_X + (self.value - self.min) * (TRACK_W - 1) / span
    }
}

pub struct ControlPanel {
    sliders: [Slider; 5],
    /// First window row of the strip.
    top: i32,
    /// Slider being dragged.
    grabbed: Option<usize>,
    /// Left press started inside the strip; swallow everything until release.
    captured: bool,
}

impl ControlPanel {
    pub fn new(initial: &Controls, top: usize) -> Self {
        let f = &initial.filter;
        Self {
            sliders: [
                Slider::new("Threshold", 0, THRESHOLD_MAX, i32::from(f.threshold)),
                Slider::new("Simplify", 0, SIMPLIFY_MAX, f.simplify as i32),
                Slider::new("Median", 0, MEDIAN_MAX, f.median as i32),
                Slider::new("Isolate", 0, ISOLATE_MAX, f.isolate.slider()),
                Slider::new("Brush", BRUSH_MIN, BRUSH_MAX, initial.brush as i32),
            ],
            top: top as i32,
            grabbed: None,
            captured: false,
        }
    }

    /// Current values, as the tick loop polls them.
    pub fn controls(&self) -> Controls {
        let v = |i: usize| self.sliders[i].value;
        Controls {
            filter: FilterParameters {
                threshold: v(THRESHOLD) as u8,
                simplify: v(SIMPLIFY) as u32,
                median: v(MEDIAN) as u32,
                isolate: Isolate::from_slider(v(ISOLATE)),
            },
            brush: v(BRUSH).max(BRUSH_MIN) as u32,
        }
    }

    pub fn contains(&self, y: i32) -> bool {
        y >= self.top && y < self.top + PANEL_H as i32
    }

    fn row_at(&self, y: i32) -> Option<usize> {
        let rel = y - self.top - ROW_PAD;
        if rel < 0 {
            return None;
        }
        let row = (rel / ROW_H) as usize;
        (row < self.sliders.len()).then_some(row)
    }

    /// Returns true when the event belongs to the strip and must not reach the brush.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Press { button: Button::Left, x, y } if self.contains(y) => {
                self.captured = true;
                self.grabbed = self.row_at(y);
                if let Some(i) = self.grabbed {
                    self.sliders[i].set_from_track(x);
                }
                true
            }
            PointerEvent::Move { x, .. } if self.captured => {
                if let Some(i) = self.grabbed {
                    self.sliders[i].set_from_track(x);
                }
                true
            }
            PointerEvent::Release { button: Button::Left, .. } if self.captured => {
                self.captured = false;
                self.grabbed = None;
                true
            }
            _ => false,
        }
    }

    /// Draw the strip over the bottom of `fb`.
    pub fn draw(&self, fb: &mut FrameBuffer, mode: BrushMode, saved: u32) {
        fill_rect(fb, 0, self.top, fb.width as i32, PANEL_H as i32, PANEL_BG);

        for (i, s) in self.sliders.iter().enumerate() {
            let y = self.top + ROW_PAD + i as i32 * ROW_H;
            draw_text_5x7(fb, 8, y + 2, s.label, TEXT);

            let ty = y + (ROW_H - TRACK_H) / 2 - 2;
            fill_rect(fb, TRACK_X, ty, TRACK_W, TRACK_H, TRACK_BG);
            let knob = s.knob_x();
            fill_rect(fb, TRACK_X, ty, knob - TRACK_X, TRACK_H, TRACK_FILL);
            draw_rect(fb, TRACK_X, ty, TRACK_W, TRACK_H, TRACK_EDGE);
            fill_rect(fb, knob - 2, ty - 2, 5, TRACK_H + 4, KNOB);

            let shown = if i == ISOLATE { s.value - 1 } else { s.value };
            draw_text_5x7(fb, VALUE_X, y + 2, &shown.to_string(), TEXT);
        }

        let (mode_text, mode_color) = match mode {
            BrushMode::Paint => ("Mode: brush", 0x00_40_FF_40),
            BrushMode::Erase => ("Mode: eraser", 0x00_FF_50_50),
        };
        let sy = self.top + ROW_PAD;
        draw_text_5x7(fb, STATUS_X, sy + 2, mode_text, mode_color);
        draw_text_5x7(fb, STATUS_X, sy + 2 + ROW_H, &format!("Saved: {saved}"), TEXT);
        draw_text_5x7(fb, STATUS_X, sy + 2 + 2 * ROW_H, "LMB paint  RMB pan", TEXT);
        draw_text_5x7(fb, STATUS_X, sy + 2 + 3 * ROW_H, "E eraser  S save", TEXT);
        draw_text_5x7(fb, STATUS_X, sy + 2 + 4 * ROW_H, "C clear  Q quit", TEXT);
    }
}
