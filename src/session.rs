// The one owner of all mutable editor state.
//
// Tick order is fixed: commit (if the threshold moved) → recompute the live
// output into last_output → compose. A commit therefore always
// sees the previous tick's render, and the compositor always sees the masks
// after the commit.
use image::GrayImage;
use tracing::{debug, info};

use crate::brush::{apply_stroke, Intent};
use crate::compose::{compose, render_view};
use crate::freeze::{Commit, FreezeController};
use crate::masks::StencilState;
use crate::types::{FilterParameters, FrameBuffer};
use crate::viewport::Viewport;
use crate::vision;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub commit: Option<Commit>,
}

pub struct Session {
    source: GrayImage,
    state: StencilState,
    freeze: FreezeController,
    viewport: Viewport,
    /// Parameters `state.last_output` was rendered with.
    rendered_with: FilterParameters,
    /// Stencil as of the last tick (live output + frozen values).
    combined: GrayImage,
}

impl Session {
    /// Build the session around the grayscale source. The initial parameters
    /// produce the first `last_output`, so the very first threshold move already
    /// commits against a real render.
    pub fn new(source: GrayImage, initial: &FilterParameters, view_w: u32, view_h: u32) -> Self {
        let (w, h) = source.dimensions();
        let output = vision::render(&source, initial);
        let combined = output.clone();
        Self {
            freeze: FreezeController::new(initial.threshold),
            state: StencilState::new(output),
            viewport: Viewport::new(view_w, view_h, w, h),
            rendered_with: *initial,
            source,
            combined,
        }
    }

    pub fn tick(&mut self, params: &FilterParameters) -> TickReport {
        let commit = self.freeze.observe(params.threshold, &mut self.state);

        // The pipeline is pure, so unchanged parameters mean an unchanged output.
        if self.rendered_with != *params {
            self.state.last_output = vision::render(&self.source, params);
            self.rendered_with = *params;
        }
        self.combined = compose(&self.state.last_output, &self.state.frozen, &self.state.frozen_result);

        TickReport { commit }
    }

    /// Consume one intent from the brush engine (or the keyboard).
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::PanBy { dx, dy } => {
                self.viewport.pan_by(dx, dy);
                debug!(x = self.viewport.offset_x, y = self.viewport.offset_y, "panned");
            }
            stroke => apply_stroke(&mut self.state, &stroke),
        }
    }

    /// Drop all pending and frozen zones.
    pub fn clear(&mut self) {
        self.state.clear();
        // keep the displayed stencil consistent until the next tick
        self.combined = self.state.last_output.clone();
        info!("pending and frozen zones cleared");
    }

    /// Exportable stencil (no overlays).
    pub fn stencil(&self) -> &GrayImage {
        &self.combined
    }

    pub fn state(&self) -> &StencilState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Draw the visible crop with frozen/pending overlays into `fb`.
    pub fn render_view(&self, fb: &mut FrameBuffer) {
        render_view(&self.combined, &self.state, &self.viewport, fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn new_session_renders_initial_output() {
        let gray = GrayImage::from_pixel(10, 10, Luma([200]));
        let s = Session::new(gray, &FilterParameters::default(), 8, 8);
        assert!(s.stencil().pixels().all(|p| p.0[0] == 255));
        assert!(s.state().last_output.pixels().all(|p| p.0[0] == 255));
        assert_eq!(s.viewport().max_offset(), (2, 2));
    }

    #[test]
    fn pan_intent_moves_viewport() {
        let gray = GrayImage::new(50, 50);
        let mut s = Session::new(gray, &FilterParameters::default(), 10, 10);
        s.apply(Intent::PanBy { dx: -5, dy: -100 });
        assert_eq!((s.viewport().offset_x, s.viewport().offset_y), (5, 40));
    }
}
