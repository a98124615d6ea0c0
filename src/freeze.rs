// Freeze controller: locks pending paint when the threshold moves.
// Visual: green zones turn blue the moment the Threshold slider changes, and
// keep the look they had *before* the slider moved.
use image::Luma;
use tracing::info;

use crate::masks::StencilState;
use crate::params::{Change, ParamWatch};
use crate::vision::ON;

/// What one commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub threshold: Change<u8>,
    /// Pixels that went from pending to frozen.
    pub frozen: usize,
    /// Pending pixels dropped because they were already frozen.
    pub discarded: usize,
}

pub struct FreezeController {
    threshold: ParamWatch<u8>,
}

impl FreezeController {
    pub fn new(initial_threshold: u8) -> Self {
        Self { threshold: ParamWatch::new(initial_threshold) }
    }

    /// Threshold recorded at the end of the previous tick.
    pub fn threshold(&self) -> u8 {
        self.threshold.previous()
    }

    /// Run once per tick, before the pipeline recomputes `last_output`.
    /// Only a threshold transition commits; nothing else is looked at.
    pub fn observe(&mut self, threshold: u8, state: &mut StencilState) -> Option<Commit> {
        let change = self.threshold.observe(threshold)?;
        let (frozen, discarded) = commit(state);
        info!(
            from = change.from,
            to = change.to,
            frozen,
            discarded,
            "threshold changed, pending zone frozen"
        );
        Some(Commit { threshold: change, frozen, discarded })
    }
}

/// newly = pending AND NOT frozen; lock newly to `last_output`; then empty pending entirely.
/// Returns (newly frozen, discarded) pixel counts.
fn commit(state: &mut StencilState) -> (usize, usize) {
    let StencilState { pending, frozen, frozen_result, last_output } = state;
    let mut newly = 0;
    let mut discarded = 0;

    for (x, y, p) in pending.enumerate_pixels() {
        if p.0[0] != ON {
            continue;
        }
        if frozen.get_pixel(x, y).0[0] == ON {
            // already locked: keep its existing value
            discarded += 1;
            continue;
        }
        frozen_result.put_pixel(x, y, *last_output.get_pixel(x, y));
        frozen.put_pixel(x, y, Luma([ON]));
        newly += 1;
    }

    pending.fill(0);
    (newly, discarded)
}
