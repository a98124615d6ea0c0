// Edge-triggered change detection for polled controls.
// The parameter surface is only ever polled; this keeps the value seen at the
// end of the previous tick and reports a transition exactly once.

/// Previous-value snapshot of one polled control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamWatch<T> {
    previous: T,
}

/// One observed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change<T> {
    pub from: T,
    pub to: T,
}

impl<T: Copy + PartialEq> ParamWatch<T> {
    pub fn new(initial: T) -> Self {
        Self { previous: initial }
    }

    pub fn previous(&self) -> T {
        self.previous
    }

    /// Compare against the snapshot; on a difference, report it and adopt `current`.
    pub fn observe(&mut self, current: T) -> Option<Change<T>> {
        if current == self.previous {
            return None;
        }
        let change = Change { from: self.previous, to: current };
        self.previous = current;
        Some(change)
    }
}
