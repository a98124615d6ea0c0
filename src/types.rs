// Core types shared by the filter pipeline, the masks and the window.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Fill the whole frame with one color.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// Integer pixel coordinate, in image space unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Contour isolation applied at the end of the filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Isolate {
    /// -1: keep the background, discard the largest subject.
    Background,
    /// 0: no isolation.
    #[default]
    Off,
    /// +1: keep the largest subject, zero the background.
    Subject,
}

impl Isolate {
    /// Map the 0..=2 slider position onto -1..=1.
    pub fn from_slider(raw: i32) -> Self {
        Self::from_signed(raw - 1)
    }

    pub fn from_signed(v: i32) -> Self {
        match v.signum() {
            -1 => Self::Background,
            1 => Self::Subject,
            _ => Self::Off,
        }
    }

    pub fn signed(self) -> i32 {
        match self {
            Self::Background => -1,
            Self::Off => 0,
            Self::Subject => 1,
        }
    }

    pub fn slider(self) -> i32 {
        self.signed() + 1
    }
}

/// Inputs of the filter pipeline, read every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParameters {
    pub threshold: u8,
    pub simplify: u32,
    pub median: u32,
    pub isolate: Isolate,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self { threshold: 128, simplify: 1, median: 0, isolate: Isolate::Off }
    }
}

/// Everything the parameter surface exposes: filter settings plus brush radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub filter: FilterParameters,
    pub brush: u32,
}
