/// A pointer position, in pixels relative to the top-left corner of the
/// display region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The fixed display region a GIF is shown in. All angle geometry is
/// anchored at the top-center of this region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Anchor point for angle lines: the top-center of the region.
    pub fn origin(&self) -> Point {
        Point::new(self.width as f64 / 2.0, 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width as f64 && p.y >= 0.0 && p.y < self.height as f64
    }
}

impl Default for Viewport {
    // The canvas size the labeling tool has always used.
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
        }
    }
}

/// How much of the catalog is labeled, derived from the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub labeled: usize,
    pub total: usize,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.labeled, self.total)
    }
}
