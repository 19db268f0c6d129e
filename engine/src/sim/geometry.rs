//! Axis aligned rectangles in logical (simulation) units. `y` grows downward, so `bottom` is the
//! floor.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Shrink every side by `margin`. The result may be degenerate.
    pub fn inset(&self, margin: f32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Clamp `value` into `[lo, hi]`; a range with `hi < lo` collapses to `lo`.
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo { lo } else { value.clamp(lo, hi) }
}

/// Scale `(x, y)` down so its length is at most `max`, keeping its direction.
pub fn clamp_length(x: f32, y: f32, max: f32) -> (f32, f32) {
    let length = (x * x + y * y).sqrt();
    if length > max && length > 0.0 {
        let scale = max / length;
        (x * scale, y * scale)
    } else {
        (x, y)
    }
}
