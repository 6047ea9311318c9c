//! Collision geometry primitives
//!
//! Circle vs axis-aligned rectangle and circle vs rotated rectangle tests.
//! Used for strike-zone judging and for bat contact.
//!
//! All functions are pure. Degenerate inputs (zero or negative radius,
//! zero-size rectangles, non-finite values) report no collision.

use serde::{Deserialize, Serialize};

/// Screen-space point (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Angle (radians) of the line from `self` to `other`
    pub fn angle_to(&self, other: &Point2) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Rectangle described by its center and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Rect {
    pub center: Point2,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(center: Point2, width: f64, height: f64) -> Self {
        Self { center, width, height }
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }
}

#[inline]
fn degenerate(values: &[f64], r: f64, w: f64, h: f64) -> bool {
    values.iter().any(|v| !v.is_finite()) || r <= 0.0 || w <= 0.0 || h <= 0.0
}

/// Circle vs axis-aligned rectangle (clamped-distance test)
///
/// `(rect_cx, rect_cy)` is the rectangle center.
pub fn circle_rect_collision(
    cx: f64,
    cy: f64,
    r: f64,
    rect_cx: f64,
    rect_cy: f64,
    w: f64,
    h: f64,
) -> bool {
    if degenerate(&[cx, cy, r, rect_cx, rect_cy, w, h], r, w, h) {
        return false;
    }

    let half_w = w / 2.0;
    let half_h = h / 2.0;
    let dx = (cx - rect_cx).abs();
    let dy = (cy - rect_cy).abs();

    if dx > half_w + r || dy > half_h + r {
        return false;
    }
    if dx <= half_w || dy <= half_h {
        return true;
    }

    let corner_dx = dx - half_w;
    let corner_dy = dy - half_h;
    corner_dx * corner_dx + corner_dy * corner_dy <= r * r
}

/// Circle vs rectangle rotated by `angle` radians about its center
///
/// The circle center is rotated by `-angle` into the rectangle's frame,
/// then the axis-aligned test is applied.
pub fn circle_rotated_rect_collision(
    cx: f64,
    cy: f64,
    r: f64,
    rect_cx: f64,
    rect_cy: f64,
    w: f64,
    h: f64,
    angle: f64,
) -> bool {
    if !angle.is_finite() {
        return false;
    }

    let (sin, cos) = (-angle).sin_cos();
    let dx = cx - rect_cx;
    let dy = cy - rect_cy;
    let local_x = rect_cx + dx * cos - dy * sin;
    let local_y = rect_cy + dx * sin + dy * cos;

    circle_rect_collision(local_x, local_y, r, rect_cx, rect_cy, w, h)
}

/// Circle vs [`Rect`]
pub fn circle_hits_rect(center: Point2, r: f64, rect: &Rect) -> bool {
    circle_rect_collision(center.x, center.y, r, rect.center.x, rect.center.y, rect.width, rect.height)
}
