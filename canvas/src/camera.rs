//! Coordinate spaces and the pan/zoom view transform.
//!
//! Screen space is CSS pixels in the viewport. World space is the canvas's
//! logical coordinate space. The two are related by
//! `screen = world * zoom + offset`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned rectangle with a non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build the rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right() && other.x <= self.right() && self.y <= other.bottom() && other.y <= self.bottom()
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// Convert a screen-space point to world coordinates.
///
/// `zoom` must be positive; [`Camera`] guarantees this for its own state.
#[must_use]
pub fn screen_to_world(screen_x: f64, screen_y: f64, zoom: f64, offset: Point) -> Point {
    Point { x: (screen_x - offset.x) / zoom, y: (screen_y - offset.y) / zoom }
}

/// Convert a world-space point to screen coordinates. Exact inverse of
/// [`screen_to_world`].
#[must_use]
pub fn world_to_screen(world_x: f64, world_y: f64, zoom: f64, offset: Point) -> Point {
    Point { x: world_x * zoom + offset.x, y: world_y * zoom + offset.y }
}

/// View transform state: zoom factor and canvas pan offset.
///
/// `pan_x` / `pan_y` are in CSS pixels. `zoom` always lies in
/// `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// A camera at the given pan offset. `zoom` is clamped the same way
    /// [`Camera::set_zoom`] clamps it; NaN falls back to 1.
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        let mut camera = Self { pan_x, pan_y, ..Self::default() };
        camera.set_zoom(zoom);
        camera
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The pan offset as a point.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        screen_to_world(screen.x, screen.y, self.zoom, self.offset())
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        world_to_screen(world.x, world.y, self.zoom, self.offset())
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Store `zoom` clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Absolute pan offset.
    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Relative pan.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Multiply zoom by `factor` while keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(screen);
        self.set_zoom(self.zoom * factor);
        self.pan_x = screen.x - world.x * self.zoom;
        self.pan_y = screen.y - world.y * self.zoom;
    }
}
