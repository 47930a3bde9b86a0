//! Shared numeric constants for the canvas crate.

// ── View transform ──────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplicative zoom step applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Panels ──────────────────────────────────────────────────────

/// Default width of the layers and properties panels, in CSS pixels.
pub const DEFAULT_PANEL_WIDTH: f64 = 260.0;

// ── Layers ──────────────────────────────────────────────────────

/// Resizing never shrinks a layer below this size in world units.
pub const MIN_LAYER_SIZE: f64 = 1.0;

/// Width given to a layer created by a single click with a shape tool.
pub const DEFAULT_LAYER_WIDTH: f64 = 120.0;

/// Height given to a layer created by a single click with a shape tool.
pub const DEFAULT_LAYER_HEIGHT: f64 = 80.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
