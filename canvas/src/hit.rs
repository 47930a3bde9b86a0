//! Hit-testing and marquee collection against the current page.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, Rect};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::PageStore;

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
}

/// Resize handle position, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Direction tag as used by the host (`"n"`, `"se"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }

    /// Parse a direction tag. Case-insensitive.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|h| h.as_str() == tag)
    }

    /// Handle position on `bounds`.
    #[must_use]
    pub fn position(self, bounds: &Rect) -> Point {
        let cx = bounds.x + bounds.width / 2.0;
        let cy = bounds.y + bounds.height / 2.0;
        match self {
            Self::N => Point::new(cx, bounds.y),
            Self::Ne => Point::new(bounds.right(), bounds.y),
            Self::E => Point::new(bounds.right(), cy),
            Self::Se => Point::new(bounds.right(), bounds.bottom()),
            Self::S => Point::new(cx, bounds.bottom()),
            Self::Sw => Point::new(bounds.x, bounds.bottom()),
            Self::W => Point::new(bounds.x, cy),
            Self::Nw => Point::new(bounds.x, bounds.y),
        }
    }

    /// Which edges this handle moves: `(left, top, right, bottom)`.
    #[must_use]
    pub fn edges(self) -> (bool, bool, bool, bool) {
        match self {
            Self::N => (false, true, false, false),
            Self::Ne => (false, true, true, false),
            Self::E => (false, false, true, false),
            Self::Se => (false, false, true, true),
            Self::S => (false, false, false, true),
            Self::Sw => (true, false, false, true),
            Self::W => (true, false, false, false),
            Self::Nw => (true, true, false, false),
        }
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub layer_id: String,
    pub part: HitPart,
}

/// Find what lies under `world_pt` on the current page.
///
/// Handles of the single selected layer win over bodies. Bodies are tested
/// topmost first; hidden layers (and everything under a hidden frame) are
/// skipped. Locked layers can be hit but offer no handles.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &PageStore, camera: &Camera, selected: Option<&str>) -> Option<Hit> {
    let flat = doc.flatten();

    if let Some(selected) = selected {
        let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
        let target = flat.iter().find(|f| f.layer.id == selected && f.visible && !f.layer.locked);
        if let Some(target) = target {
            for handle in ResizeHandle::ALL {
                let p = handle.position(&target.bounds);
                if (p.x - world_pt.x).abs() <= slop && (p.y - world_pt.y).abs() <= slop {
                    return Some(Hit { layer_id: target.layer.id.clone(), part: HitPart::ResizeHandle(handle) });
                }
            }
        }
    }

    flat.iter()
        .rev()
        .find(|f| f.visible && f.bounds.contains(world_pt))
        .map(|f| Hit { layer_id: f.layer.id.clone(), part: HitPart::Body })
}

/// Ids of visible layers lying entirely inside `marquee`, in draw order.
///
/// Descendants of an included frame are not listed separately.
#[must_use]
pub fn layers_in_rect(doc: &PageStore, marquee: &Rect) -> Vec<String> {
    let mut covered: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for flat in doc.flatten() {
        if flat.parent.is_some_and(|p| covered.contains(&p)) {
            covered.push(&flat.layer.id);
            continue;
        }
        if flat.visible && marquee.contains_rect(&flat.bounds) {
            covered.push(&flat.layer.id);
            out.push(flat.layer.id.clone());
        }
    }
    out
}
