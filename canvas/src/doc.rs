//! Document model: layers, pages, and the page store that owns them.
//!
//! This module defines what is on the canvas (`Layer`, `LayerKind`), how
//! layers are grouped (`Page`), and the single owner of all layer data
//! (`PageStore`). Child layer geometry is relative to the parent frame's
//! origin; `PageStore::flatten` and `PageStore::absolute_bounds` resolve it to
//! world coordinates by summing ancestor offsets.
//!
//! There is no mirrored "current layers" copy: `PageStore::current_layers` is
//! a borrow of the current page, so a mutation is visible through every view
//! as soon as it returns.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Rect};

/// Reasons a document or registry mutation is declined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("layer not found: {0}")]
    NotFound(String),
    #[error("layer is locked: {0}")]
    Locked(String),
    #[error("id already in use: {0}")]
    DuplicateId(String),
    #[error("layer cannot contain children: {0}")]
    NotAContainer(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("unknown page: {0}")]
    UnknownPage(String),
    #[error("cannot remove the last page")]
    LastPage,
}

/// The kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Container establishing a relative origin for its children.
    Frame,
    Rectangle,
    Circle,
    Text,
    Image,
    Input,
    Button,
}

impl LayerKind {
    /// Human-readable default name for a freshly created layer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Frame => "Frame",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Input => "Input",
            Self::Button => "Button",
        }
    }
}

/// Horizontal alignment for text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A visual element on a page.
///
/// Style and content fields are optional and only meaningful for some kinds.
/// `children` is only populated for frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique across every page in the store.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Hidden layers stay in the tree but are never hit-tested.
    pub visible: bool,
    /// Locked layers decline position and size changes.
    pub locked: bool,
    /// Left edge, relative to the parent frame (or the page for root layers).
    pub x: f64,
    /// Top edge, relative to the parent frame (or the page for root layers).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Layer>,
}

impl Layer {
    /// A visible, unlocked layer with no style or content.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: LayerKind, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            visible: true,
            locked: false,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            fill: None,
            stroke: None,
            stroke_width: None,
            border_radius: None,
            text: None,
            font_size: None,
            font_weight: None,
            text_align: None,
            placeholder: None,
            children: Vec::new(),
        }
    }

    /// Fresh unique layer id.
    #[must_use]
    pub fn generate_id() -> String {
        format!("layer-{}", Uuid::new_v4().simple())
    }

    /// Bounds relative to the parent's origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind == LayerKind::Frame
    }

    /// Ids of this layer and every descendant, in draw order.
    #[must_use]
    pub fn subtree_ids(&self) -> Vec<&str> {
        let mut out = vec![self.id.as_str()];
        for child in &self.children {
            out.extend(child.subtree_ids());
        }
        out
    }

    #[must_use]
    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_owned());
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: &str, width: f64) -> Self {
        self.stroke = Some(stroke.to_owned());
        self.stroke_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.border_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str, font_size: f64) -> Self {
        self.text = Some(text.to_owned());
        self.font_size = Some(font_size);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: &str) -> Self {
        self.font_weight = Some(weight.to_owned());
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_owned());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Layer>) -> Self {
        self.children = children;
        self
    }
}

/// A named container of root layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub layers: Vec<Layer>,
}

impl Page {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), layers: Vec::new() }
    }
}

/// A layer resolved to world coordinates, as produced by [`PageStore::flatten`].
#[derive(Debug, Clone, Copy)]
pub struct FlatLayer<'a> {
    pub layer: &'a Layer,
    /// Absolute bounds in world space.
    pub bounds: Rect,
    pub parent: Option<&'a str>,
    pub depth: usize,
    /// False when this layer or any ancestor is hidden.
    pub visible: bool,
}

/// Sole owner of every page and layer. Exactly one page is current.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages: Vec<Page>,
    current: usize,
}

impl Default for PageStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl PageStore {
    /// A store holding a single page, which becomes current.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if two layers anywhere in the page share an id.
    pub fn new(first: Page) -> Result<Self, EditError> {
        if let Some(id) = first_duplicate(&first.layers) {
            return Err(EditError::DuplicateId(id.to_owned()));
        }
        Ok(Self { pages: vec![first], current: 0 })
    }

    /// The starter document: one "Login Form" page.
    #[must_use]
    pub fn seeded() -> Self {
        Self { pages: vec![login_form_page()], current: 0 }
    }

    // --- Pages ---

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    #[must_use]
    pub fn current_page_id(&self) -> &str {
        &self.pages[self.current].id
    }

    /// Root layers of the current page; the editable working set.
    #[must_use]
    pub fn current_layers(&self) -> &[Layer] {
        &self.pages[self.current].layers
    }

    /// Make `page_id` the current page.
    ///
    /// # Errors
    ///
    /// `UnknownPage` if no page has that id; the current page is unchanged.
    pub fn select_page(&mut self, page_id: &str) -> Result<(), EditError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == page_id)
            .ok_or_else(|| EditError::UnknownPage(page_id.to_owned()))?;
        self.current = index;
        Ok(())
    }

    /// Append a page. It does not become current.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the page id is taken, a layer id repeats within the
    /// page, or a layer id is already used on another page.
    pub fn add_page(&mut self, page: Page) -> Result<(), EditError> {
        if self.pages.iter().any(|p| p.id == page.id) {
            return Err(EditError::DuplicateId(page.id));
        }
        if let Some(id) = first_duplicate(&page.layers) {
            return Err(EditError::DuplicateId(id.to_owned()));
        }
        for layer in &page.layers {
            self.ensure_ids_free(layer)?;
        }
        self.pages.push(page);
        Ok(())
    }

    /// Remove a page. If it was current, the page sliding into its slot (or the
    /// new last page) becomes current.
    ///
    /// # Errors
    ///
    /// `UnknownPage` for a miss, `LastPage` when only one page remains.
    pub fn remove_page(&mut self, page_id: &str) -> Result<Page, EditError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == page_id)
            .ok_or_else(|| EditError::UnknownPage(page_id.to_owned()))?;
        if self.pages.len() == 1 {
            return Err(EditError::LastPage);
        }
        let removed = self.pages.remove(index);
        if self.current > index || self.current == self.pages.len() {
            self.current = self.current.saturating_sub(1);
        }
        Ok(removed)
    }

    // --- Lookup ---

    /// Find a layer anywhere in the current page's tree.
    #[must_use]
    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        find_in(self.current_layers(), id)
    }

    /// Whether any page uses `id` for a layer.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.pages.iter().any(|p| find_in(&p.layers, id).is_some())
    }

    /// World-space bounds of a current-page layer.
    #[must_use]
    pub fn absolute_bounds(&self, id: &str) -> Option<Rect> {
        locate(self.current_layers(), id, Point::default())
    }

    /// Every layer on the current page resolved to world space, in draw order
    /// (parents before children, earlier siblings before later ones).
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatLayer<'_>> {
        let mut out = Vec::new();
        flatten_into(self.current_layers(), Point::default(), None, 0, true, &mut out);
        out
    }

    // --- Geometry mutation ---

    /// Overwrite a layer's stored (parent-relative) position.
    ///
    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer, `Locked` if it is locked.
    pub fn update_layer_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), EditError> {
        let layer = self.unlocked_mut(id)?;
        layer.x = x;
        layer.y = y;
        Ok(())
    }

    /// Overwrite a layer's size. Negative sizes are stored as zero.
    ///
    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer, `Locked` if it is locked.
    pub fn update_layer_size(&mut self, id: &str, width: f64, height: f64) -> Result<(), EditError> {
        let layer = self.unlocked_mut(id)?;
        layer.width = width.max(0.0);
        layer.height = height.max(0.0);
        Ok(())
    }

    // --- Structure and flags ---

    /// Insert a layer at the top of the current page, or inside frame `parent`.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the layer or any descendant id is taken, `NotFound`
    /// for a missing parent, `NotAContainer` if the parent is not a frame.
    pub fn add_layer(&mut self, parent: Option<&str>, layer: Layer) -> Result<(), EditError> {
        self.ensure_ids_free(&layer)?;
        let current = self.current;
        let siblings = match parent {
            None => &mut self.pages[current].layers,
            Some(parent_id) => {
                let parent = find_in_mut(&mut self.pages[current].layers, parent_id)
                    .ok_or_else(|| EditError::NotFound(parent_id.to_owned()))?;
                if !parent.is_container() {
                    return Err(EditError::NotAContainer(parent_id.to_owned()));
                }
                &mut parent.children
            }
        };
        siblings.push(layer);
        Ok(())
    }

    /// Remove a layer (and its subtree) from the current page.
    ///
    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, EditError> {
        let current = self.current;
        remove_from(&mut self.pages[current].layers, id).ok_or_else(|| EditError::NotFound(id.to_owned()))
    }

    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> Result<(), EditError> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn set_layer_locked(&mut self, id: &str, locked: bool) -> Result<(), EditError> {
        self.layer_mut(id)?.locked = locked;
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn rename_layer(&mut self, id: &str, name: &str) -> Result<(), EditError> {
        name.clone_into(&mut self.layer_mut(id)?.name);
        Ok(())
    }

    fn layer_mut(&mut self, id: &str) -> Result<&mut Layer, EditError> {
        let current = self.current;
        find_in_mut(&mut self.pages[current].layers, id).ok_or_else(|| EditError::NotFound(id.to_owned()))
    }

    fn unlocked_mut(&mut self, id: &str) -> Result<&mut Layer, EditError> {
        let layer = self.layer_mut(id)?;
        if layer.locked {
            return Err(EditError::Locked(id.to_owned()));
        }
        Ok(layer)
    }

    fn ensure_ids_free(&self, layer: &Layer) -> Result<(), EditError> {
        let ids = layer.subtree_ids();
        for (i, id) in ids.iter().enumerate() {
            if self.contains_id(id) || ids[..i].contains(id) {
                return Err(EditError::DuplicateId((*id).to_owned()));
            }
        }
        Ok(())
    }
}

/// First id that appears more than once across `layers` and their subtrees.
fn first_duplicate(layers: &[Layer]) -> Option<&str> {
    let mut seen = HashSet::new();
    layers.iter().flat_map(Layer::subtree_ids).find(|id| !seen.insert(*id))
}

fn find_in<'a>(layers: &'a [Layer], id: &str) -> Option<&'a Layer> {
    for layer in layers {
        if layer.id == id {
            return Some(layer);
        }
        if let Some(found) = find_in(&layer.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(layers: &'a mut [Layer], id: &str) -> Option<&'a mut Layer> {
    for layer in layers {
        if layer.id == id {
            return Some(layer);
        }
        if let Some(found) = find_in_mut(&mut layer.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_from(layers: &mut Vec<Layer>, id: &str) -> Option<Layer> {
    if let Some(pos) = layers.iter().position(|l| l.id == id) {
        return Some(layers.remove(pos));
    }
    layers.iter_mut().find_map(|layer| remove_from(&mut layer.children, id))
}

fn locate(layers: &[Layer], id: &str, origin: Point) -> Option<Rect> {
    for layer in layers {
        let bounds = layer.bounds().translate(origin.x, origin.y);
        if layer.id == id {
            return Some(bounds);
        }
        if let Some(found) = locate(&layer.children, id, Point::new(bounds.x, bounds.y)) {
            return Some(found);
        }
    }
    None
}

fn flatten_into<'a>(
    layers: &'a [Layer],
    origin: Point,
    parent: Option<&'a str>,
    depth: usize,
    visible: bool,
    out: &mut Vec<FlatLayer<'a>>,
) {
    for layer in layers {
        let bounds = layer.bounds().translate(origin.x, origin.y);
        let visible = visible && layer.visible;
        out.push(FlatLayer { layer, bounds, parent, depth, visible });
        flatten_into(&layer.children, Point::new(bounds.x, bounds.y), Some(&layer.id), depth + 1, visible, out);
    }
}

fn login_form_page() -> Page {
    let text = |id: &str, name: &str, bounds: Rect, content: &str, size: f64, fill: &str| {
        Layer::new(id, name, LayerKind::Text, bounds).with_text(content, size).with_fill(fill)
    };
    let input = |id: &str, name: &str, y: f64, placeholder: &str| {
        Layer::new(id, name, LayerKind::Input, Rect::new(40.0, y, 320.0, 44.0))
            .with_fill("#ffffff")
            .with_stroke("#d1d5db", 1.0)
            .with_radius(6.0)
            .with_placeholder(placeholder)
    };

    let children = vec![
        text("layer-2", "Login Title", Rect::new(100.0, 40.0, 200.0, 40.0), "Welcome Back", 24.0, "#111827")
            .with_weight("bold")
            .with_align(TextAlign::Center),
        text(
            "layer-3",
            "Login Subtitle",
            Rect::new(60.0, 80.0, 280.0, 20.0),
            "Please sign in to your account",
            14.0,
            "#6b7280",
        )
        .with_align(TextAlign::Center),
        text("layer-4", "Email Label", Rect::new(40.0, 130.0, 100.0, 20.0), "Email", 14.0, "#374151")
            .with_weight("500"),
        input("layer-5", "Email Input", 155.0, "Enter your email"),
        text("layer-6", "Password Label", Rect::new(40.0, 220.0, 100.0, 20.0), "Password", 14.0, "#374151")
            .with_weight("500"),
        input("layer-7", "Password Input", 245.0, "Enter your password"),
        text(
            "layer-8",
            "Forgot Password",
            Rect::new(260.0, 300.0, 100.0, 20.0),
            "Forgot password?",
            12.0,
            "#3b82f6",
        )
        .with_align(TextAlign::Right),
        Layer::new("layer-9", "Login Button", LayerKind::Button, Rect::new(40.0, 340.0, 320.0, 44.0))
            .with_fill("#3b82f6")
            .with_radius(6.0)
            .with_text("Sign In", 16.0)
            .with_weight("500")
            .with_align(TextAlign::Center),
        text(
            "layer-10",
            "Sign Up Text",
            Rect::new(80.0, 410.0, 240.0, 20.0),
            "Don't have an account? Sign up",
            14.0,
            "#6b7280",
        )
        .with_align(TextAlign::Center),
    ];

    let container = Layer::new("layer-1", "Login Container", LayerKind::Frame, Rect::new(200.0, 100.0, 400.0, 500.0))
        .with_fill("#ffffff")
        .with_stroke("#e5e7eb", 1.0)
        .with_radius(12.0)
        .with_children(children);

    Page { id: "page-1".into(), name: "Login Form".into(), layers: vec![container] }
}
