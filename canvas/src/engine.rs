use serde::Serialize;

use crate::camera::{Camera, Point, Rect};
use crate::consts::{DEFAULT_LAYER_HEIGHT, DEFAULT_LAYER_WIDTH, DEFAULT_PANEL_WIDTH, MIN_LAYER_SIZE, WHEEL_ZOOM_STEP};
use crate::doc::{EditError, Layer, LayerKind, Page, PageStore, TextAlign};
use crate::hit::{Hit, HitPart, ResizeHandle, hit_test, layers_in_rect};
use crate::input::{Button, InteractionMode, Key, Modifiers, WheelDelta};
use crate::selection::Selection;
use crate::tool::{SELECT_TOOL, Tool, ToolRegistry};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    LayerCreated { layer: Layer },
    /// `bounds` are parent-relative, as stored on the layer.
    LayerUpdated { id: String, bounds: Rect },
    LayerDeleted { id: String },
    SelectionChanged { ids: Vec<String> },
    ViewChanged,
    SetCursor { cursor: String },
    RenderNeeded,
}

/// Widths of the side panels framing the canvas, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub left_width: f64,
    pub right_width: f64,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self { left_width: DEFAULT_PANEL_WIDTH, right_width: DEFAULT_PANEL_WIDTH }
    }
}

/// Serialisable snapshot of view and interaction state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected_tool: String,
    pub selected_layer: Option<String>,
    pub selected_layers: Vec<String>,
    pub selected_page: String,
    pub zoom: f64,
    pub canvas_offset: Point,
    pub left_panel_width: f64,
    pub right_panel_width: f64,
    pub is_dragging: bool,
    pub is_resizing: bool,
    pub is_selecting: bool,
    pub resize_direction: Option<ResizeHandle>,
    pub drag_start: Option<Point>,
    pub selection_start: Option<Point>,
    pub selection_end: Option<Point>,
}

/// Editor state for one canvas session. Owns the document, the tool registry,
/// the selection, the camera and the interaction mode.
///
/// Free of browser dependencies so it can be tested natively; the
/// `wasm-bindgen` surface in [`crate::bindings`] only forwards to it.
#[derive(Debug, Clone, Default)]
pub struct EditorCore {
    doc: PageStore,
    tools: ToolRegistry,
    selection: Selection,
    camera: Camera,
    input: InteractionMode,
    panels: PanelLayout,
    /// Selection held when the current marquee started. Each marquee update
    /// selects this plus whatever the rectangle covers.
    marquee_base: Vec<String>,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document instead of the seeded one.
    #[must_use]
    pub fn with_doc(doc: PageStore) -> Self {
        Self { doc, ..Self::default() }
    }

    #[must_use]
    pub fn doc(&self) -> &PageStore {
        &self.doc
    }

    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn input(&self) -> InteractionMode {
        self.input
    }

    #[must_use]
    pub fn panels(&self) -> PanelLayout {
        self.panels
    }

    // --- Tools ---

    /// # Errors
    ///
    /// `UnknownTool` if no tool has this id; the active tool is unchanged.
    pub fn set_selected_tool(&mut self, tool_id: &str) -> Result<(), EditError> {
        self.tools.activate(tool_id)
    }

    // --- Selection ---

    #[must_use]
    pub fn selected_layer(&self) -> Option<&str> {
        self.selection.primary()
    }

    #[must_use]
    pub fn selected_layers(&self) -> &[String] {
        self.selection.ids()
    }

    pub fn set_selected_layer(&mut self, id: Option<&str>) {
        self.selection.set_single(id);
    }

    pub fn set_selected_layers<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.set_many(ids);
    }

    /// Returns false if `id` was already selected.
    pub fn add_to_selection(&mut self, id: &str) -> bool {
        self.selection.add(id)
    }

    /// Returns false if `id` was not selected.
    pub fn remove_from_selection(&mut self, id: &str) -> bool {
        self.selection.remove(id)
    }

    // --- Layers ---

    /// # Errors
    ///
    /// `NotFound` for a missing layer, `Locked` for a locked one.
    pub fn update_layer_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), EditError> {
        self.doc.update_layer_position(id, x, y)
    }

    /// # Errors
    ///
    /// `NotFound` for a missing layer, `Locked` for a locked one.
    pub fn update_layer_size(&mut self, id: &str, width: f64, height: f64) -> Result<(), EditError> {
        self.doc.update_layer_size(id, width, height)
    }

    /// Remove a layer and drop it (and its descendants) from the selection.
    ///
    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, EditError> {
        let removed = self.doc.remove_layer(id)?;
        let gone = removed.subtree_ids();
        self.selection.retain(|sel| !gone.contains(&sel));
        Ok(removed)
    }

    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> Result<(), EditError> {
        self.doc.set_layer_visible(id, visible)
    }

    /// Locked layers keep their selection but refuse geometry edits.
    ///
    /// # Errors
    ///
    /// `NotFound` if the current page has no such layer.
    pub fn set_layer_locked(&mut self, id: &str, locked: bool) -> Result<(), EditError> {
        self.doc.set_layer_locked(id, locked)
    }

    // --- Pages ---

    /// Switch pages. The selection belongs to the old page, so it is cleared
    /// and any gesture in progress is abandoned.
    ///
    /// # Errors
    ///
    /// `UnknownPage` if no page has this id.
    pub fn select_page(&mut self, page_id: &str) -> Result<(), EditError> {
        self.doc.select_page(page_id)?;
        self.selection.clear();
        self.input.transition(InteractionMode::Idle);
        Ok(())
    }

    /// # Errors
    ///
    /// `DuplicateId` if the page id or any layer id is already in use.
    pub fn add_page(&mut self, page: Page) -> Result<(), EditError> {
        self.doc.add_page(page)
    }

    /// # Errors
    ///
    /// `UnknownPage` for a missing page, `LastPage` when only one remains.
    pub fn remove_page(&mut self, page_id: &str) -> Result<Page, EditError> {
        let was_current = self.doc.current_page_id() == page_id;
        let removed = self.doc.remove_page(page_id)?;
        if was_current {
            self.selection.clear();
            self.input.transition(InteractionMode::Idle);
        }
        Ok(removed)
    }

    // --- Interaction mode ---

    pub fn set_drag_state(&mut self, is_dragging: bool, drag_start: Option<Point>) {
        self.input.set_drag_state(is_dragging, drag_start);
    }

    /// `false` when entering without a direction; the mode is then unchanged.
    pub fn set_resize_state(
        &mut self,
        is_resizing: bool,
        direction: Option<ResizeHandle>,
        drag_start: Option<Point>,
    ) -> bool {
        self.input.set_resize_state(is_resizing, direction, drag_start)
    }

    /// A marquee started here has no base selection: it selects only what
    /// it covers.
    pub fn set_selection_state(&mut self, is_selecting: bool, start: Option<Point>, end: Option<Point>) {
        if is_selecting && !self.input.is_selecting() {
            self.marquee_base.clear();
        }
        self.input.set_selection_state(is_selecting, start, end);
    }

    // --- View ---

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    pub fn set_canvas_offset(&mut self, x: f64, y: f64) {
        self.camera.set_offset(x, y);
    }

    pub fn pan_canvas(&mut self, dx: f64, dy: f64) {
        self.camera.pan_by(dx, dy);
    }

    /// Negative widths are treated as zero.
    pub fn set_panel_widths(&mut self, left: f64, right: f64) {
        self.panels = PanelLayout { left_width: left.max(0.0), right_width: right.max(0.0) };
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState {
            selected_tool: self.tools.active_id().to_owned(),
            selected_layer: self.selection.primary().map(str::to_owned),
            selected_layers: self.selection.ids().to_vec(),
            selected_page: self.doc.current_page_id().to_owned(),
            zoom: self.camera.zoom(),
            canvas_offset: self.camera.offset(),
            left_panel_width: self.panels.left_width,
            right_panel_width: self.panels.right_width,
            is_dragging: self.input.is_dragging(),
            is_resizing: self.input.is_resizing(),
            is_selecting: self.input.is_selecting(),
            resize_direction: self.input.resize_direction(),
            drag_start: self.input.drag_start(),
            selection_start: self.input.selection_start(),
            selection_end: self.input.selection_end(),
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);

        if let Some(kind) = self.tools.active().and_then(Tool::creates) {
            return self.create_layer_at(kind, world).unwrap_or_default();
        }

        let before = self.selection.clone();
        let mut actions = Vec::new();
        match hit_test(world, &self.doc, &self.camera, self.selection.primary()) {
            Some(Hit { part: HitPart::ResizeHandle(direction), .. }) => {
                self.input.set_resize_state(true, Some(direction), Some(world));
                actions.push(cursor(direction.cursor()));
            }
            Some(Hit { layer_id, part: HitPart::Body }) => {
                if modifiers.shift {
                    self.selection.toggle(&layer_id);
                } else if !self.selection.contains(&layer_id) {
                    self.selection.set_single(Some(&layer_id));
                }
                if self.selection.contains(&layer_id) {
                    self.input.set_drag_state(true, Some(world));
                    actions.push(cursor("move"));
                }
            }
            None => {
                if !modifiers.shift {
                    self.selection.clear();
                }
                self.marquee_base = self.selection.ids().to_vec();
                self.input.set_selection_state(true, Some(world), Some(world));
                actions.push(cursor("crosshair"));
            }
        }
        if self.selection != before {
            actions.push(self.selection_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match self.input {
            InteractionMode::Idle => vec![cursor(self.hover_cursor(world))],
            InteractionMode::Dragging { anchor } => {
                let actions = self.drag_selection(world.x - anchor.x, world.y - anchor.y);
                self.input.transition(InteractionMode::Dragging { anchor: world });
                actions
            }
            InteractionMode::Resizing { direction, anchor } => {
                let actions = self.resize_primary(direction, world.x - anchor.x, world.y - anchor.y);
                self.input.transition(InteractionMode::Resizing { direction, anchor: world });
                actions
            }
            InteractionMode::Selecting { start, .. } => {
                self.input.set_selection_state(true, Some(start), Some(world));
                let marquee = Rect::from_corners(start, world);
                let mut covered = self.marquee_base.clone();
                for id in layers_in_rect(&self.doc, &marquee) {
                    if !covered.contains(&id) {
                        covered.push(id);
                    }
                }
                let mut actions = Vec::new();
                if covered.as_slice() != self.selection.ids() {
                    self.selection.set_many(covered);
                    actions.push(self.selection_changed());
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.input.is_idle() {
            return Vec::new();
        }
        self.input.transition(InteractionMode::Idle);
        vec![cursor("default"), Action::RenderNeeded]
    }

    /// Ctrl/meta + wheel zooms about the pointer; a plain wheel pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            if delta.dy.abs() < f64::EPSILON {
                return Vec::new();
            }
            let factor = if delta.dy < 0.0 { WHEEL_ZOOM_STEP } else { 1.0 / WHEEL_ZOOM_STEP };
            self.camera.zoom_at(screen_pt, factor);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::ViewChanged, Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                self.input.transition(InteractionMode::Idle);
                let mut actions = Vec::new();
                if !self.selection.is_empty() {
                    self.selection.clear();
                    actions.push(self.selection_changed());
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            "Delete" | "Backspace" => self.delete_selected(),
            _ => Vec::new(),
        }
    }

    /// Remove every selected, unlocked layer. Locked layers stay selected.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for id in self.selection.ids().to_vec() {
            let locked = match self.doc.find_layer(&id) {
                Some(layer) => layer.locked,
                // Already removed along with a selected ancestor.
                None => continue,
            };
            if locked {
                continue;
            }
            if self.remove_layer(&id).is_ok() {
                actions.push(Action::LayerDeleted { id });
            }
        }
        if !actions.is_empty() {
            actions.push(self.selection_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Internals ---

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged { ids: self.selection.ids().to_vec() }
    }

    fn hover_cursor(&self, world: Point) -> &'static str {
        if self.tools.active_id() != SELECT_TOOL {
            return "crosshair";
        }
        match hit_test(world, &self.doc, &self.camera, self.selection.primary()) {
            Some(Hit { part: HitPart::ResizeHandle(direction), .. }) => direction.cursor(),
            Some(_) => "move",
            None => "default",
        }
    }

    fn create_layer_at(&mut self, kind: LayerKind, at: Point) -> Result<Vec<Action>, EditError> {
        let layer = default_layer(kind, at);
        let id = layer.id.clone();
        self.doc.add_layer(None, layer.clone())?;
        self.selection.set_single(Some(&id));
        self.tools.activate(SELECT_TOOL)?;
        Ok(vec![
            Action::LayerCreated { layer },
            self.selection_changed(),
            cursor("default"),
            Action::RenderNeeded,
        ])
    }

    /// Move each selected layer by a world-space delta. Layers nested inside
    /// another selected layer ride along with it and are not moved twice.
    fn drag_selection(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
            return Vec::new();
        }
        let ids = self.selection.ids().to_vec();
        let nested: Vec<String> = ids
            .iter()
            .filter_map(|id| self.doc.find_layer(id))
            .flat_map(|layer| layer.subtree_ids().into_iter().skip(1).map(str::to_owned))
            .collect();

        let mut actions = Vec::new();
        for id in ids.into_iter().filter(|id| !nested.contains(id)) {
            let Some(bounds) = self.doc.find_layer(&id).map(Layer::bounds) else {
                continue;
            };
            let moved = bounds.translate(dx, dy);
            if self.doc.update_layer_position(&id, moved.x, moved.y).is_ok() {
                actions.push(Action::LayerUpdated { id, bounds: moved });
            }
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn resize_primary(&mut self, direction: ResizeHandle, dx: f64, dy: f64) -> Vec<Action> {
        let Some(id) = self.selection.primary().map(str::to_owned) else {
            return Vec::new();
        };
        let Some(layer) = self.doc.find_layer(&id) else {
            return Vec::new();
        };
        if layer.locked {
            return Vec::new();
        }
        let resized = resize_rect(layer.bounds(), direction, dx, dy);
        let applied = self
            .doc
            .update_layer_position(&id, resized.x, resized.y)
            .and_then(|()| self.doc.update_layer_size(&id, resized.width, resized.height));
        match applied {
            Ok(()) => vec![Action::LayerUpdated { id, bounds: resized }, Action::RenderNeeded],
            Err(_) => Vec::new(),
        }
    }
}

fn cursor(name: &str) -> Action {
    Action::SetCursor { cursor: name.to_owned() }
}

/// Drag the edges named by `direction` by the delta. A dimension never drops
/// below `MIN_LAYER_SIZE`; when it would, the opposite edge stays put.
#[must_use]
pub fn resize_rect(bounds: Rect, direction: ResizeHandle, dx: f64, dy: f64) -> Rect {
    let (left, top, right, bottom) = direction.edges();
    let (x, width) = resize_axis(bounds.x, bounds.width, dx, left, right);
    let (y, height) = resize_axis(bounds.y, bounds.height, dy, top, bottom);
    Rect::new(x, y, width, height)
}

fn resize_axis(start: f64, size: f64, delta: f64, near: bool, far: bool) -> (f64, f64) {
    let far_edge = start + size;
    if near {
        let size = (size - delta).max(MIN_LAYER_SIZE);
        (far_edge - size, size)
    } else if far {
        (start, (size + delta).max(MIN_LAYER_SIZE))
    } else {
        (start, size)
    }
}

/// A freshly drawn layer of `kind` with its top-left corner at `at`.
fn default_layer(kind: LayerKind, at: Point) -> Layer {
    let bounds = Rect::new(at.x, at.y, DEFAULT_LAYER_WIDTH, DEFAULT_LAYER_HEIGHT);
    let layer = Layer::new(Layer::generate_id(), kind.label(), kind, bounds);
    match kind {
        LayerKind::Frame => layer.with_fill("#ffffff"),
        LayerKind::Rectangle | LayerKind::Image => layer.with_fill("#e5e7eb"),
        LayerKind::Circle => layer.with_fill("#e5e7eb").with_radius(DEFAULT_LAYER_WIDTH / 2.0),
        LayerKind::Text => layer.with_text("Text", 16.0).with_align(TextAlign::Left),
        LayerKind::Input => layer
            .with_fill("#ffffff")
            .with_stroke("#d1d5db", 1.0)
            .with_radius(6.0)
            .with_placeholder("Enter text..."),
        LayerKind::Button => layer
            .with_fill("#3b82f6")
            .with_radius(6.0)
            .with_text("Button", 14.0)
            .with_weight("600")
            .with_align(TextAlign::Center),
    }
}
