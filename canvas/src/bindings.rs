//! `wasm-bindgen` surface for the browser host.
//!
//! Every call forwards to [`EditorCore`]. Structured results (view state,
//! pages, actions) cross the boundary as JSON strings; failures become a
//! `JsValue` string carrying the error message.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::camera::Point;
use crate::engine::EditorCore;
use crate::hit::ResizeHandle;
use crate::input::{Button, Key, Modifiers, WheelDelta};

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

/// Bit flags for held modifier keys, as packed by the host.
pub const MOD_SHIFT: u32 = 1;
pub const MOD_CTRL: u32 = 2;
pub const MOD_ALT: u32 = 4;
pub const MOD_META: u32 = 8;

#[must_use]
pub fn modifiers_from_bits(bits: u32) -> Modifiers {
    Modifiers {
        shift: bits & MOD_SHIFT != 0,
        ctrl: bits & MOD_CTRL != 0,
        alt: bits & MOD_ALT != 0,
        meta: bits & MOD_META != 0,
    }
}

/// Map `MouseEvent.button` to a [`Button`]. Unknown buttons count as secondary.
#[must_use]
pub fn button_from_code(code: u16) -> Button {
    match code {
        0 => Button::Primary,
        1 => Button::Middle,
        _ => Button::Secondary,
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One editing session, owned by the host page.
#[wasm_bindgen]
#[derive(Default)]
pub struct CanvasSession {
    core: EditorCore,
}

#[wasm_bindgen]
impl CanvasSession {
    /// A session over the seeded starter document.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Snapshots ---

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn view_state(&self) -> Result<String, JsValue> {
        to_json(&self.core.view_state())
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn pages(&self) -> Result<String, JsValue> {
        to_json(&self.core.doc().pages())
    }

    /// Root layers of the current page.
    ///
    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn current_layers(&self) -> Result<String, JsValue> {
        to_json(&self.core.doc().current_layers())
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn tools(&self) -> Result<String, JsValue> {
        to_json(&self.core.tools().tools())
    }

    // --- Tools / pages / selection ---

    /// # Errors
    ///
    /// Rejects an unknown tool id.
    pub fn set_selected_tool(&mut self, tool_id: &str) -> Result<(), JsValue> {
        self.core.set_selected_tool(tool_id).map_err(to_js)
    }

    /// # Errors
    ///
    /// Rejects an unknown page id.
    pub fn select_page(&mut self, page_id: &str) -> Result<(), JsValue> {
        self.core.select_page(page_id).map_err(to_js)
    }

    pub fn set_selected_layer(&mut self, id: Option<String>) {
        self.core.set_selected_layer(id.as_deref());
    }

    pub fn set_selected_layers(&mut self, ids: Vec<String>) {
        self.core.set_selected_layers(ids);
    }

    pub fn add_to_selection(&mut self, id: &str) -> bool {
        self.core.add_to_selection(id)
    }

    pub fn remove_from_selection(&mut self, id: &str) -> bool {
        self.core.remove_from_selection(id)
    }

    // --- Layers ---

    /// # Errors
    ///
    /// Rejects a missing or locked layer.
    pub fn update_layer_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.core.update_layer_position(id, x, y).map_err(to_js)
    }

    /// # Errors
    ///
    /// Rejects a missing or locked layer.
    pub fn update_layer_size(&mut self, id: &str, width: f64, height: f64) -> Result<(), JsValue> {
        self.core.update_layer_size(id, width, height).map_err(to_js)
    }

    /// # Errors
    ///
    /// Rejects a missing layer.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> Result<(), JsValue> {
        self.core.set_layer_visible(id, visible).map_err(to_js)
    }

    /// # Errors
    ///
    /// Rejects a missing layer.
    pub fn set_layer_locked(&mut self, id: &str, locked: bool) -> Result<(), JsValue> {
        self.core.set_layer_locked(id, locked).map_err(to_js)
    }

    // --- Interaction mode ---

    pub fn set_drag_state(&mut self, is_dragging: bool, x: f64, y: f64) {
        self.core.set_drag_state(is_dragging, Some(Point::new(x, y)));
    }

    /// `direction` is a handle tag such as `"se"`. Returns `false` when a
    /// resize is requested with an unknown tag; the mode is then unchanged.
    pub fn set_resize_state(&mut self, is_resizing: bool, direction: &str, x: f64, y: f64) -> bool {
        self.core.set_resize_state(is_resizing, ResizeHandle::parse(direction), Some(Point::new(x, y)))
    }

    pub fn set_selection_state(&mut self, is_selecting: bool, start_x: f64, start_y: f64, end_x: f64, end_y: f64) {
        self.core.set_selection_state(
            is_selecting,
            Some(Point::new(start_x, start_y)),
            Some(Point::new(end_x, end_y)),
        );
    }

    // --- View ---

    pub fn set_zoom(&mut self, zoom: f64) {
        self.core.set_zoom(zoom);
    }

    pub fn set_canvas_offset(&mut self, x: f64, y: f64) {
        self.core.set_canvas_offset(x, y);
    }

    pub fn pan_canvas(&mut self, dx: f64, dy: f64) {
        self.core.pan_canvas(dx, dy);
    }

    pub fn set_panel_widths(&mut self, left: f64, right: f64) {
        self.core.set_panel_widths(left, right);
    }

    // --- Input events (each returns a JSON array of actions) ---

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: u16, modifiers: u32) -> Result<String, JsValue> {
        let actions =
            self.core
                .on_pointer_down(Point::new(x, y), button_from_code(button), modifiers_from_bits(modifiers));
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, modifiers: u32) -> Result<String, JsValue> {
        to_json(&self.core.on_pointer_move(Point::new(x, y), modifiers_from_bits(modifiers)))
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn on_pointer_up(&mut self, x: f64, y: f64, button: u16, modifiers: u32) -> Result<String, JsValue> {
        let actions =
            self.core
                .on_pointer_up(Point::new(x, y), button_from_code(button), modifiers_from_bits(modifiers));
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn on_wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers: u32) -> Result<String, JsValue> {
        let actions = self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers_from_bits(modifiers));
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if serialisation fails.
    pub fn on_key_down(&mut self, key: String, modifiers: u32) -> Result<String, JsValue> {
        to_json(&self.core.on_key_down(&Key(key), modifiers_from_bits(modifiers)))
    }
}
