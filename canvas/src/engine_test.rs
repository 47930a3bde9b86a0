#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn shift_modifier() -> Modifiers {
    Modifiers { shift: true, ..Modifiers::default() }
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Modifiers::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_layer_updated(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::LayerUpdated { .. }))
}

fn layer_xy(core: &EditorCore, id: &str) -> (f64, f64) {
    let layer = core.doc().find_layer(id).unwrap();
    (layer.x, layer.y)
}

fn layer_size(core: &EditorCore, id: &str) -> (f64, f64) {
    let layer = core.doc().find_layer(id).unwrap();
    (layer.width, layer.height)
}

// Default camera: screen and world coincide. The seeded email input
// (layer-5) occupies (240,255)-(560,299) in world space.
const EMAIL_INPUT: (f64, f64) = (300.0, 270.0);
const EMPTY: (f64, f64) = (50.0, 50.0);

// =============================================================
// Defaults
// =============================================================

#[test]
fn core_default_view_state() {
    let core = EditorCore::new();
    let view = core.view_state();
    assert_eq!(view.selected_tool, "select");
    assert_eq!(view.selected_layer, None);
    assert!(view.selected_layers.is_empty());
    assert_eq!(view.selected_page, "page-1");
    assert_eq!(view.zoom, 1.0);
    assert_eq!(view.canvas_offset, pt(0.0, 0.0));
    assert_eq!(view.left_panel_width, 260.0);
    assert_eq!(view.right_panel_width, 260.0);
    assert!(!view.is_dragging && !view.is_resizing && !view.is_selecting);
}

#[test]
fn core_view_state_uses_camel_case_keys() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    core.set_resize_state(true, Some(ResizeHandle::Ne), Some(pt(1.0, 2.0)));
    let value = serde_json::to_value(core.view_state()).unwrap();
    assert_eq!(value["selectedTool"], json!("select"));
    assert_eq!(value["selectedLayer"], json!("layer-5"));
    assert_eq!(value["selectedLayers"], json!(["layer-5"]));
    assert_eq!(value["canvasOffset"], json!({ "x": 0.0, "y": 0.0 }));
    assert_eq!(value["isResizing"], json!(true));
    assert_eq!(value["resizeDirection"], json!("ne"));
    assert_eq!(value["dragStart"], json!({ "x": 1.0, "y": 2.0 }));
    assert_eq!(value["selectionStart"], json!(null));
}

#[test]
fn core_with_doc_uses_given_pages() {
    let core = EditorCore::with_doc(PageStore::new(Page::new("p", "Empty")).unwrap());
    assert_eq!(core.view_state().selected_page, "p");
    assert!(core.doc().current_layers().is_empty());
}

// =============================================================
// Tools / selection / layers
// =============================================================

#[test]
fn core_set_selected_tool() {
    let mut core = EditorCore::new();
    core.set_selected_tool("circle").unwrap();
    assert_eq!(core.view_state().selected_tool, "circle");
    assert_eq!(core.tools().tools().iter().filter(|t| t.active).count(), 1);
}

#[test]
fn core_set_selected_tool_unknown_keeps_active() {
    let mut core = EditorCore::new();
    core.set_selected_tool("frame").unwrap();
    let err = core.set_selected_tool("lasso").unwrap_err();
    assert_eq!(err, EditError::UnknownTool("lasso".into()));
    assert_eq!(core.view_state().selected_tool, "frame");
}

#[test]
fn core_selection_single_follows_list() {
    let mut core = EditorCore::new();
    core.add_to_selection("a");
    assert_eq!(core.selected_layer(), Some("a"));
    core.add_to_selection("b");
    assert_eq!(core.selected_layer(), None);
    core.remove_from_selection("a");
    assert_eq!(core.selected_layer(), Some("b"));
    core.set_selected_layers(["x", "y"]);
    assert_eq!(core.selected_layers(), ["x", "y"]);
    core.set_selected_layer(None);
    assert!(core.selected_layers().is_empty());
}

#[test]
fn core_update_layer_position_on_seeded_page() {
    let mut core = EditorCore::new();
    core.update_layer_position("layer-5", 300.0, 400.0).unwrap();
    assert_eq!(layer_xy(&core, "layer-5"), (300.0, 400.0));
    let owning = &core.doc().pages()[0].layers[0].children[3];
    assert_eq!((owning.id.as_str(), owning.x, owning.y), ("layer-5", 300.0, 400.0));
    assert_eq!(layer_xy(&core, "layer-7"), (40.0, 245.0));
}

#[test]
fn core_update_layer_size_declined_when_locked() {
    let mut core = EditorCore::new();
    core.set_layer_locked("layer-9", true).unwrap();
    let err = core.update_layer_size("layer-9", 10.0, 10.0).unwrap_err();
    assert_eq!(err, EditError::Locked("layer-9".into()));
    assert_eq!(layer_size(&core, "layer-9"), (320.0, 44.0));
}

#[test]
fn core_layer_flags_go_through_the_editor() {
    let mut core = EditorCore::new();
    core.set_layer_visible("layer-5", false).unwrap();
    core.set_layer_locked("layer-7", true).unwrap();
    assert!(!core.doc().find_layer("layer-5").unwrap().visible);
    assert!(core.doc().find_layer("layer-7").unwrap().locked);

    // A hidden layer is not pickable; the press falls through to the frame.
    core.on_pointer_down(pt(EMAIL_INPUT.0, EMAIL_INPUT.1), Button::Primary, no_modifiers());
    assert_eq!(core.selected_layers(), ["layer-1"]);

    assert_eq!(core.set_layer_visible("nope", true), Err(EditError::NotFound("nope".into())));
    assert_eq!(core.set_layer_locked("nope", true), Err(EditError::NotFound("nope".into())));
}

#[test]
fn core_remove_layer_prunes_selection() {
    let mut core = EditorCore::new();
    core.set_selected_layers(["layer-1", "layer-5", "other"]);
    core.remove_layer("layer-1").unwrap();
    assert_eq!(core.selected_layers(), ["other"]);
    assert!(core.doc().find_layer("layer-5").is_none());
}

// =============================================================
// Pages
// =============================================================

#[test]
fn core_select_page_clears_selection_and_gesture() {
    let mut core = EditorCore::new();
    core.add_page(Page::new("page-2", "Blank")).unwrap();
    core.set_selected_layer(Some("layer-5"));
    core.set_drag_state(true, Some(pt(0.0, 0.0)));
    core.select_page("page-2").unwrap();
    assert!(core.selected_layers().is_empty());
    assert!(core.input().is_idle());
    assert_eq!(core.view_state().selected_page, "page-2");
}

#[test]
fn core_select_unknown_page_keeps_selection() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    assert!(core.select_page("nope").is_err());
    assert_eq!(core.selected_layer(), Some("layer-5"));
}

#[test]
fn core_remove_other_page_keeps_selection() {
    let mut core = EditorCore::new();
    core.add_page(Page::new("page-2", "Blank")).unwrap();
    core.set_selected_layer(Some("layer-5"));
    core.remove_page("page-2").unwrap();
    assert_eq!(core.selected_layer(), Some("layer-5"));
}

#[test]
fn core_remove_current_page_clears_selection() {
    let mut core = EditorCore::new();
    core.add_page(Page::new("page-2", "Blank")).unwrap();
    core.set_selected_layer(Some("layer-5"));
    core.remove_page("page-1").unwrap();
    assert!(core.selected_layers().is_empty());
    assert_eq!(core.view_state().selected_page, "page-2");
}

// =============================================================
// Interaction mode / view
// =============================================================

#[test]
fn core_drag_then_resize_is_exclusive() {
    let mut core = EditorCore::new();
    core.set_drag_state(true, Some(pt(1.0, 1.0)));
    core.set_resize_state(true, Some(ResizeHandle::S), Some(pt(2.0, 2.0)));
    let view = core.view_state();
    assert!(!view.is_dragging);
    assert!(view.is_resizing);
}

#[test]
fn core_zoom_clamped() {
    let mut core = EditorCore::new();
    core.set_zoom(10.0);
    assert_eq!(core.view_state().zoom, 5.0);
    core.set_zoom(-1.0);
    assert_eq!(core.view_state().zoom, 0.1);
}

#[test]
fn core_offset_and_pan() {
    let mut core = EditorCore::new();
    core.set_canvas_offset(10.0, 20.0);
    core.pan_canvas(5.0, -5.0);
    assert_eq!(core.view_state().canvas_offset, pt(15.0, 15.0));
}

#[test]
fn core_panel_widths_floor_at_zero() {
    let mut core = EditorCore::new();
    core.set_panel_widths(-10.0, 300.0);
    assert_eq!(core.panels(), PanelLayout { left_width: 0.0, right_width: 300.0 });
}

// =============================================================
// Pointer: select tool
// =============================================================

#[test]
fn pointer_down_on_layer_selects_and_drags() {
    let mut core = EditorCore::new();
    let actions = core.on_pointer_down(pt(EMAIL_INPUT.0, EMAIL_INPUT.1), Button::Primary, no_modifiers());
    assert_eq!(core.selected_layer(), Some("layer-5"));
    assert!(core.input().is_dragging());
    assert!(actions.contains(&Action::SelectionChanged { ids: vec!["layer-5".into()] }));
    assert!(actions.contains(&Action::SetCursor { cursor: "move".into() }));
    assert!(has_render_needed(&actions));
}

#[test]
fn pointer_drag_moves_layer_incrementally() {
    let mut core = EditorCore::new();
    core.on_pointer_down(pt(300.0, 270.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(310.0, 290.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-5"), (50.0, 175.0));
    assert!(actions.contains(&Action::LayerUpdated {
        id: "layer-5".into(),
        bounds: Rect::new(50.0, 175.0, 320.0, 44.0),
    }));
    core.on_pointer_move(pt(305.0, 290.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-5"), (45.0, 175.0));

    let up = core.on_pointer_up(pt(305.0, 290.0), Button::Primary, no_modifiers());
    assert!(core.input().is_idle());
    assert!(up.contains(&Action::SetCursor { cursor: "default".into() }));
}

#[test]
fn pointer_drag_respects_zoom() {
    let mut core = EditorCore::new();
    core.set_zoom(2.0);
    // layer-5 is at world (240,255); on screen that is (480,510).
    core.on_pointer_down(pt(500.0, 520.0), Button::Primary, no_modifiers());
    assert_eq!(core.selected_layer(), Some("layer-5"));
    core.on_pointer_move(pt(520.0, 520.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-5"), (50.0, 155.0));
}

#[test]
fn pointer_drag_locked_layer_declined() {
    let mut core = EditorCore::new();
    core.set_layer_locked("layer-5", true).unwrap();
    core.on_pointer_down(pt(300.0, 270.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(350.0, 300.0), no_modifiers());
    assert!(!has_layer_updated(&actions));
    assert_eq!(layer_xy(&core, "layer-5"), (40.0, 155.0));
}

#[test]
fn pointer_drag_nested_selection_moves_once() {
    let mut core = EditorCore::new();
    core.set_selected_layers(["layer-1", "layer-5"]);
    core.set_drag_state(true, Some(pt(300.0, 270.0)));
    core.on_pointer_move(pt(310.0, 270.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-1"), (210.0, 100.0));
    assert_eq!(layer_xy(&core, "layer-5"), (40.0, 155.0));
}

#[test]
fn pointer_down_keeps_multi_selection_when_hitting_member() {
    let mut core = EditorCore::new();
    core.set_selected_layers(["layer-5", "layer-7"]);
    core.on_pointer_down(pt(300.0, 270.0), Button::Primary, no_modifiers());
    assert_eq!(core.selected_layers(), ["layer-5", "layer-7"]);
    core.on_pointer_move(pt(300.0, 280.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-5"), (40.0, 165.0));
    assert_eq!(layer_xy(&core, "layer-7"), (40.0, 255.0));
}

#[test]
fn pointer_shift_click_toggles() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    // layer-7 sits at world (240,345)-(560,389).
    core.on_pointer_down(pt(300.0, 360.0), Button::Primary, shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-5", "layer-7"]);
    core.on_pointer_up(pt(300.0, 360.0), Button::Primary, shift_modifier());

    core.on_pointer_down(pt(300.0, 270.0), Button::Primary, shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-7"]);
    assert!(core.input().is_idle());
}

#[test]
fn pointer_down_on_empty_starts_marquee() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    let actions = core.on_pointer_down(pt(EMPTY.0, EMPTY.1), Button::Primary, no_modifiers());
    assert!(core.input().is_selecting());
    assert!(core.selected_layers().is_empty());
    assert!(actions.contains(&Action::SelectionChanged { ids: vec![] }));
    assert_eq!(core.view_state().selection_start, Some(pt(50.0, 50.0)));
}

#[test]
fn pointer_shift_down_on_empty_keeps_selection() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    core.on_pointer_down(pt(EMPTY.0, EMPTY.1), Button::Primary, shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-5"]);
}

#[test]
fn pointer_marquee_selects_enclosed_layers() {
    let mut core = EditorCore::new();
    // Start right of the login frame so the press lands on empty canvas.
    core.on_pointer_down(pt(650.0, 250.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(230.0, 395.0), no_modifiers());
    assert_eq!(core.selected_layers(), ["layer-5", "layer-6", "layer-7"]);
    assert!(actions.contains(&Action::SelectionChanged {
        ids: vec!["layer-5".into(), "layer-6".into(), "layer-7".into()],
    }));
    assert_eq!(core.input().selection_rect(), Some(Rect::new(230.0, 250.0, 420.0, 145.0)));

    // Same marquee again: nothing new to report.
    let again = core.on_pointer_move(pt(230.0, 395.0), no_modifiers());
    assert!(!has_action(&again, |a| matches!(a, Action::SelectionChanged { .. })));

    core.on_pointer_up(pt(230.0, 395.0), Button::Primary, no_modifiers());
    assert!(core.input().is_idle());
    assert_eq!(core.selected_layers().len(), 3);
}

#[test]
fn shift_marquee_adds_to_existing_selection() {
    let mut core = EditorCore::new();
    // layer-9 sits at world (240,440)-(560,484), below the marquee.
    core.set_selected_layer(Some("layer-9"));
    core.on_pointer_down(pt(650.0, 250.0), Button::Primary, shift_modifier());
    let actions = core.on_pointer_move(pt(230.0, 395.0), shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-9", "layer-5", "layer-6", "layer-7"]);
    assert!(actions.contains(&Action::SelectionChanged {
        ids: vec!["layer-9".into(), "layer-5".into(), "layer-6".into(), "layer-7".into()],
    }));

    // Shrinking the marquee drops its hits but never the starting selection.
    core.on_pointer_move(pt(640.0, 260.0), shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-9"]);
}

#[test]
fn shift_marquee_over_already_selected_layer_keeps_one_entry() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-7"));
    core.on_pointer_down(pt(650.0, 250.0), Button::Primary, shift_modifier());
    core.on_pointer_move(pt(230.0, 395.0), shift_modifier());
    assert_eq!(core.selected_layers(), ["layer-7", "layer-5", "layer-6"]);
}

#[test]
fn host_started_marquee_replaces_selection() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-9"));
    core.set_selection_state(true, Some(pt(650.0, 250.0)), Some(pt(650.0, 250.0)));
    core.on_pointer_move(pt(230.0, 395.0), no_modifiers());
    assert_eq!(core.selected_layers(), ["layer-5", "layer-6", "layer-7"]);
}

#[test]
fn pointer_resize_from_handle() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    // South-east corner of layer-5.
    let actions = core.on_pointer_down(pt(560.0, 299.0), Button::Primary, no_modifiers());
    assert!(core.input().is_resizing());
    assert_eq!(core.input().resize_direction(), Some(ResizeHandle::Se));
    assert!(actions.contains(&Action::SetCursor { cursor: ResizeHandle::Se.cursor().into() }));

    core.on_pointer_move(pt(580.0, 309.0), no_modifiers());
    assert_eq!(layer_size(&core, "layer-5"), (340.0, 54.0));
    assert_eq!(layer_xy(&core, "layer-5"), (40.0, 155.0));
}

#[test]
fn pointer_resize_from_west_moves_left_edge() {
    let mut core = EditorCore::new();
    core.set_selected_layer(Some("layer-5"));
    core.set_resize_state(true, Some(ResizeHandle::W), Some(pt(240.0, 277.0)));
    core.on_pointer_move(pt(250.0, 277.0), no_modifiers());
    assert_eq!(layer_xy(&core, "layer-5"), (50.0, 155.0));
    assert_eq!(layer_size(&core, "layer-5"), (310.0, 44.0));
}

#[test]
fn pointer_non_primary_button_ignored() {
    let mut core = EditorCore::new();
    let actions = core.on_pointer_down(pt(300.0, 270.0), Button::Secondary, no_modifiers());
    assert!(actions.is_empty());
    assert!(core.selected_layers().is_empty());
    assert!(core.input().is_idle());
}

#[test]
fn pointer_up_when_idle_is_quiet() {
    let mut core = EditorCore::new();
    assert!(core.on_pointer_up(pt(0.0, 0.0), Button::Primary, no_modifiers()).is_empty());
}

#[test]
fn pointer_hover_sets_cursor() {
    let mut core = EditorCore::new();
    let over = core.on_pointer_move(pt(300.0, 270.0), no_modifiers());
    assert_eq!(over, vec![Action::SetCursor { cursor: "move".into() }]);
    let away = core.on_pointer_move(pt(EMPTY.0, EMPTY.1), no_modifiers());
    assert_eq!(away, vec![Action::SetCursor { cursor: "default".into() }]);
    core.set_selected_tool("text").unwrap();
    let drawing = core.on_pointer_move(pt(300.0, 270.0), no_modifiers());
    assert_eq!(drawing, vec![Action::SetCursor { cursor: "crosshair".into() }]);
}

// =============================================================
// Pointer: creation tools
// =============================================================

#[test]
fn creation_tool_adds_layer_and_returns_to_select() {
    let mut core = EditorCore::new();
    core.set_selected_tool("rectangle").unwrap();
    let actions = core.on_pointer_down(pt(EMPTY.0, EMPTY.1), Button::Primary, no_modifiers());

    let created = actions.iter().find_map(|a| match a {
        Action::LayerCreated { layer } => Some(layer.clone()),
        _ => None,
    });
    let layer = created.unwrap();
    assert_eq!(layer.kind, LayerKind::Rectangle);
    assert_eq!((layer.x, layer.y), (50.0, 50.0));
    assert!(layer.id.starts_with("layer-"));
    assert_eq!(core.doc().current_layers().len(), 2);
    assert_eq!(core.selected_layer(), Some(layer.id.as_str()));
    assert_eq!(core.tools().active_id(), "select");
    assert!(core.input().is_idle());
}

#[test]
fn creation_tool_uses_world_coordinates() {
    let mut core = EditorCore::new();
    core.set_zoom(2.0);
    core.set_canvas_offset(20.0, 10.0);
    core.set_selected_tool("text").unwrap();
    core.on_pointer_down(pt(120.0, 60.0), Button::Primary, no_modifiers());
    let id = core.selected_layer().unwrap().to_owned();
    let layer = core.doc().find_layer(&id).unwrap();
    assert_eq!((layer.x, layer.y), (50.0, 25.0));
    assert_eq!(layer.text.as_deref(), Some("Text"));
}

#[test]
fn default_layers_carry_kind_content() {
    let button = default_layer(LayerKind::Button, pt(0.0, 0.0));
    assert_eq!(button.text.as_deref(), Some("Button"));
    let input = default_layer(LayerKind::Input, pt(0.0, 0.0));
    assert!(input.placeholder.is_some());
    let frame = default_layer(LayerKind::Frame, pt(0.0, 0.0));
    assert!(frame.is_container());
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_pans_without_modifier() {
    let mut core = EditorCore::new();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 10.0, dy: 20.0 }, no_modifiers());
    assert_eq!(core.camera().offset(), pt(-10.0, -20.0));
    assert_eq!(actions, vec![Action::ViewChanged, Action::RenderNeeded]);
}

#[test]
fn wheel_with_ctrl_zooms_at_pointer() {
    let mut core = EditorCore::new();
    let anchor = pt(400.0, 300.0);
    let before = core.camera().screen_to_world(anchor);
    core.on_wheel(anchor, WheelDelta { dx: 0.0, dy: -100.0 }, ctrl_modifier());
    assert!((core.camera().zoom() - WHEEL_ZOOM_STEP).abs() < 1e-9);
    let after = core.camera().screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

    core.on_wheel(anchor, WheelDelta { dx: 0.0, dy: 100.0 }, ctrl_modifier());
    assert!((core.camera().zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn wheel_zoom_with_zero_delta_is_noop() {
    let mut core = EditorCore::new();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 5.0, dy: 0.0 }, ctrl_modifier());
    assert!(actions.is_empty());
    assert_eq!(*core.camera(), Camera::default());
}

// =============================================================
// Keys
// =============================================================

#[test]
fn escape_cancels_gesture_and_selection() {
    let mut core = EditorCore::new();
    core.on_pointer_down(pt(300.0, 270.0), Button::Primary, no_modifiers());
    let actions = core.on_key_down(&key("Escape"), no_modifiers());
    assert!(core.input().is_idle());
    assert!(core.selected_layers().is_empty());
    assert!(actions.contains(&Action::SelectionChanged { ids: vec![] }));
}

#[test]
fn delete_removes_selected_layers() {
    let mut core = EditorCore::new();
    core.set_selected_layers(["layer-5", "layer-7"]);
    let actions = core.on_key_down(&key("Delete"), no_modifiers());
    assert!(actions.contains(&Action::LayerDeleted { id: "layer-5".into() }));
    assert!(actions.contains(&Action::LayerDeleted { id: "layer-7".into() }));
    assert!(core.doc().find_layer("layer-5").is_none());
    assert!(core.selected_layers().is_empty());
}

#[test]
fn backspace_skips_locked_layers() {
    let mut core = EditorCore::new();
    core.set_layer_locked("layer-7", true).unwrap();
    core.set_selected_layers(["layer-5", "layer-7"]);
    core.on_key_down(&key("Backspace"), no_modifiers());
    assert!(core.doc().find_layer("layer-5").is_none());
    assert!(core.doc().find_layer("layer-7").is_some());
    assert_eq!(core.selected_layers(), ["layer-7"]);
}

#[test]
fn delete_frame_with_selected_child_reports_frame_once() {
    let mut core = EditorCore::new();
    core.set_selected_layers(["layer-1", "layer-5"]);
    let actions = core.delete_selected();
    let deleted: Vec<_> = actions
        .iter()
        .filter(|a| matches!(a, Action::LayerDeleted { .. }))
        .collect();
    assert_eq!(deleted, vec![&Action::LayerDeleted { id: "layer-1".into() }]);
    assert!(core.doc().current_layers().is_empty());
}

#[test]
fn delete_with_empty_selection_is_quiet() {
    let mut core = EditorCore::new();
    assert!(core.on_key_down(&key("Delete"), no_modifiers()).is_empty());
}

#[test]
fn other_keys_ignored() {
    let mut core = EditorCore::new();
    assert!(core.on_key_down(&key("a"), no_modifiers()).is_empty());
}

// =============================================================
// resize_rect
// =============================================================

#[test]
fn resize_rect_corner_grows_both_axes() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::Se, 10.0, 5.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 110.0, 55.0));
}

#[test]
fn resize_rect_north_west_moves_origin() {
    let r = resize_rect(Rect::new(10.0, 10.0, 100.0, 50.0), ResizeHandle::Nw, 5.0, -5.0);
    assert_eq!(r, Rect::new(15.0, 5.0, 95.0, 55.0));
}

#[test]
fn resize_rect_edge_handle_ignores_other_axis() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::E, 10.0, 999.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 110.0, 50.0));
}

#[test]
fn resize_rect_clamps_to_minimum_and_pins_far_edge() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::W, 500.0, 0.0);
    assert_eq!(r.width, MIN_LAYER_SIZE);
    assert_eq!(r.right(), 100.0);
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::S, 0.0, -500.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 100.0, MIN_LAYER_SIZE));
}

// =============================================================
// Action serialisation
// =============================================================

#[test]
fn actions_serialize_with_type_tag() {
    let value = serde_json::to_value(Action::SetCursor { cursor: "move".into() }).unwrap();
    assert_eq!(value, json!({ "type": "setCursor", "cursor": "move" }));
    let value = serde_json::to_value(Action::RenderNeeded).unwrap();
    assert_eq!(value, json!({ "type": "renderNeeded" }));
    let value = serde_json::to_value(Action::LayerUpdated {
        id: "a".into(),
        bounds: Rect::new(1.0, 2.0, 3.0, 4.0),
    })
    .unwrap();
    assert_eq!(value["bounds"]["width"], json!(3.0));
}
