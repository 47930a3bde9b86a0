//! State model and gesture engine for the page-design canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! editable document (pages of nested layers), the tool palette, the
//! selection, the pan/zoom camera and the pointer interaction state. The host
//! JavaScript layer wires DOM events to [`bindings::CanvasSession`], draws
//! whatever the returned [`engine::Action`]s say changed, and renders the
//! panels around the canvas.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EditorCore`]: every editing operation plus pointer/wheel/key handling |
//! | [`bindings`] | `wasm-bindgen` wrapper around the editor core |
//! | [`doc`] | Layers, pages and the [`doc::PageStore`] that owns them |
//! | [`tool`] | The tool palette; exactly one tool is active |
//! | [`selection`] | Selected layer ids; the single selection is derived |
//! | [`input`] | Input event types and the interaction-mode state machine |
//! | [`hit`] | Hit-testing, resize handles and marquee selection |
//! | [`camera`] | Pan/zoom camera and screen/world conversions |
//! | [`consts`] | Shared numeric constants (zoom limits, default sizes, etc.) |

pub mod bindings;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod selection;
pub mod tool;
