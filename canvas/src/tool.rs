//! Tool registry: the fixed set of interaction tools, exactly one active.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use serde::{Deserialize, Serialize};

use crate::doc::{EditError, LayerKind};

/// Id of the pointer/selection tool.
pub const SELECT_TOOL: &str = "select";

/// One entry in the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    /// Icon name understood by the host UI.
    pub icon: String,
    pub active: bool,
}

impl Tool {
    fn new(id: &str, name: &str, icon: &str) -> Self {
        Self { id: id.to_owned(), name: name.to_owned(), icon: icon.to_owned(), active: id == SELECT_TOOL }
    }

    /// The layer kind a pointer-down with this tool creates, if any.
    #[must_use]
    pub fn creates(&self) -> Option<LayerKind> {
        match self.id.as_str() {
            "frame" => Some(LayerKind::Frame),
            "rectangle" => Some(LayerKind::Rectangle),
            "circle" => Some(LayerKind::Circle),
            "text" => Some(LayerKind::Text),
            "image" => Some(LayerKind::Image),
            "input" => Some(LayerKind::Input),
            "button" => Some(LayerKind::Button),
            _ => None,
        }
    }
}

/// Ordered tool collection. Exactly one tool is active at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: vec![
                Tool::new(SELECT_TOOL, "Select", "MousePointer2"),
                Tool::new("frame", "Frame", "Square"),
                Tool::new("rectangle", "Rectangle", "RectangleHorizontal"),
                Tool::new("circle", "Circle", "Circle"),
                Tool::new("text", "Text", "Type"),
                Tool::new("input", "Input", "AlignLeft"),
                Tool::new("button", "Button", "RectangleHorizontal"),
            ],
        }
    }
}

impl ToolRegistry {
    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// The active tool. The registry never leaves every tool inactive, so this
    /// only returns `None` for an empty registry.
    #[must_use]
    pub fn active(&self) -> Option<&Tool> {
        self.tools.iter().find(|t| t.active)
    }

    #[must_use]
    pub fn active_id(&self) -> &str {
        self.active().map_or(SELECT_TOOL, |t| t.id.as_str())
    }

    /// Activate `id` and deactivate every other tool.
    ///
    /// # Errors
    ///
    /// `UnknownTool` when no tool has that id; the registry is left unchanged.
    pub fn activate(&mut self, id: &str) -> Result<(), EditError> {
        if !self.tools.iter().any(|t| t.id == id) {
            return Err(EditError::UnknownTool(id.to_owned()));
        }
        for tool in &mut self.tools {
            tool.active = tool.id == id;
        }
        Ok(())
    }
}
