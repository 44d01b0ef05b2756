use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::ink::InkTool;
use super::sculpt::SculptTool;

/// Enumeration of available sketch tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Sculpt,
    Ink,
}

impl ToolType {
    /// Stable string identifier for frontend communication.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sculpt => "sculpt",
            Self::Ink => "ink",
        }
    }
}

/// Resource tracking the currently active tool.
///
/// Only one tool can own the pointer at a time; activating a tool
/// deactivates the previous one and clears its in-progress state.
#[derive(Resource, Default)]
pub struct ToolManager {
    active_tool: Option<ToolType>,
}

impl ToolManager {
    /// Activate the specified tool. Returns `false` when it was already active.
    pub fn activate_tool(&mut self, tool_type: ToolType) -> bool {
        if self.active_tool == Some(tool_type) {
            return false;
        }
        self.active_tool = Some(tool_type);
        info!("Tool activated: {}", tool_type.label());
        true
    }

    /// Deactivate the currently active tool, returning it.
    pub fn deactivate_current_tool(&mut self) -> Option<ToolType> {
        let previous = self.active_tool.take();
        if let Some(tool) = previous {
            info!("Tool deactivated: {}", tool.label());
        }
        previous
    }

    pub fn active_tool(&self) -> Option<ToolType> {
        self.active_tool
    }

    pub fn is_tool_active(&self, tool_type: ToolType) -> bool {
        self.active_tool == Some(tool_type)
    }
}

/// Keyboard shortcuts: `G` sculpts the ground, `I` draws ink strokes,
/// `Escape` drops the active tool.
pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut manager: ResMut<ToolManager>,
    mut sculpt: ResMut<SculptTool>,
    mut ink: ResMut<InkTool>,
) {
    if keyboard.just_pressed(KeyCode::KeyG) && manager.activate_tool(ToolType::Sculpt) {
        ink.set_active(false);
        sculpt.set_active(true);
    }
    if keyboard.just_pressed(KeyCode::KeyI) && manager.activate_tool(ToolType::Ink) {
        sculpt.set_active(false);
        ink.set_active(true);
    }
    if keyboard.just_pressed(KeyCode::Escape) && manager.deactivate_current_tool().is_some() {
        sculpt.set_active(false);
        ink.set_active(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_exclusive_and_idempotent() {
        let mut manager = ToolManager::default();
        assert!(manager.activate_tool(ToolType::Sculpt));
        assert!(!manager.activate_tool(ToolType::Sculpt));
        assert!(manager.is_tool_active(ToolType::Sculpt));

        assert!(manager.activate_tool(ToolType::Ink));
        assert!(!manager.is_tool_active(ToolType::Sculpt));
        assert_eq!(manager.deactivate_current_tool(), Some(ToolType::Ink));
        assert_eq!(manager.active_tool(), None);
    }
}
