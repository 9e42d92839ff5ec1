use egui::Color32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    GridDraw,
    Fill,
    ColorPicker,
    RectSelect,
    Select,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Pencil,
        Tool::Eraser,
        Tool::GridDraw,
        Tool::Fill,
        Tool::ColorPicker,
        Tool::RectSelect,
        Tool::Select,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::GridDraw => "Grid",
            Tool::Fill => "Fill",
            Tool::ColorPicker => "Pick",
            Tool::RectSelect => "Rect select",
            Tool::Select => "Select",
        }
    }

    pub fn selects(&self) -> bool {
        matches!(self, Tool::Select | Tool::RectSelect)
    }
}

/// User-facing drawing configuration, persisted with the app state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: Color32,
    pub brush_size: f32,
    pub eraser_size: f32,
    pub grid_size: i32,
    pub grid_color: Color32,
    pub show_grid: bool,
    pub background: Color32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: Color32::BLACK,
            brush_size: 5.0,
            eraser_size: 20.0,
            grid_size: 20,
            grid_color: Color32::from_gray(220),
            show_grid: false,
            background: Color32::WHITE,
        }
    }
}

impl ToolSettings {
    /// Choosing the grid tool while it is active returns to the pencil
    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = if tool == Tool::GridDraw && self.tool == Tool::GridDraw {
            Tool::Pencil
        } else {
            tool
        };
    }

    pub fn set_grid_size(&mut self, size: i32) {
        self.grid_size = size.max(1);
    }
}
