//! Window configuration, loadable from JSON

use crate::color::{rgb, Color};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_FPS: f64 = 30.0;

/// Native window decorations, applied at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowStyle {
    pub resizable: bool,
    /// Title bar
    pub title: bool,
    pub border: bool,
}

impl WindowStyle {
    /// SDL decorates with title bar and border together, so dropping either drops both
    pub fn is_decorated(&self) -> bool {
        self.title && self.border
    }
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self {
            resizable: true,
            title: true,
            border: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub x: i32,
    pub y: i32,
    /// Client-area size requested at creation
    pub width: u32,
    pub height: u32,
    /// Fill color for new buffers and the value of out-of-range reads
    pub base_color: Color,
    pub style: WindowStyle,
    /// Attach the log sink to the standard streams when the window is created
    pub bind_console: bool,
    pub target_fps: f64,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_console(mut self, bind: bool) -> Self {
        self.bind_console = bind;
        self
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::Config(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| Error::Config(e.to_string()))
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "softpane".to_string(),
            x: 50,
            y: 50,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            base_color: rgb(255, 255, 255),
            style: WindowStyle::default(),
            bind_console: true,
            target_fps: DEFAULT_FPS,
        }
    }
}
