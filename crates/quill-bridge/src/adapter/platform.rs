//! Platform defaults the engine queries outside any drawing call.

use quill_config::DisplayConfig;

use crate::color::ColourDesired;

/// Display properties the host cannot report through the vtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub dpi: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplayMetrics {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            dpi: config.dpi,
            width: config.width,
            height: config.height,
        }
    }
}

pub fn make_rgba(r: u8, g: u8, b: u8, a: u8) -> ColourDesired {
    ColourDesired::rgba(r, g, b, a)
}

pub fn chrome() -> ColourDesired {
    ColourDesired::rgb(0xE0, 0xE0, 0xE0)
}

pub fn chrome_highlight() -> ColourDesired {
    ColourDesired::rgb(0xFF, 0xFF, 0xFF)
}

pub fn default_font() -> &'static str {
    "SourceCodePro"
}

pub fn default_font_size() -> i32 {
    10
}

/// Double-click interval in milliseconds.
pub fn double_click_time() -> u32 {
    500
}

pub fn mouse_button_bounce() -> bool {
    true
}
