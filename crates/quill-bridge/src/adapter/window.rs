use crate::adapter::platform::DisplayMetrics;
use crate::geometry::{PRectangle, Point};

/// Absolute placement of one editor inside the host window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowGeometry {
    position: PRectangle,
    display: DisplayMetrics,
}

impl WindowGeometry {
    pub fn new(display: DisplayMetrics) -> Self {
        Self {
            position: PRectangle::default(),
            display,
        }
    }

    /// Absolute rectangle of the editor.
    pub fn position(&self) -> PRectangle {
        self.position
    }

    pub fn set_position(&mut self, rc: PRectangle) {
        self.position = rc;
    }

    /// Absolute origin that window-local coordinates are relative to.
    pub fn origin(&self) -> Point {
        self.position.origin()
    }

    /// Window-local drawable area.
    pub fn client_position(&self) -> PRectangle {
        PRectangle::new(0.0, 0.0, self.position.width(), self.position.height())
    }

    pub fn monitor_rect(&self) -> PRectangle {
        PRectangle::new(0.0, 0.0, self.display.width as f32, self.display.height as f32)
    }

    pub fn display(&self) -> DisplayMetrics {
        self.display
    }

    pub fn set_display(&mut self, display: DisplayMetrics) {
        self.display = display;
    }
}
