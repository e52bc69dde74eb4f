//! Rectangle and point types on both sides of the bridge.
//!
//! The engine speaks in edge-based, window-local [`PRectangle`]s; the host
//! expects origin/size [`HostRect`]s in absolute coordinates.

/// Engine-side point in window-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point from integer host coordinates.
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(x as f32, y as f32)
    }
}

/// Engine-side rectangle described by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PRectangle {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PRectangle {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle from an origin and a size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Same rectangle shifted by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self::new(
            self.left + offset.x,
            self.top + offset.y,
            self.right + offset.x,
            self.bottom + offset.y,
        )
    }

    /// Overlap of two rectangles; empty (zero sized) when disjoint.
    pub fn intersect(&self, other: &PRectangle) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right).max(left);
        let bottom = self.bottom.min(other.bottom).max(top);
        Self::new(left, top, right, bottom)
    }
}

/// Host-side rectangle, passed by pointer across the C boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HostRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<PRectangle> for HostRect {
    fn from(rc: PRectangle) -> Self {
        Self::new(rc.left, rc.top, rc.width(), rc.height())
    }
}
