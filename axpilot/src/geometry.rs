//! Coordinate model for the two spaces an accessible element lives in.
//!
//! An element has screen-space extents (absolute display pixels) and
//! window-space extents (relative to the owning window's origin). The two
//! describe the same element at the same instant but are never
//! interchangeable, so they get distinct types: pointer targets are built
//! from a [`ScreenRect`], size comparisons run against a [`WindowRect`].

use serde::{Deserialize, Serialize};

/// A rectangle in absolute display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A rectangle relative to the owning window's origin.
///
/// Window-space size is invariant to monitor placement, which is why
/// `query-screen-size` compares against it rather than screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// An absolute pointer target in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint {
            x: self.x,
            y: self.y,
        }
    }

    /// Translate a window-relative offset into an absolute screen point.
    pub fn point_at(&self, dx: i32, dy: i32) -> ScreenPoint {
        ScreenPoint {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl WindowRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exact size comparison; a one-pixel difference is a mismatch.
    pub fn size_is(&self, width: i32, height: i32) -> bool {
        self.width == width && self.height == height
    }
}
