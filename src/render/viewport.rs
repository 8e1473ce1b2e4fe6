//! Window geometry.
//!
//! A [`Viewport`] is the on-screen rectangle the demo window asks for: its
//! top-left corner `(x, y)` in root window coordinates and its `width` and
//! `height` in pixels. The retained render target is created with the
//! viewport's size.
//!
//! ```
//! use translucent_demo::render::Viewport;
//!
//! let mut vp = Viewport::new(200, 200, 200, 200);
//! vp.resize(320, 240);
//! vp.translate(10, 20);
//! assert_eq!(vp.width, 320);
//! assert_eq!(vp.x, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::render::backend::SurfaceSize;

/// Position and size of the demo window.
#[derive(Clone, Eq, PartialEq, Copy, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal offset in pixels from the root window origin.
    pub x: i32,

    /// Vertical offset in pixels from the root window origin.
    pub y: i32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Viewport {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Viewport {
    /// Creates a new [`Viewport`] with the given position and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Resizes the viewport to the given width and height.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Moves the viewport's origin to `(x, y)` in pixels.
    pub fn translate(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Returns true when the rectangle lies completely inside the viewport,
    /// using viewport-local coordinates.
    pub fn contains_rect(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x + w <= self.width as f32 && y + h <= self.height as f32
    }

    /// Converts this viewport to a [`SurfaceSize`].
    pub fn as_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width,
            height: self.height,
        }
    }
}
