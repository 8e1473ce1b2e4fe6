//! Render list and display items.
//!
//! A frame of the demo is described as a short [`RenderList`] of
//! [`DisplayItem`] commands: a clear of the whole target followed by the
//! shapes drawn on top of it. The list is built by the
//! [`Scene`](crate::scene::Scene) and consumed by a render backend.
//!
//! # Example
//!
//! ```rust
//! use translucent_demo::render::{RenderList, DisplayItem, Color};
//!
//! let mut list = RenderList::new();
//!
//! // Translucent red background
//! list.add_command(DisplayItem::Clear { color: Color::new(0.8, 0.0, 0.0, 0.1) });
//!
//! // Half transparent green square
//! list.add_command(DisplayItem::Rect {
//!     x: 10.0,
//!     y: 10.0,
//!     w: 50.0,
//!     h: 50.0,
//!     color: Color::new(0.0, 1.0, 0.0, 0.5),
//! });
//! assert_eq!(list.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// RGBA color used for drawing commands.
///
/// Channels are straight (not premultiplied) `f32` values in the range
/// `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel (opacity)
    pub a: f32,
}

impl Color {
    /// Creates a new color from `f32` channel values in the range `0.0 ..= 1.0`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Returns the channels as rounded `u8` values, `[r, g, b, a]`.
    pub fn to_u8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Channels in `r, g, b, a` order, handy for validation.
    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A single drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    /// Replace the whole target with the given color.
    Clear {
        /// The color to clear the target with.
        color: Color,
    },

    /// Fill a rectangle at `(x, y)` with width `w` and height `h`, blended
    /// over what is already there.
    Rect {
        /// The x-coordinate of the rectangle's top-left corner.
        x: f32,
        /// The y-coordinate of the rectangle's top-left corner.
        y: f32,
        /// The width of the rectangle.
        w: f32,
        /// The height of the rectangle.
        h: f32,
        /// The color to fill the rectangle with.
        color: Color,
    },
}

/// A list of display items making up one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderList {
    /// Sequence of drawing commands to execute.
    pub items: Vec<DisplayItem>,
}

impl RenderList {
    /// Creates a new, empty render list.
    pub fn new() -> Self {
        RenderList { items: Vec::new() }
    }

    /// Adds a new display item (drawing command) to the list.
    pub fn add_command(&mut self, command: DisplayItem) {
        self.items.push(command);
    }

    /// Clears all display items from the list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
