//! Frame contents.
//!
//! Every frame is the same two commands: clear to the background color,
//! then fill the square. Only the square's position changes, moving
//! `shape_step` pixels down the diagonal per frame starting at
//! `shape_offset`.

use crate::config::DemoConfig;
use crate::render::{DisplayItem, RenderList};

pub struct Scene;

impl Scene {
    /// Top-left corner of the square in frame `index`.
    pub fn shape_origin(config: &DemoConfig, index: u32) -> (f32, f32) {
        let p = config.shape_offset + index as f32 * config.shape_step;
        (p, p)
    }

    /// Builds the render list for frame `index`.
    pub fn frame(config: &DemoConfig, index: u32) -> RenderList {
        let (x, y) = Self::shape_origin(config, index);

        let mut list = RenderList::new();
        list.add_command(DisplayItem::Clear { color: config.background });
        list.add_command(DisplayItem::Rect {
            x,
            y,
            w: config.shape_size,
            h: config.shape_size,
            color: config.shape_color,
        });
        list
    }
}
