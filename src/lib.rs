//! Repaints a translucent background and a moving translucent square onto a
//! retained cairo target, either blending each frame over the last one
//! (which accumulates alpha) or replacing it.

pub mod compose;
pub mod config;
pub mod dump;
pub mod errors;
pub mod frame_loop;
pub mod render;
pub mod scene;
#[cfg(feature = "gtk4")]
pub mod window;
#[cfg(feature = "x11")]
pub mod x11_hints;

pub use compose::CompositeMode;
pub use config::{ConfigError, DemoConfig};
pub use errors::DemoError;
pub use frame_loop::FrameLoop;
