pub mod backend;

/// Rendering backends for the demo.
pub mod backends {
    /// Cairo rendering backend
    #[cfg(feature = "backend_cairo")]
    pub mod cairo;
    pub mod null;
}

mod render_list;
pub use render_list::*;

mod viewport;

pub use viewport::Viewport;
