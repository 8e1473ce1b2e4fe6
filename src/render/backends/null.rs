use crate::compose::CompositeMode;
use crate::render::backend::{ErasedSurface, PixelFormat, RenderBackend, RgbaImage, SurfaceSize};
use crate::render::RenderList;
use anyhow::{anyhow, Result};
use std::any::Any;

/// Null backend renderer that does not perform any rendering.
///
/// It remembers what it was asked to draw, which makes it useful for
/// exercising the frame loop without cairo or a display.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    /// Creates a new instance of the null backend.
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for NullBackend {
    fn name(&self) -> &str {
        "NullBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface>> {
        Ok(Box::new(NullSurface::new(size)))
    }

    fn render(&mut self, list: &RenderList, mode: CompositeMode, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        s.last_list = Some(list.clone());
        s.last_mode = Some(mode);
        s.frame_id = s.frame_id.wrapping_add(1);
        Ok(())
    }

    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        let pixels = vec![0u8; (s.size.width * s.size.height * 4) as usize];
        Ok(RgbaImage::from_raw(
            pixels,
            s.size.width,
            s.size.height,
            s.size.width * 4,
            PixelFormat::Rgba8,
        ))
    }
}

pub struct NullSurface {
    /// Size of the surface in pixels.
    pub size: SurfaceSize,
    frame_id: u64,
    last_list: Option<RenderList>,
    last_mode: Option<CompositeMode>,
}

impl NullSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size, frame_id: 0, last_list: None, last_mode: None }
    }

    /// The render list of the most recent frame, if any.
    pub fn last_list(&self) -> Option<&RenderList> {
        self.last_list.as_ref()
    }

    pub fn last_mode(&self) -> Option<CompositeMode> {
        self.last_mode
    }
}

impl ErasedSurface for NullSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }
    fn frame_id(&self) -> u64 {
        self.frame_id
    }
}
