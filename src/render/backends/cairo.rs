use std::any::Any;

use anyhow::{anyhow, Result};

use crate::compose::CompositeMode;
use crate::render::backend::{ErasedSurface, PixelFormat, RenderBackend, RgbaImage, SurfaceSize};
use crate::render::{Color, DisplayItem, RenderList};

/// Cairo backend for rendering using cairo graphics library.
#[derive(Debug, Default)]
pub struct CairoBackend;

impl CairoBackend {
    pub fn new() -> Self {
        Self {}
    }
}

fn operator_for(mode: CompositeMode) -> cairo::Operator {
    match mode {
        CompositeMode::Over => cairo::Operator::Over,
        CompositeMode::Source => cairo::Operator::Source,
    }
}

fn set_source(cr: &cairo::Context, color: &Color) {
    cr.set_source_rgba(color.r as f64, color.g as f64, color.b as f64, color.a as f64);
}

impl RenderBackend for CairoBackend {
    fn name(&self) -> &str {
        "CairoBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface>> {
        Ok(Box::new(CairoSurface::new(size)?))
    }

    /// Draws the items into a group and paints the popped group onto the
    /// retained surface with the operator matching `mode`.
    fn render(
        &mut self,
        list: &RenderList,
        mode: CompositeMode,
        surface: &mut dyn ErasedSurface,
    ) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CairoSurface>()
            .ok_or_else(|| anyhow!("CairoBackend used with non-Cairo surface"))?;

        {
            let cr = s.ctx()?;

            cr.push_group();
            for item in list.items.iter() {
                match item {
                    DisplayItem::Clear { color } => {
                        cr.set_operator(cairo::Operator::Source);
                        set_source(&cr, color);
                        cr.paint()?;
                        cr.set_operator(cairo::Operator::Over);
                    }
                    DisplayItem::Rect { x, y, w, h, color } => {
                        set_source(&cr, color);
                        cr.rectangle(*x as f64, *y as f64, *w as f64, *h as f64);
                        cr.fill()?;
                    }
                }
            }
            cr.pop_group_to_source()?;

            // Over keeps whatever earlier frames left behind; Source replaces it.
            cr.set_operator(operator_for(mode));
            cr.paint()?;
        }

        s.flush();
        s.frame_id = s.frame_id.wrapping_add(1);
        Ok(())
    }

    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CairoSurface>()
            .ok_or_else(|| anyhow!("CairoBackend used with non-Cairo surface"))?;

        s.pixels()
    }
}

/// Retained cairo image surface the frames are composited onto.
pub struct CairoSurface {
    surface: cairo::ImageSurface,
    size: SurfaceSize,
    frame_id: u64,
}

impl CairoSurface {
    pub fn new(size: SurfaceSize) -> Result<Self> {
        let surface = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            size.width as i32,
            size.height as i32,
        )?;

        Ok(Self {
            surface,
            size,
            frame_id: 0,
        })
    }

    #[inline]
    pub fn ctx(&self) -> Result<cairo::Context> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    /// The underlying image surface, for presenting it on screen.
    #[inline]
    pub fn image(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    #[inline]
    pub fn stride(&self) -> i32 {
        self.surface.stride()
    }

    #[inline]
    pub fn flush(&self) {
        self.surface.flush();
    }

    /// Copies the pixels out of the surface.
    pub fn pixels(&self) -> Result<RgbaImage> {
        self.flush();

        let mut pixels = Vec::new();
        self.surface
            .with_data(|data| pixels.extend_from_slice(data))
            .map_err(|e| anyhow!("cannot read cairo surface pixels: {e}"))?;

        Ok(RgbaImage::from_raw(
            pixels,
            self.size.width,
            self.size.height,
            self.stride() as u32,
            PixelFormat::PreMulArgb32,
        ))
    }
}

impl ErasedSurface for CairoSurface {
    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
    fn size(&self) -> SurfaceSize { self.size }
    fn frame_id(&self) -> u64 { self.frame_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Premul;
    use crate::config::DemoConfig;
    use crate::render::backends::null::NullSurface;
    use crate::scene::Scene;

    const TOLERANCE: i32 = 2;

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (*a as i32 - *e as i32).abs() <= TOLERANCE,
                "pixel {:?} differs from expected {:?}",
                actual,
                expected
            );
        }
    }

    fn run_frames(cfg: &DemoConfig, frames: u32) -> (CairoBackend, Box<dyn ErasedSurface>) {
        let mut backend = CairoBackend::new();
        let mut surface = backend.create_surface(cfg.geometry.as_size()).unwrap();
        for i in 0..frames {
            let list = Scene::frame(cfg, i);
            backend.render(&list, cfg.composite, &mut *surface).unwrap();
        }
        (backend, surface)
    }

    #[test]
    fn new_surface_is_transparent() {
        let mut backend = CairoBackend::new();
        let mut surface = backend.create_surface(SurfaceSize { width: 8, height: 4 }).unwrap();
        let img = backend.snapshot(&mut *surface).unwrap();
        assert_eq!((img.width, img.height), (8, 4));
        assert_eq!(img.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(surface.frame_id(), 0);
    }

    #[test]
    fn source_mode_keeps_background_alpha_constant() {
        let cfg = DemoConfig::builder().composite(CompositeMode::Source).build().unwrap();
        let expected = Premul::from_color(cfg.background).to_u8();

        for frames in [1, 2, 6, 11] {
            let (mut backend, mut surface) = run_frames(&cfg, frames);
            let img = backend.snapshot(&mut *surface).unwrap();
            assert_close(img.pixel(190, 5).unwrap(), expected);
            assert_eq!(surface.frame_id(), frames as u64);
        }
    }

    #[test]
    fn source_mode_erases_the_previous_shape() {
        let cfg = DemoConfig::builder().composite(CompositeMode::Source).build().unwrap();
        let (mut backend, mut surface) = run_frames(&cfg, 2);
        let img = backend.snapshot(&mut *surface).unwrap();

        // (12, 12) was covered by the square in frame 0 only.
        assert_close(img.pixel(12, 12).unwrap(), Premul::from_color(cfg.background).to_u8());

        // (40, 40) is covered by the current square.
        let shape = Premul::from_color(cfg.shape_color).over(Premul::from_color(cfg.background));
        assert_close(img.pixel(40, 40).unwrap(), shape.to_u8());
    }

    #[test]
    fn over_mode_accumulates_background_alpha() {
        let cfg = DemoConfig::builder().composite(CompositeMode::Over).build().unwrap();
        let mut backend = CairoBackend::new();
        let mut surface = backend.create_surface(cfg.geometry.as_size()).unwrap();

        let bg = Premul::from_color(cfg.background);
        let mut model = Premul::TRANSPARENT;
        let mut last_alpha = 0;
        for i in 0..6 {
            backend.render(&Scene::frame(&cfg, i), cfg.composite, &mut *surface).unwrap();
            model = bg.over(model);

            let px = backend.snapshot(&mut *surface).unwrap().pixel(190, 5).unwrap();
            assert!(px[3] > last_alpha, "frame {i}: alpha {} did not grow past {}", px[3], last_alpha);
            last_alpha = px[3];
            // Rounding to 8 bits each frame drifts slowly from the float model.
            let measured = Premul::from_u8(px);
            assert!((measured.a - model.a).abs() <= 3.0 / 255.0, "frame {i}: {:?} vs {:?}", measured, model);
            assert!((measured.r - model.r).abs() <= 3.0 / 255.0, "frame {i}: {:?} vs {:?}", measured, model);
        }
    }

    #[test]
    fn over_mode_leaves_old_shapes_behind() {
        let cfg = DemoConfig::builder().composite(CompositeMode::Over).build().unwrap();
        let (mut backend, mut surface) = run_frames(&cfg, 2);
        let img = backend.snapshot(&mut *surface).unwrap();

        let [_, g, _, _] = img.pixel(12, 12).unwrap();
        assert!(g > 100, "frame 0 square should still be visible, green = {g}");
    }

    #[test]
    fn render_rejects_foreign_surface() {
        let mut backend = CairoBackend::new();
        let mut surface = NullSurface::new(SurfaceSize { width: 4, height: 4 });
        let err = backend
            .render(&RenderList::new(), CompositeMode::Source, &mut surface)
            .unwrap_err();
        assert!(err.to_string().contains("non-Cairo surface"));
    }
}
