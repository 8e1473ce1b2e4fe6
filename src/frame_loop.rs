//! The clear, draw, present loop.
//!
//! [`FrameLoop`] owns the backend and the retained target. Each call to
//! [`FrameLoop::step`] renders the next frame of the [`Scene`] onto the
//! target; the host presents the target and decides when to call `step`
//! again.
//!
//! Before the first frame the target is painted once with just the
//! background, the way the window gets its first draw right after it is
//! mapped. With [`CompositeMode::Over`](crate::compose::CompositeMode::Over)
//! that first paint is one more layer of alpha under frame 0.

use anyhow::Result;

use crate::config::DemoConfig;
use crate::dump::{FrameDumper, FramePhase};
use crate::render::backend::{ErasedSurface, RenderBackend};
use crate::render::{DisplayItem, RenderList};
use crate::scene::Scene;

pub struct FrameLoop {
    config: DemoConfig,
    backend: Box<dyn RenderBackend>,
    surface: Box<dyn ErasedSurface>,
    dumper: Option<FrameDumper>,
    next_frame: u32,
}

impl FrameLoop {
    pub fn new(config: DemoConfig, mut backend: Box<dyn RenderBackend>) -> Result<Self> {
        let mut surface = backend.create_surface(config.geometry.as_size())?;

        let mut first_draw = RenderList::new();
        first_draw.add_command(DisplayItem::Clear { color: config.background });
        backend.render(&first_draw, config.composite, &mut *surface)?;

        let dumper = config.dump_dir.as_ref().map(FrameDumper::new).transpose()?;

        log::info!(
            "{} ready: {}x{} target, {} frames every {:?}, composite mode '{}'",
            backend.name(),
            config.geometry.width,
            config.geometry.height,
            config.frames,
            config.frame_interval(),
            config.composite,
        );

        Ok(Self {
            config,
            backend,
            surface,
            dumper,
            next_frame: 0,
        })
    }

    /// Renders the next frame and returns its index, or `None` once every
    /// frame has been rendered.
    pub fn step(&mut self) -> Result<Option<u32>> {
        if self.is_finished() {
            return Ok(None);
        }
        let index = self.next_frame;
        let list = Scene::frame(&self.config, index);

        if let Some(dumper) = &self.dumper {
            let before = self.backend.snapshot(&mut *self.surface)?;
            dumper.write(index, FramePhase::Before, &before)?;
        }

        self.backend.render(&list, self.config.composite, &mut *self.surface)?;

        if let Some(dumper) = &self.dumper {
            let after = self.backend.snapshot(&mut *self.surface)?;
            dumper.write(index, FramePhase::After, &after)?;
        }

        let (x, y) = Scene::shape_origin(&self.config, index);
        if !self.config.geometry.contains_rect(x, y, self.config.shape_size, self.config.shape_size) {
            log::warn!("frame {index}: square at ({x}, {y}) is clipped by the window");
        }
        log::debug!("frame {index} rendered ({} items)", list.len());

        self.next_frame += 1;
        Ok(Some(index))
    }

    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.config.frames
    }

    pub fn frames_rendered(&self) -> u32 {
        self.next_frame
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// The retained target, for presenting.
    pub fn surface(&self) -> &dyn ErasedSurface {
        &*self.surface
    }
}
