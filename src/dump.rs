//! PNG snapshots of the render target.
//!
//! When a dump directory is configured, the frame loop writes the target
//! once before and once after each frame, which makes it easy to see
//! whether the previous frame's pixels survived the repaint.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::errors::DemoError;
use crate::render::backend::RgbaImage;

/// Which side of the frame a snapshot was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Before,
    After,
}

impl FramePhase {
    fn as_str(self) -> &'static str {
        match self {
            FramePhase::Before => "before",
            FramePhase::After => "after",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameDumper {
    dir: PathBuf,
}

impl FrameDumper {
    /// Creates the dump directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DemoError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::info!("dumping frames to {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for the given frame and phase, e.g. `frame_03_after.png`.
    pub fn path_for(&self, index: u32, phase: FramePhase) -> PathBuf {
        self.dir.join(format!("frame_{:02}_{}.png", index, phase.as_str()))
    }

    /// Writes `image` as a straight-alpha RGBA PNG and returns its path.
    pub fn write(&self, index: u32, phase: FramePhase, image: &RgbaImage) -> Result<PathBuf, DemoError> {
        let path = self.path_for(index, phase);

        let file = File::create(&path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let data = image.to_straight_rgba();
        encoder
            .write_header()
            .and_then(|mut writer| {
                writer.write_image_data(&data)?;
                writer.finish()
            })
            .map_err(|source| DemoError::Dump { path: path.clone(), source })?;

        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}
