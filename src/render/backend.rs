use std::any::Any;

use crate::compose::{CompositeMode, Premul};
use crate::render::RenderList;

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Premultiplied ARGB in a native-endian `u32` per pixel (cairo's ARGB32).
    PreMulArgb32,
    /// Straight RGBA, one byte per channel.
    Rgba8,
}

/// Copy of a surface's pixels.
#[derive(Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
}

impl RgbaImage {
    pub fn from_raw(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Self {
        assert!(
            pixels.len() >= (height as usize) * (stride as usize),
            "pixel buffer too small for image dimensions"
        );

        Self {
            pixels,
            width,
            height,
            stride,
            format,
        }
    }

    /// Returns the premultiplied `[r, g, b, a]` bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y * self.stride + x * 4) as usize;
        let raw: [u8; 4] = self.pixels.get(off..off + 4)?.try_into().ok()?;

        Some(match self.format {
            PixelFormat::PreMulArgb32 => {
                let v = u32::from_ne_bytes(raw);
                [(v >> 16) as u8, (v >> 8) as u8, v as u8, (v >> 24) as u8]
            }
            PixelFormat::Rgba8 => Premul::from_color(crate::render::Color::from_u8(
                raw[0], raw[1], raw[2], raw[3],
            ))
            .to_u8(),
        })
    }

    /// Tightly packed straight-alpha RGBA bytes, as PNG encoders expect them.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                match self.format {
                    PixelFormat::Rgba8 => {
                        let off = (y * self.stride + x * 4) as usize;
                        out.extend_from_slice(&self.pixels[off..off + 4]);
                    }
                    PixelFormat::PreMulArgb32 => {
                        let [r, g, b, a] = self.pixel(x, y).unwrap_or([0; 4]);
                        out.extend_from_slice(&unpremultiply(r, g, b, a));
                    }
                }
            }
        }
        out
    }
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
    [un(r), un(g), un(b), a]
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// Type-erased surface so the frame loop can hold it without generics.
pub trait ErasedSurface: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn size(&self) -> SurfaceSize;
    /// Number of frames rendered onto this surface so far.
    fn frame_id(&self) -> u64;
}

/// Core backend interface. The target surface is retained: its pixels
/// persist from one `render` call to the next.
pub trait RenderBackend {
    fn name(&self) -> &str;

    /// Create a new, fully transparent surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> anyhow::Result<Box<dyn ErasedSurface>>;

    /// Draw the render list into an offscreen group and composite the group
    /// onto the surface using `mode`.
    fn render(
        &mut self,
        list: &RenderList,
        mode: CompositeMode,
        surface: &mut dyn ErasedSurface,
    ) -> anyhow::Result<()>;

    /// Copy the current pixels of the surface.
    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> anyhow::Result<RgbaImage>;
}
