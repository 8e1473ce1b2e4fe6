//! Compositing modes and their pixel math.
//!
//! Every frame is drawn into an offscreen group and then painted onto a
//! retained target. How that paint combines with what is already on the
//! target is the whole point of this demo:
//!
//! - [`CompositeMode::Over`] blends the new frame on top of the old one.
//!   Translucent pixels never get erased, so the background becomes more
//!   opaque every frame and old shapes linger.
//! - [`CompositeMode::Source`] replaces the target with the new frame, so
//!   the target always equals the most recent frame.
//!
//! [`Premul`] implements both operators on premultiplied pixels, the same
//! representation cairo uses for ARGB32 surfaces. That makes the expected
//! outcome of a frame sequence computable without a display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::render::Color;

/// How a rendered frame is combined with the retained target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMode {
    /// Blend the frame over the previous target contents (accumulates alpha).
    Over,
    /// Replace the target contents with the frame.
    #[default]
    Source,
}

impl CompositeMode {
    /// Combines one source pixel with one destination pixel.
    pub fn apply(self, src: Premul, dst: Premul) -> Premul {
        match self {
            CompositeMode::Over => src.over(dst),
            CompositeMode::Source => src.source(dst),
        }
    }
}

impl fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeMode::Over => f.write_str("over"),
            CompositeMode::Source => f.write_str("source"),
        }
    }
}

impl FromStr for CompositeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "over" => Ok(CompositeMode::Over),
            "source" => Ok(CompositeMode::Source),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// A premultiplied RGBA pixel with `f32` channels in `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Premul {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Premul {
    pub const TRANSPARENT: Premul = Premul { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub fn from_color(c: Color) -> Premul {
        Premul {
            r: c.r * c.a,
            g: c.g * c.a,
            b: c.b * c.a,
            a: c.a,
        }
    }

    /// Builds a pixel from premultiplied `u8` channels.
    pub fn from_u8(px: [u8; 4]) -> Premul {
        Premul {
            r: px[0] as f32 / 255.0,
            g: px[1] as f32 / 255.0,
            b: px[2] as f32 / 255.0,
            a: px[3] as f32 / 255.0,
        }
    }

    /// `src + dst * (1 - src.a)`
    pub fn over(self, dst: Premul) -> Premul {
        let k = 1.0 - self.a;
        Premul {
            r: self.r + dst.r * k,
            g: self.g + dst.g * k,
            b: self.b + dst.b * k,
            a: self.a + dst.a * k,
        }
    }

    pub fn source(self, _dst: Premul) -> Premul {
        self
    }

    /// Premultiplied channels rounded to `u8`, `[r, g, b, a]`.
    pub fn to_u8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
