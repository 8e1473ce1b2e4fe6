//! Demo configuration.
//!
//! [`DemoConfig`] carries the window geometry, the colors and motion of the
//! scene, the frame timing and the compositing mode. The defaults describe
//! a 200x200 window at (200, 200) with a translucent red background and a
//! half transparent green square walking down the diagonal for 11 frames,
//! one per second.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use translucent_demo::config::DemoConfig;
//! let cfg = DemoConfig::default();
//! assert_eq!(cfg.frames, 11);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use translucent_demo::config::DemoConfig;
//! use translucent_demo::compose::CompositeMode;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = DemoConfig::builder()
//!     .size(320, 240)
//!     .frames(20)
//!     .frame_interval_ms(250)
//!     .composite(CompositeMode::Over)
//!     .build()?; // returns Result<DemoConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//!
//! Every field is optional; missing fields keep their default.
//!
//! ```rust
//! use translucent_demo::config::DemoConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = DemoConfig::from_json_str(r#"{ "frames": 3, "composite": "over" }"#)?;
//! assert_eq!(cfg.frames, 3);
//! # Ok(()) }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compose::CompositeMode;
use crate::render::{Color, Viewport};

/// Environment variable that overrides [`DemoConfig::composite`].
pub const MODE_ENV_VAR: &str = "TRANSLUCENT_DEMO_MODE";

/// Largest width or height cairo accepts for an image surface.
pub const MAX_DIMENSION: u32 = 32767;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Requested window origin and size.
    pub geometry: Viewport,
    /// Width of the black border drawn around the window contents.
    pub border_width: u32,
    /// Color the target is cleared to at the start of every frame.
    pub background: Color,
    /// Fill color of the moving square.
    pub shape_color: Color,
    /// Edge length of the square in pixels.
    pub shape_size: f32,
    /// How far the square moves along the diagonal per frame.
    pub shape_step: f32,
    /// Position of the square in frame 0.
    pub shape_offset: f32,
    /// Number of frames rendered before the demo exits.
    pub frames: u32,
    pub frame_interval_ms: u64,
    pub composite: CompositeMode,
    /// When set, PNG snapshots of the target are written here for every frame.
    pub dump_dir: Option<PathBuf>,
    /// Ask the window manager to treat the window like a dock.
    pub dock_hints: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            geometry: Viewport::new(200, 200, 200, 200),
            border_width: 1,
            background: Color::new(0.8, 0.0, 0.0, 0.1),
            shape_color: Color::new(0.0, 1.0, 0.0, 0.5),
            shape_size: 50.0,
            shape_step: 10.0,
            shape_offset: 10.0,
            frames: 11,
            frame_interval_ms: 1000,
            composite: CompositeMode::default(),
            dump_dir: None,
            dock_hints: true,
        }
    }
}

impl DemoConfig {
    pub fn builder() -> DemoConfigBuilder {
        DemoConfigBuilder::default()
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Size of the window contents: the target plus the border on each side.
    ///
    /// Validation keeps both values well inside `i32`.
    pub fn content_size(&self) -> (i32, i32) {
        let border = 2 * self.border_width as i64;
        let clamp = |v: i64| v.min(i32::MAX as i64) as i32;
        (
            clamp(self.geometry.width as i64 + border),
            clamp(self.geometry.height as i64 + border),
        )
    }

    /// Parses a JSON document on top of the defaults and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: DemoConfig = serde_json::from_str(json)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Applies a composite mode override such as the value of [`MODE_ENV_VAR`].
    pub fn with_mode_override(mut self, mode: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(mode) = mode {
            self.composite = mode.parse()?;
        }
        Ok(self)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides using `lookup` to resolve environment variables.
    pub fn with_env_lookup(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mode = lookup(MODE_ENV_VAR);
        self.with_mode_override(mode.as_deref())
    }
}

/// Builder for [`DemoConfig`].
#[derive(Debug, Clone, Default)]
pub struct DemoConfigBuilder {
    inner: DemoConfig,
}

impl DemoConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut DemoConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn origin(self, x: i32, y: i32) -> Self { self.map(|c| c.geometry.translate(x, y)) }
    pub fn size(self, width: u32, height: u32) -> Self { self.map(|c| c.geometry.resize(width, height)) }
    pub fn border_width(self, px: u32) -> Self { self.map(|c| c.border_width = px) }
    pub fn background(self, color: Color) -> Self { self.map(|c| c.background = color) }
    pub fn shape_color(self, color: Color) -> Self { self.map(|c| c.shape_color = color) }
    pub fn shape_size(self, px: f32) -> Self { self.map(|c| c.shape_size = px) }
    pub fn shape_step(self, px: f32) -> Self { self.map(|c| c.shape_step = px) }
    pub fn shape_offset(self, px: f32) -> Self { self.map(|c| c.shape_offset = px) }
    pub fn frames(self, n: u32) -> Self { self.map(|c| c.frames = n) }
    pub fn frame_interval_ms(self, ms: u64) -> Self { self.map(|c| c.frame_interval_ms = ms) }
    pub fn composite(self, mode: CompositeMode) -> Self { self.map(|c| c.composite = mode) }
    pub fn dump_dir<P: Into<PathBuf>>(self, dir: P) -> Self { self.map(|c| c.dump_dir = Some(dir.into())) }
    pub fn dock_hints(self, on: bool) -> Self { self.map(|c| c.dock_hints = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut DemoConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<DemoConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("window size {width}x{height} must be non-zero")]
    ZeroSize { width: u32, height: u32 },

    #[error("{field} {value} exceeds the maximum of {max}")]
    TooLarge { field: &'static str, value: u32, max: u32 },

    #[error("frames must be at least 1")]
    ZeroFrames,

    #[error("frame_interval_ms must be at least 1")]
    ZeroInterval,

    #[error("shape_size {0} must be a positive number")]
    InvalidShapeSize(f32),

    #[error("{field} channel value {value} is out of range (expected 0.0..=1.0)")]
    InvalidColor { field: &'static str, value: f32 },

    #[error("unknown composite mode '{0}' (expected 'over' or 'source')")]
    UnknownMode(String),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn validate(c: &DemoConfig) -> Result<(), ConfigError> {
    if c.geometry.width == 0 || c.geometry.height == 0 {
        return Err(ConfigError::ZeroSize {
            width: c.geometry.width,
            height: c.geometry.height,
        });
    }
    for (field, value) in [
        ("width", c.geometry.width),
        ("height", c.geometry.height),
        ("border_width", c.border_width),
    ] {
        if value > MAX_DIMENSION {
            return Err(ConfigError::TooLarge { field, value, max: MAX_DIMENSION });
        }
    }
    if c.frames == 0 {
        return Err(ConfigError::ZeroFrames);
    }
    if c.frame_interval_ms == 0 {
        return Err(ConfigError::ZeroInterval);
    }
    if !(c.shape_size.is_finite() && c.shape_size > 0.0) {
        return Err(ConfigError::InvalidShapeSize(c.shape_size));
    }
    for (field, color) in [("background", c.background), ("shape_color", c.shape_color)] {
        if let Some(value) = color
            .channels()
            .into_iter()
            .find(|v| !(v.is_finite() && (0.0..=1.0).contains(v)))
        {
            return Err(ConfigError::InvalidColor { field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DemoConfig::builder().build().unwrap();
        assert_eq!(cfg, DemoConfig::default());
        assert_eq!(cfg.geometry, Viewport::new(200, 200, 200, 200));
        assert_eq!(cfg.frame_interval(), Duration::from_secs(1));
        assert_eq!(cfg.composite, CompositeMode::Source);
    }

    #[test]
    fn builder_rejects_zero_size() {
        let err = DemoConfig::builder().size(0, 10).build().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSize { width: 0, height: 10 }));
    }

    #[test]
    fn builder_rejects_oversized_geometry() {
        let err = DemoConfig::builder().size(MAX_DIMENSION + 1, 200).build().unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "width", value: 32768, max: 32767 }));

        let err = DemoConfig::builder().size(200, 3_000_000_000).build().unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "height", .. }));

        let err = DemoConfig::builder()
            .size(3_000_000_000, 200)
            .border_width(2_000_000_000)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "width", .. }));

        let err = DemoConfig::builder().border_width(2_000_000_000).build().unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "border_width", .. }));
    }

    #[test]
    fn largest_valid_geometry_fits_the_window() {
        let cfg = DemoConfig::builder()
            .size(MAX_DIMENSION, MAX_DIMENSION)
            .border_width(MAX_DIMENSION)
            .build()
            .unwrap();
        assert_eq!(cfg.content_size(), (3 * 32767, 3 * 32767));
        assert_eq!(DemoConfig::default().content_size(), (202, 202));
    }

    #[test]
    fn builder_rejects_zero_frames_and_interval() {
        assert!(matches!(DemoConfig::builder().frames(0).build(), Err(ConfigError::ZeroFrames)));
        assert!(matches!(
            DemoConfig::builder().frame_interval_ms(0).build(),
            Err(ConfigError::ZeroInterval)
        ));
    }

    #[test]
    fn builder_rejects_bad_colors() {
        let err = DemoConfig::builder()
            .shape_color(Color::new(0.0, 1.0, 0.0, 1.5))
            .build()
            .unwrap_err();
        match err {
            ConfigError::InvalidColor { field, value } => {
                assert_eq!(field, "shape_color");
                assert_eq!(value, 1.5);
            }
            other => panic!("expected InvalidColor, got {:?}", other),
        }

        let err = DemoConfig::builder()
            .background(Color::new(f32::NAN, 0.0, 0.0, 0.1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { field: "background", .. }));
    }

    #[test]
    fn builder_rejects_bad_shape_size() {
        assert!(matches!(
            DemoConfig::builder().shape_size(-4.0).build(),
            Err(ConfigError::InvalidShapeSize(_))
        ));
    }

    #[test]
    fn json_overlays_defaults() {
        let cfg = DemoConfig::from_json_str(
            r#"{
                "geometry": { "x": 0, "y": 0, "width": 64, "height": 48 },
                "composite": "over",
                "dump_dir": "/tmp/frames"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.geometry, Viewport::new(0, 0, 64, 48));
        assert_eq!(cfg.composite, CompositeMode::Over);
        assert_eq!(cfg.dump_dir, Some(PathBuf::from("/tmp/frames")));
        assert_eq!(cfg.frames, 11);
        assert_eq!(cfg.background, DemoConfig::default().background);
    }

    #[test]
    fn json_is_validated() {
        assert!(matches!(DemoConfig::from_json_str(r#"{ "frames": 0 }"#), Err(ConfigError::ZeroFrames)));
        assert!(matches!(DemoConfig::from_json_str(r#"{ "framez": 3 }"#), Err(ConfigError::Json(_))));
        assert!(matches!(
            DemoConfig::from_json_str(r#"{ "composite": "xor" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        match DemoConfig::load(&path) {
            Err(ConfigError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        std::fs::write(&path, r#"{ "frames": 4, "dock_hints": false }"#).unwrap();
        let cfg = DemoConfig::load(&path).unwrap();
        assert_eq!(cfg.frames, 4);
        assert!(!cfg.dock_hints);
    }

    #[test]
    fn env_lookup_selects_the_composite_mode() {
        let cfg = DemoConfig::default()
            .with_env_lookup(|key| (key == MODE_ENV_VAR).then(|| "over".to_string()))
            .unwrap();
        assert_eq!(cfg.composite, CompositeMode::Over);

        let cfg = DemoConfig::builder()
            .composite(CompositeMode::Over)
            .build()
            .unwrap()
            .with_env_lookup(|_| None)
            .unwrap();
        assert_eq!(cfg.composite, CompositeMode::Over);

        assert!(matches!(
            DemoConfig::default().with_env_lookup(|_| Some("multiply".to_string())),
            Err(ConfigError::UnknownMode(_))
        ));
    }

    #[test]
    fn env_overrides_read_the_process_environment() {
        // Only this test touches the variable.
        std::env::set_var(MODE_ENV_VAR, "over");
        let with_var = DemoConfig::default().with_env_overrides();
        std::env::remove_var(MODE_ENV_VAR);
        let without_var = DemoConfig::default().with_env_overrides();

        assert_eq!(with_var.unwrap().composite, CompositeMode::Over);
        assert_eq!(without_var.unwrap().composite, CompositeMode::Source);
    }

    #[test]
    fn mode_override_replaces_composite() {
        let cfg = DemoConfig::default().with_mode_override(Some("over")).unwrap();
        assert_eq!(cfg.composite, CompositeMode::Over);

        let cfg = DemoConfig::default().with_mode_override(None).unwrap();
        assert_eq!(cfg.composite, CompositeMode::Source);

        assert!(matches!(
            DemoConfig::default().with_mode_override(Some("add")),
            Err(ConfigError::UnknownMode(_))
        ));
    }
}
