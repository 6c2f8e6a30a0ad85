//! Engine configuration.
//!
//! Everything is optional in the TOML file; missing keys fall back to the
//! stock 1200x800 / 60 degree / 300 ray setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Binds a wall material id to an image file on disk.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TextureBinding {
    pub material: u8,
    pub path: PathBuf,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StartPose {
    pub x: f32,
    pub y: f32,
    pub heading_degrees: f32,
}

impl Default for StartPose {
    fn default() -> Self {
        // Middle of the open corridor on the built-in map
        Self {
            x: 240.0,
            y: 112.0,
            heading_degrees: 0.0,
        }
    }
}

/// Optional darkening. The defaults disable both effects.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Shading {
    /// Brightness multiplier for hits on horizontal faces (1.0 = unchanged).
    pub horizontal_face: f32,
    /// Distance at which a column fades to black; 0 turns fog off.
    pub fog_distance: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            horizontal_face: 1.0,
            fog_distance: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Colors {
    pub ceiling: [u8; 3],
    pub floor: [u8; 3],
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            ceiling: [30, 30, 70],
            floor: [40, 40, 40],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tile_size: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub fov_degrees: f32,
    /// Screen pixels covered by one ray.
    pub ray_stride: u32,
    pub move_speed: f32,
    pub rotation_speed_degrees: f32,
    pub tick_hz: u32,
    /// Visual calibration between tile size and wall height on screen.
    pub projection_scale: f32,
    pub default_material: u8,
    pub map: Option<PathBuf>,
    #[serde(rename = "texture")]
    pub textures: Vec<TextureBinding>,
    pub start: StartPose,
    pub shading: Shading,
    pub colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            window_width: 1200,
            window_height: 800,
            fov_degrees: 60.0,
            ray_stride: 4,
            move_speed: 2.5,
            rotation_speed_degrees: 2.0,
            tick_hz: 60,
            projection_scale: 415.0,
            default_material: 1,
            map: None,
            textures: Vec::new(),
            start: StartPose::default(),
            shading: Shading::default(),
            colors: Colors::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if !(self.tile_size > 0.0) {
            return invalid(format!("tile_size must be positive, got {}", self.tile_size));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return invalid("window dimensions must be non-zero".into());
        }
        if self.ray_stride == 0 || self.ray_stride > self.window_width {
            return invalid(format!(
                "ray_stride must be in 1..={}, got {}",
                self.window_width, self.ray_stride
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid(format!("fov_degrees must be in (0, 180), got {}", self.fov_degrees));
        }
        if !(self.move_speed > 0.0) || !(self.rotation_speed_degrees > 0.0) {
            return invalid("move and rotation speeds must be positive".into());
        }
        if !(self.projection_scale > 0.0) {
            return invalid("projection_scale must be positive".into());
        }
        if self.tick_hz == 0 {
            return invalid("tick_hz must be non-zero".into());
        }
        if self.default_material == 0 {
            return invalid("default_material must name a wall material (1..)".into());
        }
        if !(0.0..=1.0).contains(&self.shading.horizontal_face) || self.shading.fog_distance < 0.0 {
            return invalid("shading.horizontal_face must be in [0, 1] and fog_distance >= 0".into());
        }
        Ok(())
    }

    #[inline]
    pub fn num_rays(&self) -> usize {
        (self.window_width / self.ray_stride) as usize
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    #[inline]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed_degrees.to_radians()
    }
}
