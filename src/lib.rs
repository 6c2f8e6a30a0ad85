//! Grid raycaster: a tile map, a player, one DDA ray per screen column and
//! a textured wall-strip projection into a CPU frame buffer.
//!
//! The window and event loop live in the binary; this library is headless.

pub mod actor;
pub mod caster;
pub mod config;
pub mod engine;
pub mod input;
pub mod ray;
pub mod renderer;
pub mod scaler;
pub mod texture;
pub mod world;

pub use actor::{Actor, Motion};
pub use caster::{RayCaster, projected_height, texture_column_index};
pub use config::{Config, ConfigError};
pub use engine::{Engine, StepOutcome};
pub use input::InputState;
pub use ray::{HitOrientation, Ray, RayHit};
pub use renderer::FrameBuffer;
pub use texture::{Texture, TextureError, TextureSet};
pub use world::{GridError, WorldGrid};
