//! Grid raycasting engine
//!
//! Turns a tile map and a viewer pose into per-column wall strips for a
//! pseudo-3D first-person view.
//!
//! - `world`: tile map and occupancy queries
//! - `camera`: viewer pose and per-tick kinematics
//! - `raycast`: DDA ray casting over grid lines
//! - `projection`: fisheye correction and strip geometry
//! - `session`: owns the grid, the viewer and the current frame
//! - `renderer` / `scaler`: software framebuffer output

pub mod camera;
pub mod config;
pub mod error;
pub mod projection;
pub mod raycast;
pub mod renderer;
pub mod scaler;
pub mod session;
pub mod world;

pub use camera::{Camera, Intent};
pub use config::EngineConfig;
pub use error::{ConfigError, MapError};
pub use projection::{Projector, Strip};
pub use raycast::{Ray, cast, cast_all};
pub use session::{Frame, Session};
pub use world::{Grid, WallKind};
