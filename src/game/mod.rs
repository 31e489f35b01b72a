//! Game-side data the engine reads each tick
//!
//! Positions, view angles, liquid kinds and the tracked fishing hook, plus
//! the per-tick world snapshot assembled from the host.

pub mod hook;
pub mod state;

pub use hook::{HookHandle, HookState};
pub use state::{FishingTracker, FishingTransition, WorldView};

use serde::{Deserialize, Serialize};

/// Entity identifier as assigned by the host. Only ever used as a lookup key.
pub type EntityId = i32;

/// World-space position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Player view angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Offset from `origin` as (yaw, pitch), yaw wrapped into [-180, 180)
    pub fn delta_from(&self, origin: &Orientation) -> (f32, f32) {
        (wrap_degrees(self.yaw - origin.yaw), self.pitch - origin.pitch)
    }

    /// Straight-line angular distance from `origin`
    pub fn distance_from(&self, origin: &Orientation) -> f32 {
        let (dyaw, dpitch) = self.delta_from(origin);
        dyaw.hypot(dpitch)
    }
}

/// Wrap an angle in degrees into [-180, 180)
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else if wrapped < -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Liquid the hook is currently floating in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LiquidKind {
    #[default]
    None,
    Water,
    Lava,
}

impl LiquidKind {
    /// Whether bites can be detected in this liquid
    pub fn is_liquid(&self) -> bool {
        !matches!(self, LiquidKind::None)
    }
}
