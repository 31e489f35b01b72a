//! Operator movement safety
//!
//! Automation stops as soon as the player moves or turns further than the
//! look drift could explain. A trip is one-way until the next enable.

use std::fmt;

use crate::config::settings::SafetySettings;
use crate::game::Orientation;

/// Where the player was when automation was enabled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyBaseline {
    pub origin_x: f64,
    pub origin_z: f64,
    pub origin: Orientation,
    pub captured_at: u64,
}

/// Why safety tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyTrip {
    Movement,
    Rotation,
}

impl fmt::Display for SafetyTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyTrip::Movement => write!(f, "movement detected"),
            SafetyTrip::Rotation => write!(f, "rotation detected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SafetyState {
    Uninitialized,
    Armed(SafetyBaseline),
    Tripped(SafetyTrip),
}

/// Compares live position and view against the enable-time baseline
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    state: SafetyState,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyMonitor {
    pub fn new() -> Self {
        Self {
            state: SafetyState::Uninitialized,
        }
    }

    /// Capture a fresh baseline, clearing any trip
    pub fn arm(&mut self, position: (f64, f64), orientation: Orientation, now: u64) {
        let baseline = SafetyBaseline {
            origin_x: position.0,
            origin_z: position.1,
            origin: orientation,
            captured_at: now,
        };
        log::info!(
            "Safety baseline at ({:.2}, {:.2}) facing ({:.1}, {:.1})",
            baseline.origin_x,
            baseline.origin_z,
            orientation.yaw,
            orientation.pitch
        );
        self.state = SafetyState::Armed(baseline);
    }

    /// Back to Uninitialized; the next check captures a new baseline
    pub fn disarm(&mut self) {
        self.state = SafetyState::Uninitialized;
    }

    /// Check this tick's position and view.
    ///
    /// Returns the trip reason on the tick safety trips, and keeps returning
    /// it on every later tick until re-armed.
    pub fn check(
        &mut self,
        position: (f64, f64),
        orientation: Orientation,
        now: u64,
        settings: &SafetySettings,
        fov_radius: f32,
    ) -> Option<SafetyTrip> {
        let baseline = match self.state {
            SafetyState::Tripped(reason) => return Some(reason),
            SafetyState::Uninitialized => {
                self.arm(position, orientation, now);
                return None;
            }
            SafetyState::Armed(baseline) => baseline,
        };

        if !settings.enabled {
            return None;
        }

        let trip = if settings.position_enabled
            && ((position.0 - baseline.origin_x).abs() > settings.position_threshold
                || (position.1 - baseline.origin_z).abs() > settings.position_threshold)
        {
            Some(SafetyTrip::Movement)
        } else {
            let limit = fov_radius + settings.rotation_threshold;
            let (dyaw, dpitch) = orientation.delta_from(&baseline.origin);
            if settings.rotation_enabled && (dyaw.abs() > limit || dpitch.abs() > limit) {
                Some(SafetyTrip::Rotation)
            } else {
                None
            }
        };

        if let Some(reason) = trip {
            log::warn!("Safety tripped: {}", reason);
            self.state = SafetyState::Tripped(reason);
        }
        trip
    }

    pub fn baseline(&self) -> Option<&SafetyBaseline> {
        match &self.state {
            SafetyState::Armed(baseline) => Some(baseline),
            _ => None,
        }
    }

    pub fn tripped(&self) -> Option<SafetyTrip> {
        match self.state {
            SafetyState::Tripped(reason) => Some(reason),
            _ => None,
        }
    }
}
