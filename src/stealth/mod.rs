//! Stealth and anti-detection module
//!
//! This module makes the automation look less mechanical:
//! - Randomized timing through a single seeded [`Humanizer`]
//! - Random look drift along curved paths
//! - Periodic sneak and jump presses
//!
//! Each behaviour is its own sub-machine so a fault in one never touches the
//! others.

pub mod humanize;
pub mod look;
pub mod pulse;

pub use humanize::*;
pub use look::LookDrift;
pub use pulse::PulseMachine;

use crate::config::settings::HumanizeSettings;
use crate::game::Orientation;
use crate::host::{InputIntent, InputKind};

/// Humanization behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Look,
    Sneak,
    Jump,
}

impl Behavior {
    pub const ALL: [Behavior; 3] = [Behavior::Look, Behavior::Sneak, Behavior::Jump];

    /// Key held by this behaviour, if any
    pub fn key(&self) -> Option<InputKind> {
        match self {
            Behavior::Look => None,
            Behavior::Sneak => Some(InputKind::Sneak),
            Behavior::Jump => Some(InputKind::Jump),
        }
    }
}

/// What the sub-machines need to know about the current tick
#[derive(Debug, Clone, Copy)]
pub struct HumanizeContext {
    pub now: u64,
    pub orientation: Orientation,
    /// Fishing or holding the rod
    pub rod_engaged: bool,
    /// A use-item pulse is in progress
    pub use_item_busy: bool,
}

/// Owns the look, sneak and jump sub-machines
#[derive(Debug, Clone)]
pub struct HumanizationScheduler {
    look: LookDrift,
    sneak: PulseMachine,
    jump: PulseMachine,
}

impl Default for HumanizationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanizationScheduler {
    pub fn new() -> Self {
        Self {
            look: LookDrift::new(),
            sneak: PulseMachine::new(InputKind::Sneak),
            jump: PulseMachine::new(InputKind::Jump),
        }
    }

    /// Advance one behaviour by one tick.
    ///
    /// Callers only step while automation is enabled. A behaviour whose
    /// feature is off (or, for look and sneak, while the rod is put away) is
    /// forced back to Idle.
    pub fn step(
        &mut self,
        behavior: Behavior,
        ctx: &HumanizeContext,
        settings: &HumanizeSettings,
        rng: &mut Humanizer,
    ) -> Vec<InputIntent> {
        let may_start = !(settings.avoid_use_item_overlap && ctx.use_item_busy);

        match behavior {
            Behavior::Look => {
                if !settings.look.enabled || !ctx.rod_engaged {
                    self.look.stop();
                    return Vec::new();
                }
                self.look.step(ctx.now, ctx.orientation, &settings.look, rng, may_start)
            }
            Behavior::Sneak => {
                if !settings.shift.enabled || !ctx.rod_engaged {
                    return self.sneak.stop();
                }
                self.sneak.step(ctx.now, &settings.shift, rng, may_start)
            }
            Behavior::Jump => {
                if !settings.jump.enabled {
                    return self.jump.stop();
                }
                self.jump.step(ctx.now, &settings.jump, rng, may_start)
            }
        }
    }

    /// Return a failed behaviour to Idle with a short retry
    pub fn fault(&mut self, behavior: Behavior, now: u64) {
        log::warn!("{:?} humanization faulted, retrying shortly", behavior);
        match behavior {
            Behavior::Look => self.look.fault(now),
            Behavior::Sneak => self.sneak.fault(now),
            Behavior::Jump => self.jump.fault(now),
        }
    }

    pub fn is_active(&self, behavior: Behavior) -> bool {
        match behavior {
            Behavior::Look => self.look.is_active(),
            Behavior::Sneak => self.sneak.is_active(),
            Behavior::Jump => self.jump.is_active(),
        }
    }

    /// Reel and cast wait for a jump to finish
    pub fn is_jump_active(&self) -> bool {
        self.jump.is_active()
    }

    /// Force every behaviour to Idle; returns the releases for held keys
    pub fn stop_all(&mut self) -> Vec<InputIntent> {
        self.look.stop();
        let mut releases = self.sneak.stop();
        releases.extend(self.jump.stop());
        releases
    }

    /// Stop everything and forget the look origin
    pub fn reset(&mut self) -> Vec<InputIntent> {
        let releases = self.stop_all();
        self.look.reset();
        releases
    }

    pub fn look_origin(&self) -> Option<Orientation> {
        self.look.origin()
    }
}
