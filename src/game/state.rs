//! Per-tick world snapshot
//!
//! Reads everything the engine needs from the host once per tick so every
//! component in that tick sees the same view, and tracks fishing state
//! transitions (cast / reel) across ticks.

use super::{HookHandle, Orientation};
use crate::host::{Host, HostError};

/// What the host reported at the start of a tick
#[derive(Debug, Clone, Copy)]
pub struct WorldView {
    /// Wall-clock time of this tick in milliseconds
    pub now: u64,
    /// Tick counter
    pub tick: u64,
    /// The local player's hook, if one is out
    pub hook: Option<HookHandle>,
    /// Whether the player has a line out
    pub fishing: bool,
    /// Whether the player holds a fishing rod
    pub holding_rod: bool,
    /// Player position (x, z)
    pub position: (f64, f64),
    /// Player view angles
    pub orientation: Orientation,
}

impl WorldView {
    /// Read a consistent snapshot from the host
    pub fn capture<H: Host + ?Sized>(host: &H, now: u64, tick: u64) -> Result<Self, HostError> {
        Ok(Self {
            now,
            tick,
            hook: host.tracked_hook()?,
            fishing: host.is_player_fishing()?,
            holding_rod: host.is_holding_fishing_tool()?,
            position: host.player_position()?,
            orientation: host.player_orientation()?,
        })
    }

    /// Fishing or at least holding the rod
    pub fn is_rod_engaged(&self) -> bool {
        self.fishing || self.holding_rod
    }
}

/// Fishing state change between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingTransition {
    /// A line went out
    Cast,
    /// The line came back in
    Reeled,
}

/// Tracks fishing state across ticks
#[derive(Debug, Clone, Default)]
pub struct FishingTracker {
    /// Whether a line was out on the last tick
    pub fishing: bool,
}

impl FishingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's fishing state
    pub fn update(&mut self, fishing: bool) -> Option<FishingTransition> {
        if fishing == self.fishing {
            return None;
        }

        self.fishing = fishing;
        if fishing {
            Some(FishingTransition::Cast)
        } else {
            Some(FishingTransition::Reeled)
        }
    }
}
