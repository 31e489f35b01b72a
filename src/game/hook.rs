//! Fishing hook tracking
//!
//! The host reports the hook entity as a fresh [`HookHandle`] every tick.
//! [`HookState`] holds what the detector remembers about it between ticks,
//! keyed by entity id only.

use super::{EntityId, LiquidKind, Vec3};

/// Snapshot of the local player's hook entity for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookHandle {
    entity_id: EntityId,
    position: Vec3,
    vertical_velocity: f64,
    liquid: LiquidKind,
}

impl HookHandle {
    pub fn new(entity_id: EntityId, position: Vec3, vertical_velocity: f64, liquid: LiquidKind) -> Self {
        Self {
            entity_id,
            position,
            vertical_velocity,
            liquid,
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.vertical_velocity
    }

    pub fn liquid(&self) -> LiquidKind {
        self.liquid
    }
}

/// Per-cast detection state for the local player's hook
#[derive(Debug, Clone, Default)]
pub struct HookState {
    /// Lookup key of the tracked hook, if one is attached
    pub entity_id: Option<EntityId>,
    /// Liquid the hook was in on the last observed tick
    pub liquid: LiquidKind,
    /// When the current cast was first observed (ms)
    pub cast_at: Option<u64>,
    /// Grace period drawn for the current cast (ms)
    pub grace_ms: u64,
    /// Consecutive ticks the hook has been floating still
    pub stable_ticks: u32,
    /// Value of `stable_ticks` before the previous sample was recorded
    pub stable_before_last: u32,
    /// Vertical velocity seen on the previous tick
    pub previous_dy: Option<f64>,
    /// Whether this cast ever reached a liquid
    pub touched_liquid: bool,
}

impl HookState {
    /// Start tracking a newly observed hook
    pub fn attach(&mut self, entity_id: EntityId, now: u64, grace_ms: u64) {
        *self = Self {
            entity_id: Some(entity_id),
            cast_at: Some(now),
            grace_ms,
            ..Self::default()
        };
    }

    /// Whether a hook is currently tracked
    pub fn is_attached(&self) -> bool {
        self.entity_id.is_some()
    }

    /// Drop all stability counters but keep the cast itself
    pub fn reset_motion(&mut self) {
        self.stable_ticks = 0;
        self.stable_before_last = 0;
        self.previous_dy = None;
    }

    /// Forget the hook entirely
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed one vertical velocity sample
    pub fn record_motion(&mut self, dy: f64, stable_threshold: f64) {
        self.stable_before_last = self.stable_ticks;
        if dy.abs() < stable_threshold {
            self.stable_ticks = self.stable_ticks.saturating_add(1);
        } else {
            self.stable_ticks = 0;
        }
        self.previous_dy = Some(dy);
    }

    /// Whether the cast grace period has run out at `now`
    pub fn grace_elapsed(&self, now: u64) -> bool {
        match self.cast_at {
            Some(cast_at) => now.saturating_sub(cast_at) >= self.grace_ms,
            None => true,
        }
    }
}
