//! Host game boundary
//!
//! Everything the engine needs from the running game client goes through the
//! [`Host`] trait: reading the player and hook, injecting input and talking
//! back to the operator. A host adapter implements it once; the engine never
//! touches game internals directly.

pub mod input;

pub use input::{InputIntent, InputSynthesizer};

use serde::{Deserialize, Serialize};

use crate::game::{HookHandle, Orientation};

/// Synthetic inputs the engine can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// Right click / use item (reel and cast share this channel)
    UseItem,
    /// Sneak key
    Sneak,
    /// Jump key
    Jump,
}

impl InputKind {
    pub const ALL: [InputKind; 3] = [InputKind::UseItem, InputKind::Sneak, InputKind::Jump];

    pub fn index(&self) -> usize {
        match self {
            InputKind::UseItem => 0,
            InputKind::Sneak => 1,
            InputKind::Jump => 2,
        }
    }
}

/// Feedback sounds played to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackSound {
    /// Something bit the hook
    FishBite,
    /// A sea creature surfaced
    SeaCreature,
    /// Treasure was found
    Treasure,
}

/// Interface the host game client exposes to the engine
///
/// Reads may fail transiently (no world loaded, player respawning); the engine
/// treats a failed read as "nothing observed this tick".
pub trait Host {
    /// The local player's hook, if one is out
    fn tracked_hook(&self) -> Result<Option<HookHandle>, HostError>;

    /// Whether the player currently has a line out
    fn is_player_fishing(&self) -> Result<bool, HostError>;

    /// Whether the player is holding a fishing rod
    fn is_holding_fishing_tool(&self) -> Result<bool, HostError>;

    /// Player position on the horizontal plane as (x, z)
    fn player_position(&self) -> Result<(f64, f64), HostError>;

    /// Player view angles
    fn player_orientation(&self) -> Result<Orientation, HostError>;

    /// Press `kind` and release it after `duration_ticks` ticks
    fn emit_input_pulse(&mut self, kind: InputKind, duration_ticks: u32) -> Result<(), HostError>;

    /// Press or release `kind`
    fn set_held_key_state(&mut self, kind: InputKind, pressed: bool) -> Result<(), HostError>;

    /// Point the player's view at the given angles
    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), HostError>;

    /// Show a message to the operator
    fn notify_operator(&mut self, text: &str);

    /// Play a feedback sound to the operator
    fn play_feedback_sound(&mut self, sound: FeedbackSound);
}

/// Host boundary errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("World is not loaded")]
    WorldUnavailable,
    #[error("Input injection failed: {0}")]
    InputFailed(String),
}

#[cfg(test)]
pub(crate) mod mock;
