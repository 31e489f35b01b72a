//! Input intent translation
//!
//! Schedulers describe what they want pressed as [`InputIntent`]s. The
//! [`InputSynthesizer`] is the single place that turns those into host calls
//! and remembers which keys it is currently holding, so a failed component
//! can always have its key released.

use super::{Host, HostError, InputKind};
use crate::game::Orientation;

/// Abstract input request produced by the schedulers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputIntent {
    /// Press `kind` for a fixed number of ticks
    Pulse { kind: InputKind, duration_ticks: u32 },
    /// Press and keep holding `kind`
    Hold(InputKind),
    /// Release `kind`
    Release(InputKind),
    /// Move the view to the given angles
    Look(Orientation),
}

/// Translates intents into host input calls
#[derive(Debug, Default)]
pub struct InputSynthesizer {
    /// Keys currently held by us, indexed by [`InputKind::index`]
    held: [bool; 3],
    /// Total pulses handed to the host
    pulses_emitted: u64,
}

impl InputSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single intent
    pub fn apply<H: Host + ?Sized>(&mut self, host: &mut H, intent: &InputIntent) -> Result<(), HostError> {
        match *intent {
            InputIntent::Pulse { kind, duration_ticks } => {
                host.emit_input_pulse(kind, duration_ticks)?;
                self.pulses_emitted += 1;
                log::trace!("Pulse {:?} for {} ticks", kind, duration_ticks);
            }
            InputIntent::Hold(kind) => {
                if !self.held[kind.index()] {
                    host.set_held_key_state(kind, true)?;
                    self.held[kind.index()] = true;
                    log::trace!("Holding {:?}", kind);
                }
            }
            InputIntent::Release(kind) => {
                if self.held[kind.index()] {
                    // Mark released first so a failing host can't leave us
                    // believing the key is still down.
                    self.held[kind.index()] = false;
                    host.set_held_key_state(kind, false)?;
                    log::trace!("Released {:?}", kind);
                }
            }
            InputIntent::Look(orientation) => {
                host.set_orientation(orientation)?;
            }
        }
        Ok(())
    }

    /// Apply intents in order, stopping at the first failure
    pub fn apply_all<H: Host + ?Sized>(&mut self, host: &mut H, intents: &[InputIntent]) -> Result<(), HostError> {
        for intent in intents {
            self.apply(host, intent)?;
        }
        Ok(())
    }

    /// Release `kind` unconditionally, ignoring host errors
    pub fn force_release<H: Host + ?Sized>(&mut self, host: &mut H, kind: InputKind) {
        self.held[kind.index()] = false;
        if let Err(e) = host.set_held_key_state(kind, false) {
            log::warn!("Failed to force-release {:?}: {}", kind, e);
        }
    }

    /// Release every synthetic input
    pub fn release_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for kind in InputKind::ALL {
            self.force_release(host, kind);
        }
    }

    /// Whether we are holding `kind`
    pub fn is_held(&self, kind: InputKind) -> bool {
        self.held[kind.index()]
    }

    /// Total pulses handed to the host so far
    pub fn pulses_emitted(&self) -> u64 {
        self.pulses_emitted
    }
}
