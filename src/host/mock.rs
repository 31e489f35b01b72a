//! Recording host used by unit tests

use super::{FeedbackSound, Host, HostError, InputKind};
use crate::game::{HookHandle, Orientation};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Pulse(InputKind, u32),
    KeyState(InputKind, bool),
    Look(Orientation),
}

#[derive(Debug)]
pub struct MockHost {
    pub hook: Option<HookHandle>,
    pub fishing: bool,
    pub holding_rod: bool,
    pub position: (f64, f64),
    pub orientation: Orientation,
    pub fail_reads: bool,
    pub fail_input: bool,
    /// Fail input calls for this key only
    pub fail_kind: Option<InputKind>,
    pub calls: Vec<HostCall>,
    pub messages: Vec<String>,
    pub sounds: Vec<FeedbackSound>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            hook: None,
            fishing: false,
            holding_rod: true,
            position: (0.0, 0.0),
            orientation: Orientation::default(),
            fail_reads: false,
            fail_input: false,
            fail_kind: None,
            calls: Vec::new(),
            messages: Vec::new(),
            sounds: Vec::new(),
        }
    }

    pub fn pulses(&self, kind: InputKind) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Pulse(k, _) if *k == kind))
            .count()
    }

    fn check_read(&self) -> Result<(), HostError> {
        if self.fail_reads {
            Err(HostError::WorldUnavailable)
        } else {
            Ok(())
        }
    }

    fn check_input(&self, kind: Option<InputKind>) -> Result<(), HostError> {
        if self.fail_input || (kind.is_some() && kind == self.fail_kind) {
            Err(HostError::InputFailed("mock".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Host for MockHost {
    fn tracked_hook(&self) -> Result<Option<HookHandle>, HostError> {
        self.check_read()?;
        Ok(self.hook)
    }

    fn is_player_fishing(&self) -> Result<bool, HostError> {
        self.check_read()?;
        Ok(self.fishing)
    }

    fn is_holding_fishing_tool(&self) -> Result<bool, HostError> {
        self.check_read()?;
        Ok(self.holding_rod)
    }

    fn player_position(&self) -> Result<(f64, f64), HostError> {
        self.check_read()?;
        Ok(self.position)
    }

    fn player_orientation(&self) -> Result<Orientation, HostError> {
        self.check_read()?;
        Ok(self.orientation)
    }

    fn emit_input_pulse(&mut self, kind: InputKind, duration_ticks: u32) -> Result<(), HostError> {
        self.check_input(Some(kind))?;
        self.calls.push(HostCall::Pulse(kind, duration_ticks));
        Ok(())
    }

    fn set_held_key_state(&mut self, kind: InputKind, pressed: bool) -> Result<(), HostError> {
        self.check_input(Some(kind))?;
        self.calls.push(HostCall::KeyState(kind, pressed));
        Ok(())
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), HostError> {
        self.check_input(None)?;
        self.orientation = orientation;
        self.calls.push(HostCall::Look(orientation));
        Ok(())
    }

    fn notify_operator(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn play_feedback_sound(&mut self, sound: FeedbackSound) {
        self.sounds.push(sound);
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}
