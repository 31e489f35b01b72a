//! Periodic held-key behaviour (sneak, jump)

use super::Humanizer;
use crate::config::settings::PulseSettings;
use crate::host::{InputIntent, InputKind};

/// Retry delay after a failed key press (ms)
pub const FAULT_RETRY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulsePhase {
    Idle { next_at: Option<u64> },
    Active { until: u64 },
}

/// Idle(next) -> Active(until) -> Idle(next') for one key
#[derive(Debug, Clone)]
pub struct PulseMachine {
    kind: InputKind,
    phase: PulsePhase,
}

impl PulseMachine {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            phase: PulsePhase::Idle { next_at: None },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, PulsePhase::Active { .. })
    }

    /// When the next activation is due, if scheduled
    pub fn next_at(&self) -> Option<u64> {
        match self.phase {
            PulsePhase::Idle { next_at } => next_at,
            PulsePhase::Active { .. } => None,
        }
    }

    /// Advance one tick. `may_start` only gates new activations.
    pub fn step(&mut self, now: u64, settings: &PulseSettings, rng: &mut Humanizer, may_start: bool) -> Vec<InputIntent> {
        match self.phase {
            PulsePhase::Idle { next_at: None } => {
                self.schedule_next(now, settings, rng);
                Vec::new()
            }
            PulsePhase::Idle { next_at: Some(at) } => {
                if now < at || !may_start {
                    return Vec::new();
                }
                let duration = rng.delay_between(settings.min_duration_ms, settings.max_duration_ms);
                self.phase = PulsePhase::Active { until: now.saturating_add(duration) };
                log::debug!("{:?} pulse for {}ms", self.kind, duration);
                vec![InputIntent::Hold(self.kind)]
            }
            PulsePhase::Active { until } => {
                if now < until {
                    return Vec::new();
                }
                self.schedule_next(now, settings, rng);
                vec![InputIntent::Release(self.kind)]
            }
        }
    }

    /// Force back to Idle; returns the release needed if the key was held
    pub fn stop(&mut self) -> Vec<InputIntent> {
        let was_active = self.is_active();
        self.phase = PulsePhase::Idle { next_at: None };
        if was_active {
            vec![InputIntent::Release(self.kind)]
        } else {
            Vec::new()
        }
    }

    /// Back to Idle after a failed key press, retrying shortly
    pub fn fault(&mut self, now: u64) {
        self.phase = PulsePhase::Idle {
            next_at: Some(now.saturating_add(FAULT_RETRY_MS)),
        };
    }

    fn schedule_next(&mut self, now: u64, settings: &PulseSettings, rng: &mut Humanizer) {
        let interval = rng.delay_between(settings.min_interval_ms, settings.max_interval_ms);
        self.phase = PulsePhase::Idle {
            next_at: Some(now.saturating_add(interval)),
        };
        log::debug!("Next {:?} pulse in {}ms", self.kind, interval);
    }
}
