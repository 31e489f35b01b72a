//! Bite detection
//!
//! Fuses packet signals and the hook's own motion into one debounced
//! [`FishBite`]. Both paths share the cast grace period and the bite cooldown,
//! so they can never fire twice for the same bite.

use crate::config::settings::{DetectionSettings, MotionThresholds};
use crate::game::{HookHandle, HookState, LiquidKind};
use crate::signal::BiteSignal;
use crate::stealth::Humanizer;

/// A detected bite
#[derive(Debug, Clone, PartialEq)]
pub struct FishBite {
    /// When the bite was detected (ms)
    pub detected_at: u64,
    /// The signal that triggered it
    pub source: BiteSignal,
}

/// Stateful bite detector for the local player's hook
#[derive(Debug, Default)]
pub struct BiteDetector {
    hook: HookState,
    last_bite_at: Option<u64>,
    /// Cast time taken from a splash heard before the hook showed up
    pending_cast_at: Option<u64>,
    liquid_failures: u32,
}

impl BiteDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one tick.
    ///
    /// `hook` is this tick's view of the tracked hook; `signals` are the
    /// classified events drained this tick plus the hook's motion sample.
    pub fn observe(
        &mut self,
        now: u64,
        hook: Option<&HookHandle>,
        signals: &[BiteSignal],
        settings: &DetectionSettings,
        rng: &mut Humanizer,
    ) -> Option<FishBite> {
        let Some(hook) = hook else {
            self.on_hook_missing(now, signals);
            return None;
        };

        if self.hook.entity_id != Some(hook.entity_id()) {
            self.attach(now, hook, settings, rng);
        }
        self.update_liquid(hook.liquid());

        // No bite can happen outside liquid, and nothing is accumulated there
        let thresholds = match hook.liquid() {
            LiquidKind::None => return None,
            LiquidKind::Water => settings.water,
            LiquidKind::Lava => settings.lava,
        };

        let mut candidate = None;
        for signal in signals {
            let qualifies = match signal {
                BiteSignal::MotionSample { dy } => {
                    settings.motion_detection && self.motion_matches(*dy, &thresholds, settings.min_stable_ticks)
                }
                other => settings.packet_detection && packet_matches(other, hook, settings),
            };
            if qualifies && candidate.is_none() {
                candidate = Some(signal.clone());
            }
        }

        let source = candidate?;
        if !self.hook.grace_elapsed(now) {
            log::debug!("Ignoring {} bite inside cast grace period", source.label());
            return None;
        }
        if let Some(last) = self.last_bite_at {
            if now.saturating_sub(last) < settings.bite_cooldown_ms {
                log::debug!("Ignoring {} bite inside cooldown", source.label());
                return None;
            }
        }

        self.last_bite_at = Some(now);
        self.hook.reset_motion();
        log::info!("Bite detected from {}", source.label());
        Some(FishBite {
            detected_at: now,
            source,
        })
    }

    /// A host read failed this tick; drop anything half-accumulated
    pub fn on_read_fault(&mut self) {
        self.hook.reset_motion();
    }

    /// Forget everything, including the failure count and cooldown
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Casts in a row that never reached liquid
    pub fn liquid_failures(&self) -> u32 {
        self.liquid_failures
    }

    /// Whether casts keep missing liquid beyond the configured tolerance
    pub fn liquid_failure_exceeded(&self, settings: &DetectionSettings) -> bool {
        settings.liquid_detection && self.liquid_failures > settings.max_liquid_failures
    }

    pub fn hook_state(&self) -> &HookState {
        &self.hook
    }

    fn on_hook_missing(&mut self, now: u64, signals: &[BiteSignal]) {
        if self.hook.is_attached() {
            self.detach();
        }

        if signals.iter().any(|s| matches!(s, BiteSignal::SoundSplash { .. })) {
            self.pending_cast_at = Some(now);
        }
    }

    fn attach(&mut self, now: u64, hook: &HookHandle, settings: &DetectionSettings, rng: &mut Humanizer) {
        if self.hook.is_attached() {
            self.detach();
        }

        let grace_ms = if settings.random_cast_ignore {
            rng.delay_between(settings.min_cast_ignore_ms, settings.max_cast_ignore_ms)
        } else {
            settings.cast_ignore_ms
        };
        // A splash heard just before the hook appeared is the cast itself
        let cast_at = match self.pending_cast_at.take() {
            Some(at) if now.saturating_sub(at) <= grace_ms => at,
            _ => now,
        };

        self.hook.attach(hook.entity_id(), cast_at, grace_ms);
        log::debug!("Tracking hook {} with {}ms grace", hook.entity_id(), grace_ms);
    }

    fn detach(&mut self) {
        if self.hook.touched_liquid {
            log::debug!("Hook gone");
        } else {
            self.liquid_failures += 1;
            log::info!("Hook gone without reaching liquid ({} in a row)", self.liquid_failures);
        }
        self.hook.reset();
    }

    fn update_liquid(&mut self, liquid: LiquidKind) {
        if self.hook.liquid.is_liquid() && !liquid.is_liquid() {
            log::debug!("Hook left liquid, resetting stability");
            self.hook.reset_motion();
        }
        if liquid.is_liquid() && !self.hook.touched_liquid {
            self.hook.touched_liquid = true;
            self.liquid_failures = 0;
        }
        self.hook.liquid = liquid;
    }

    /// Dip-then-pop after a stable float. Records the sample either way.
    fn motion_matches(&mut self, dy: f64, thresholds: &MotionThresholds, min_stable_ticks: u32) -> bool {
        let matched = match self.hook.previous_dy {
            Some(previous) => {
                previous < thresholds.dip && dy > thresholds.pop && self.hook.stable_before_last >= min_stable_ticks
            }
            None => false,
        };
        self.hook.record_motion(dy, thresholds.stable);
        matched
    }
}

fn packet_matches(signal: &BiteSignal, hook: &HookHandle, settings: &DetectionSettings) -> bool {
    match signal {
        BiteSignal::SoundSplash { pos, .. } => pos.distance(&hook.position()) < settings.sound_radius,
        BiteSignal::ParticleSplash { pos, .. } => pos.distance(&hook.position()) < settings.particle_radius,
        BiteSignal::HookVelocity { entity_id, dy } => {
            *entity_id == hook.entity_id() && dy.abs() > settings.velocity_threshold
        }
        BiteSignal::MotionSample { .. } => false,
    }
}
