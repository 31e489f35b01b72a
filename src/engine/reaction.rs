//! Catch and recast scheduling
//!
//! A bite arms a randomized catch timer. When it expires a short use-item
//! pulse reels the line in; when that pulse completes a recast timer is armed
//! and a second pulse casts the line back out. Reel and cast share the single
//! use-item channel, so at most one pulse is ever in flight.

use crate::config::settings::{CatchSettings, RecastSettings};
use crate::host::{InputIntent, InputKind};
use crate::stealth::{Humanizer, MissDecision};

/// What a use-item pulse is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePurpose {
    Reel,
    Cast,
}

/// A use-item press in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPulse {
    pub kind: InputKind,
    pub start_tick: u64,
    pub duration_ticks: u32,
    pub purpose: PulsePurpose,
}

impl InputPulse {
    fn is_complete(&self, tick: u64) -> bool {
        tick >= self.start_tick.saturating_add(u64::from(self.duration_ticks))
    }
}

/// The reaction to one bite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionPlan {
    /// When the bite was detected (ms)
    pub bite_at: u64,
    /// When to reel in, until the reel pulse starts
    pub catch_at: Option<u64>,
    /// Set when this bite is intentionally missed
    pub miss: Option<MissDecision>,
    /// When to cast again, once the reel has completed
    pub recast_at: Option<u64>,
}

/// Per-tick inputs for the scheduler
#[derive(Debug, Clone, Copy)]
pub struct ReactionContext {
    pub now: u64,
    pub tick: u64,
    pub fishing: bool,
    pub holding_rod: bool,
    /// A humanization jump is in progress
    pub jump_active: bool,
}

/// Drives reel and cast pulses for the local player
#[derive(Debug, Default)]
pub struct ReactionScheduler {
    plan: Option<ReactionPlan>,
    pulse: Option<InputPulse>,
    /// A bite happened and no recast has been scheduled since
    needs_backup: bool,
    last_bite_at: Option<u64>,
    notes: Vec<String>,
}

impl ReactionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the catch timer for a bite.
    ///
    /// Ignored while another plan is in flight.
    pub fn on_fish_bite(&mut self, now: u64, settings: &CatchSettings, rng: &mut Humanizer) -> Option<ReactionPlan> {
        if self.plan.is_some() {
            self.note("Bite ignored, a reaction is already in flight".to_string());
            return None;
        }

        let base = rng.delay_between(settings.min_delay_ms, settings.max_delay_ms);
        let miss = if settings.miss_enabled {
            rng.decide_miss(
                settings.miss_chance_percent,
                settings.min_miss_offset_ms,
                settings.max_miss_offset_ms,
            )
        } else {
            None
        };
        let delay = miss.map_or(base, |m| m.apply(base));

        let plan = ReactionPlan {
            bite_at: now,
            catch_at: Some(now.saturating_add(delay)),
            miss,
            recast_at: None,
        };
        self.plan = Some(plan);
        self.needs_backup = true;
        self.last_bite_at = Some(now);

        match miss {
            Some(m) => self.note(format!(
                "Scheduled catch in {}ms (intentional miss, {:?} by {}ms)",
                delay,
                m.timing(),
                m.offset_ms.abs()
            )),
            None => self.note(format!("Scheduled catch in {}ms", delay)),
        }
        Some(plan)
    }

    /// Advance timers and pulses by one tick
    pub fn tick(
        &mut self,
        ctx: &ReactionContext,
        catch: &CatchSettings,
        recast: &RecastSettings,
        rng: &mut Humanizer,
    ) -> Vec<InputIntent> {
        self.finish_pulse(ctx, recast, rng);
        self.check_backup(ctx, recast, rng);

        let Some(mut plan) = self.plan else {
            return Vec::new();
        };

        if let Some(catch_at) = plan.catch_at {
            if ctx.now < catch_at {
                return Vec::new();
            }
            if ctx.jump_active {
                self.note("Delaying catch while jumping".to_string());
                return Vec::new();
            }
            if self.pulse.is_some() {
                return Vec::new();
            }
            if !ctx.fishing {
                self.note("Catch dropped, no line out".to_string());
                self.plan = None;
                return Vec::new();
            }

            plan.catch_at = None;
            self.plan = Some(plan);
            self.note("Reeling in".to_string());
            return vec![self.start_pulse(ctx.tick, catch, PulsePurpose::Reel)];
        }

        if let Some(recast_at) = plan.recast_at {
            if ctx.now < recast_at {
                return Vec::new();
            }
            if ctx.jump_active {
                self.note("Delaying recast while jumping".to_string());
                return Vec::new();
            }
            if self.pulse.is_some() {
                return Vec::new();
            }

            // The plan is done either way
            self.plan = None;
            if ctx.fishing || !ctx.holding_rod {
                self.note("Recast dropped, line already out or rod put away".to_string());
                return Vec::new();
            }
            self.needs_backup = false;
            self.note("Recasting".to_string());
            return vec![self.start_pulse(ctx.tick, catch, PulsePurpose::Cast)];
        }

        Vec::new()
    }

    /// Cast now if there is no line out and the use-item key is free
    pub fn cast_if_needed(&mut self, ctx: &ReactionContext, catch: &CatchSettings) -> Option<InputIntent> {
        if ctx.fishing || !ctx.holding_rod || self.pulse.is_some() {
            return None;
        }
        self.note("Casting".to_string());
        Some(self.start_pulse(ctx.tick, catch, PulsePurpose::Cast))
    }

    /// Cancel the plan and any pulse. The caller releases the key.
    pub fn abort(&mut self) {
        if self.plan.is_some() || self.pulse.is_some() {
            log::debug!("Reaction aborted");
        }
        self.plan = None;
        self.pulse = None;
        self.needs_backup = false;
    }

    pub fn is_pulse_active(&self) -> bool {
        self.pulse.is_some()
    }

    pub fn plan(&self) -> Option<&ReactionPlan> {
        self.plan.as_ref()
    }

    pub fn pulse(&self) -> Option<&InputPulse> {
        self.pulse.as_ref()
    }

    /// Scheduling decisions since the last call
    pub fn take_notes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notes)
    }

    fn start_pulse(&mut self, tick: u64, catch: &CatchSettings, purpose: PulsePurpose) -> InputIntent {
        let pulse = InputPulse {
            kind: InputKind::UseItem,
            start_tick: tick,
            duration_ticks: catch.use_item_hold_ticks,
            purpose,
        };
        self.pulse = Some(pulse);
        InputIntent::Pulse {
            kind: pulse.kind,
            duration_ticks: pulse.duration_ticks,
        }
    }

    fn finish_pulse(&mut self, ctx: &ReactionContext, recast: &RecastSettings, rng: &mut Humanizer) {
        let Some(pulse) = self.pulse else {
            return;
        };
        if !pulse.is_complete(ctx.tick) {
            return;
        }
        self.pulse = None;

        if pulse.purpose == PulsePurpose::Reel {
            if recast.auto_recast && ctx.holding_rod {
                self.schedule_recast(ctx.now, recast, rng);
            } else {
                self.plan = None;
            }
        }
    }

    fn check_backup(&mut self, ctx: &ReactionContext, recast: &RecastSettings, rng: &mut Humanizer) {
        if !self.needs_backup || !recast.auto_recast {
            return;
        }
        let Some(last_bite) = self.last_bite_at else {
            return;
        };
        if ctx.now.saturating_sub(last_bite) <= recast.backup_timeout_ms {
            return;
        }

        let recast_pending = self.plan.is_some_and(|p| p.recast_at.is_some());
        if !ctx.fishing && !recast_pending && self.pulse.is_none() && ctx.holding_rod {
            log::warn!("Fishing state looks stuck, forcing a recast");
            self.note("Backup recast triggered".to_string());
            self.schedule_recast(ctx.now, recast, rng);
        }
        self.needs_backup = false;
    }

    fn schedule_recast(&mut self, now: u64, recast: &RecastSettings, rng: &mut Humanizer) {
        let delay = rng.delay_between(recast.min_delay_ms, recast.max_delay_ms);
        let bite_at = self.plan.map_or(now, |p| p.bite_at);
        self.plan = Some(ReactionPlan {
            bite_at,
            catch_at: None,
            miss: None,
            recast_at: Some(now.saturating_add(delay)),
        });
        self.needs_backup = false;
        self.note(format!("Scheduled recast in {}ms", delay));
    }

    fn note(&mut self, message: String) {
        log::debug!("{}", message);
        self.notes.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(now: u64) -> ReactionContext {
        ReactionContext {
            now,
            tick: now,
            fishing: true,
            holding_rod: true,
            jump_active: false,
        }
    }

    fn no_miss() -> CatchSettings {
        CatchSettings {
            miss_enabled: false,
            ..Default::default()
        }
    }

    fn pulse_starts(intents: &[InputIntent]) -> usize {
        intents
            .iter()
            .filter(|i| matches!(i, InputIntent::Pulse { kind: InputKind::UseItem, .. }))
            .count()
    }

    #[test]
    fn test_catch_window() {
        let catch = CatchSettings {
            miss_chance_percent: 0,
            ..Default::default()
        };
        let recast = RecastSettings::default();

        for seed in 0..50 {
            let mut rng = Humanizer::seeded(seed);
            let mut scheduler = ReactionScheduler::new();
            scheduler.on_fish_bite(1_000, &catch, &mut rng);

            let mut started = None;
            for now in 1_000..=1_600 {
                let intents = scheduler.tick(&ctx(now), &catch, &recast, &mut rng);
                if pulse_starts(&intents) > 0 {
                    started = Some(now);
                    break;
                }
            }
            let started = started.expect("reel pulse");
            assert!((1_080..=1_500).contains(&started), "started at {}", started);
        }
    }

    #[test]
    fn test_miss_final_delay_bounds() {
        let catch = CatchSettings {
            min_delay_ms: 100,
            max_delay_ms: 100,
            miss_chance_percent: 100,
            min_miss_offset_ms: -500,
            max_miss_offset_ms: 800,
            ..Default::default()
        };

        let mut rng = Humanizer::seeded(8);
        for _ in 0..500 {
            let mut scheduler = ReactionScheduler::new();
            let plan = scheduler.on_fish_bite(0, &catch, &mut rng).unwrap();
            let miss = plan.miss.expect("always misses");
            let delay = plan.catch_at.unwrap();

            assert!(delay <= 900);
            assert_eq!(delay, (100 + miss.offset_ms).max(0) as u64);
        }
    }

    #[test]
    fn test_huge_delays_saturate() {
        let catch = CatchSettings {
            min_delay_ms: u64::MAX,
            max_delay_ms: u64::MAX,
            miss_enabled: false,
            ..Default::default()
        };
        let mut rng = Humanizer::seeded(3);
        let mut scheduler = ReactionScheduler::new();

        let plan = scheduler.on_fish_bite(5_000, &catch, &mut rng).unwrap();
        assert_eq!(plan.catch_at, Some(u64::MAX));
        assert!(scheduler
            .tick(&ctx(6_000), &catch, &RecastSettings::default(), &mut rng)
            .is_empty());
    }

    #[test]
    fn test_one_plan_in_flight() {
        let mut rng = Humanizer::seeded(1);
        let mut scheduler = ReactionScheduler::new();

        assert!(scheduler.on_fish_bite(0, &no_miss(), &mut rng).is_some());
        assert!(scheduler.on_fish_bite(10, &no_miss(), &mut rng).is_none());
    }

    #[test]
    fn test_reel_then_recast() {
        let catch = no_miss();
        let recast = RecastSettings {
            min_delay_ms: 200,
            max_delay_ms: 200,
            ..Default::default()
        };
        let mut rng = Humanizer::seeded(2);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);

        let mut now = 0;
        let mut fishing = true;
        let mut purposes = Vec::new();
        while now < 3_000 {
            let tick_ctx = ReactionContext { fishing, ..ctx(now) };
            if !scheduler.tick(&tick_ctx, &catch, &recast, &mut rng).is_empty() {
                let purpose = scheduler.pulse().unwrap().purpose;
                // The host flips fishing state once the press lands
                fishing = purpose == PulsePurpose::Cast;
                purposes.push((now, purpose));
            }
            now += 1;
        }

        assert_eq!(purposes.len(), 2);
        assert_eq!(purposes[0].1, PulsePurpose::Reel);
        assert_eq!(purposes[1].1, PulsePurpose::Cast);
        assert_eq!(purposes[1].0, purposes[0].0 + 2 + 200);
        assert!(scheduler.plan().is_none());
    }

    #[test]
    fn test_no_recast_when_disabled() {
        let catch = no_miss();
        let recast = RecastSettings {
            auto_recast: false,
            ..Default::default()
        };
        let mut rng = Humanizer::seeded(2);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);

        let mut pulses = 0;
        for now in 0..20_000 {
            let tick_ctx = ReactionContext {
                fishing: scheduler.pulse().is_none() && pulses == 0,
                ..ctx(now)
            };
            pulses += pulse_starts(&scheduler.tick(&tick_ctx, &catch, &recast, &mut rng));
        }
        assert_eq!(pulses, 1);
    }

    #[test]
    fn test_at_most_one_pulse() {
        let catch = no_miss();
        let recast = RecastSettings {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Default::default()
        };
        let mut rng = Humanizer::seeded(3);
        let mut scheduler = ReactionScheduler::new();
        let mut active_until: Option<u64> = None;

        for now in 0..10_000u64 {
            if now % 700 == 0 {
                scheduler.on_fish_bite(now, &catch, &mut rng);
            }
            let tick_ctx = ReactionContext {
                fishing: now % 3 != 0,
                ..ctx(now)
            };
            let mut intents = scheduler.tick(&tick_ctx, &catch, &recast, &mut rng);
            intents.extend(scheduler.cast_if_needed(&tick_ctx, &catch));

            for _ in 0..pulse_starts(&intents) {
                if let Some(until) = active_until {
                    assert!(now >= until, "overlapping pulse at {}", now);
                }
                active_until = Some(now + u64::from(catch.use_item_hold_ticks));
            }
            assert!(pulse_starts(&intents) <= 1);
        }
    }

    #[test]
    fn test_catch_deferred_while_jumping() {
        let catch = CatchSettings {
            min_delay_ms: 100,
            max_delay_ms: 100,
            miss_enabled: false,
            ..Default::default()
        };
        let recast = RecastSettings::default();
        let mut rng = Humanizer::seeded(4);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);

        for now in (100..=600).step_by(50) {
            let jumping = ReactionContext {
                jump_active: true,
                ..ctx(now)
            };
            assert!(scheduler.tick(&jumping, &catch, &recast, &mut rng).is_empty());
        }

        let intents = scheduler.tick(&ctx(650), &catch, &recast, &mut rng);
        assert_eq!(pulse_starts(&intents), 1);
        assert_eq!(scheduler.pulse().unwrap().purpose, PulsePurpose::Reel);
    }

    #[test]
    fn test_catch_dropped_when_not_fishing() {
        let catch = no_miss();
        let recast = RecastSettings::default();
        let mut rng = Humanizer::seeded(5);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);

        let idle = ReactionContext {
            fishing: false,
            ..ctx(1_000)
        };
        assert!(scheduler.tick(&idle, &catch, &recast, &mut rng).is_empty());
        assert!(scheduler.plan().is_none());
    }

    #[test]
    fn test_backup_recast() {
        let catch = no_miss();
        let recast = RecastSettings {
            min_delay_ms: 0,
            max_delay_ms: 0,
            backup_timeout_ms: 10_000,
            ..Default::default()
        };
        let mut rng = Humanizer::seeded(6);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);
        // The catch got lost: plan dropped while the line was already in
        let idle = |now| ReactionContext {
            fishing: false,
            ..ctx(now)
        };
        scheduler.tick(&idle(600), &catch, &recast, &mut rng);
        assert!(scheduler.plan().is_none());

        assert!(scheduler.tick(&idle(10_000), &catch, &recast, &mut rng).is_empty());
        // Timeout passes: a zero-delay recast is scheduled and fires at once
        let intents = scheduler.tick(&idle(10_001), &catch, &recast, &mut rng);
        assert_eq!(pulse_starts(&intents), 1);
        assert_eq!(scheduler.pulse().unwrap().purpose, PulsePurpose::Cast);
    }

    #[test]
    fn test_backup_not_when_fishing() {
        let catch = no_miss();
        let recast = RecastSettings::default();
        let mut rng = Humanizer::seeded(6);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);
        scheduler.abort();
        scheduler.needs_backup = true;

        assert!(scheduler.tick(&ctx(20_000), &catch, &recast, &mut rng).is_empty());
        assert!(scheduler.plan().is_none());
    }

    #[test]
    fn test_cast_if_needed() {
        let catch = no_miss();
        let mut scheduler = ReactionScheduler::new();

        assert!(scheduler.cast_if_needed(&ctx(0), &catch).is_none());

        let idle = ReactionContext {
            fishing: false,
            ..ctx(0)
        };
        assert!(scheduler.cast_if_needed(&idle, &catch).is_some());
        assert!(scheduler.cast_if_needed(&idle, &catch).is_none());

        let empty_handed = ReactionContext {
            holding_rod: false,
            ..idle
        };
        scheduler.abort();
        assert!(scheduler.cast_if_needed(&empty_handed, &catch).is_none());
    }

    #[test]
    fn test_abort_clears_everything() {
        let catch = no_miss();
        let mut rng = Humanizer::seeded(7);
        let mut scheduler = ReactionScheduler::new();
        scheduler.on_fish_bite(0, &catch, &mut rng);
        scheduler.abort();

        assert!(scheduler.plan().is_none());
        assert!(!scheduler.is_pulse_active());
        assert!(scheduler.on_fish_bite(10, &catch, &mut rng).is_some());
    }
}
