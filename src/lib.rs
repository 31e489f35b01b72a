//! AutoFish - bite detection and humanized reaction engine
//!
//! This library watches a fishing hook through a narrow host interface,
//! detects bites from packet signals and the hook's own motion, and reacts
//! with randomized reel and recast presses.
//!
//! ## Anti-Detection
//!
//! The `stealth` module adds look drift, periodic sneak and jump presses and
//! randomized timing so the automation looks less mechanical. The `engine`
//! safety monitor stops everything as soon as the operator moves.

pub mod chat;
pub mod command;
pub mod config;
pub mod engine;
pub mod game;
pub mod host;
pub mod signal;
pub mod stealth;

use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};

use crate::chat::ChatEvent;
use crate::command::{Command, ProfileAction, HELP};
use crate::config::{ProfileStore, Settings};
use crate::engine::{BiteDetector, FishBite, ReactionContext, ReactionScheduler, SafetyMonitor};
use crate::game::{FishingTracker, FishingTransition, WorldView};
use crate::host::{FeedbackSound, Host, InputKind, InputSynthesizer};
use crate::signal::{SignalBus, SignalSender};
use crate::stealth::{Behavior, HumanizationScheduler, HumanizeContext, Humanizer};

/// Prefix for operator messages
pub const TAG: &str = "[autofish]";

/// Prefix for mirrored scheduling decisions
pub const DEBUG_TAG: &str = "[autofish debug]";

/// Shown when casts keep missing liquid
pub const LIQUID_FAILURE_REASON: &str = "hook failed to land in liquid";

/// Counters for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub bites: u32,
    pub casts: u32,
    pub reels: u32,
}

/// Orchestrates detection, reaction, humanization and safety
pub struct AutoFish {
    settings: Arc<Settings>,
    enabled: bool,
    tick: u64,
    bus: SignalBus,
    detector: BiteDetector,
    reaction: ReactionScheduler,
    humanization: HumanizationScheduler,
    safety: SafetyMonitor,
    input: InputSynthesizer,
    fishing: FishingTracker,
    rng: Humanizer,
    profiles: Option<ProfileStore>,
    cast_requested: bool,
    stats: SessionStats,
}

impl AutoFish {
    /// Create a new engine with the given settings
    pub fn new(settings: Settings) -> Self {
        Self::with_humanizer(settings, Humanizer::new())
    }

    /// Create an engine with a specific random source
    pub fn with_humanizer(mut settings: Settings, rng: Humanizer) -> Self {
        settings.validate();
        Self {
            settings: Arc::new(settings),
            enabled: false,
            tick: 0,
            bus: SignalBus::new(),
            detector: BiteDetector::new(),
            reaction: ReactionScheduler::new(),
            humanization: HumanizationScheduler::new(),
            safety: SafetyMonitor::new(),
            input: InputSynthesizer::new(),
            fishing: FishingTracker::new(),
            rng,
            profiles: None,
            cast_requested: false,
            stats: SessionStats::default(),
        }
    }

    /// Attach a profile store for the `profile` commands
    pub fn with_profiles(mut self, store: ProfileStore) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Handle for the protocol thread to push decoded events
    pub fn signal_sender(&self) -> SignalSender {
        self.bus.sender()
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// Swap in a new settings snapshot, effective from the next tick
    pub fn update_settings(&mut self, mut settings: Settings) {
        settings.validate();
        self.settings = Arc::new(settings);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Ask for a cast on the next tick if no line is out
    pub fn request_cast(&mut self) {
        self.cast_requested = true;
    }

    /// Turn automation on and capture the safety baseline
    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H, now: u64) {
        if self.enabled {
            return;
        }

        self.enabled = true;
        self.detector.reset();
        self.reaction.abort();
        self.reset_humanization(host);
        self.bus.clear();

        match (host.player_position(), host.player_orientation()) {
            (Ok(position), Ok(orientation)) => self.safety.arm(position, orientation, now),
            _ => {
                log::warn!("Player unavailable, safety baseline deferred to the next tick");
                self.safety.disarm();
            }
        }

        log::info!("Auto-fishing enabled");
        host.notify_operator(&format!("{} Auto-fishing enabled", TAG));
    }

    /// Turn automation off and release every synthetic key
    pub fn disable<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.enabled {
            self.shutdown(host, "Auto-fishing disabled");
        }
    }

    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H, now: u64) {
        if self.enabled {
            self.disable(host);
        } else {
            self.enable(host, now);
        }
    }

    /// Run one tick. Never fails; faults are contained per component.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H, now: u64) {
        self.tick += 1;
        let view = match WorldView::capture(host, now, self.tick) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("Skipping tick {}: {}", self.tick, e);
                self.detector.on_read_fault();
                return;
            }
        };
        let settings = Arc::clone(&self.settings);

        if let Some(transition) = self.fishing.update(view.fishing) {
            match transition {
                FishingTransition::Cast => self.stats.casts += 1,
                FishingTransition::Reeled => self.stats.reels += 1,
            }
            log::debug!("Line {:?}", transition);
        }

        if self.enabled {
            let fov = settings.humanize.look.fov_radius;
            if let Some(reason) = self
                .safety
                .check(view.position, view.orientation, now, &settings.safety, fov)
            {
                self.shutdown(host, &format!("Auto-fishing disabled for safety: {}", reason));
                return;
            }
        }

        let mut signals = self.bus.drain(&settings.detection);
        if let Some(hook) = &view.hook {
            signals.push(signal::motion_sample(hook));
        }
        if let Some(bite) = self
            .detector
            .observe(now, view.hook.as_ref(), &signals, &settings.detection, &mut self.rng)
        {
            self.on_bite(host, &bite, &settings);
        }

        if !self.enabled {
            return;
        }

        if self.detector.liquid_failure_exceeded(&settings.detection) {
            self.shutdown(host, &format!("Auto-fishing disabled: {}", LIQUID_FAILURE_REASON));
            return;
        }

        self.run_humanization(host, &view, &settings);
        self.run_reaction(host, &view, &settings);
        self.mirror_notes(host, &settings);
    }

    /// Feed a chat line; notifies the operator about catches
    pub fn on_chat_message<H: Host + ?Sized>(&mut self, host: &mut H, text: &str) -> Option<ChatEvent> {
        let notifications = &self.settings.notifications;
        if !notifications.enabled {
            return None;
        }

        let event = chat::parse_chat(text)?;
        match &event {
            ChatEvent::FishCaught(name) => {
                if notifications.fish_messages {
                    host.notify_operator(&format!("{} Caught: {}", TAG, name));
                }
            }
            ChatEvent::SeaCreature(name) => {
                if notifications.sea_creature_messages {
                    host.notify_operator(&format!("{} Sea creature: {}", TAG, name));
                }
                if notifications.sound_on_sea_creature {
                    host.play_feedback_sound(FeedbackSound::SeaCreature);
                }
            }
            ChatEvent::Treasure(name) => {
                if notifications.treasure_messages {
                    host.notify_operator(&format!("{} Treasure: {}", TAG, name));
                }
                host.play_feedback_sound(FeedbackSound::Treasure);
            }
        }
        Some(event)
    }

    /// Parse and run a command line, returning the reply
    pub fn run_command<H: Host + ?Sized>(&mut self, host: &mut H, line: &str, now: u64) -> Vec<String> {
        match Command::parse(line) {
            Ok(command) => self.execute(host, command, now),
            Err(e) => vec![e.to_string(), format!("Try {} help", command::PREFIX)],
        }
    }

    /// Run a parsed command between ticks
    pub fn execute<H: Host + ?Sized>(&mut self, host: &mut H, command: Command, now: u64) -> Vec<String> {
        match command {
            Command::Enable => {
                self.enable(host, now);
                vec!["Auto-fishing enabled".to_string()]
            }
            Command::Disable => {
                self.disable(host);
                vec!["Auto-fishing disabled".to_string()]
            }
            Command::Toggle => {
                self.toggle(host, now);
                let state = if self.enabled { "enabled" } else { "disabled" };
                vec![format!("Auto-fishing {}", state)]
            }
            Command::Feature(behavior, on) => {
                let mut next = (*self.settings).clone();
                match behavior {
                    Behavior::Look => next.humanize.look.enabled = on,
                    Behavior::Sneak => next.humanize.shift.enabled = on,
                    Behavior::Jump => next.humanize.jump.enabled = on,
                }
                self.update_settings(next);
                vec![format!("{:?} {}", behavior, if on { "enabled" } else { "disabled" })]
            }
            Command::Set { key, value } => {
                let mut next = (*self.settings).clone();
                match next.set_value(&key, &value) {
                    Ok(()) => {
                        self.update_settings(next);
                        vec![format!("{} = {}", key, value)]
                    }
                    Err(e) => vec![e.to_string()],
                }
            }
            Command::Profile(action) => self.run_profile(action),
            Command::Cast => {
                self.request_cast();
                vec!["Casting if no line is out".to_string()]
            }
            Command::Status => self.status(),
            Command::Help => HELP.iter().map(|line| line.to_string()).collect(),
        }
    }

    /// Human-readable state summary
    pub fn status(&self) -> Vec<String> {
        let on_off = |on: bool| if on { "on" } else { "off" };
        let humanize = &self.settings.humanize;
        let safety = match (self.safety.tripped(), self.safety.baseline()) {
            (Some(reason), _) => format!("tripped ({})", reason),
            (None, Some(_)) => "armed".to_string(),
            (None, None) => "not armed".to_string(),
        };

        vec![
            format!("Automation: {}", on_off(self.enabled)),
            format!("Line out: {}", on_off(self.fishing.fishing)),
            format!(
                "Bites: {}, casts: {}, reels: {}",
                self.stats.bites, self.stats.casts, self.stats.reels
            ),
            format!(
                "Humanization: look {}, sneak {}, jump {}",
                on_off(humanize.look.enabled),
                on_off(humanize.shift.enabled),
                on_off(humanize.jump.enabled)
            ),
            format!("Safety: {}", safety),
            format!(
                "Liquid failures: {}/{}",
                self.detector.liquid_failures(),
                self.settings.detection.max_liquid_failures
            ),
            format!("Presses sent: {}", self.input.pulses_emitted()),
        ]
    }

    fn run_profile(&mut self, action: ProfileAction) -> Vec<String> {
        let Some(store) = self.profiles.clone() else {
            return vec!["Profiles are not configured".to_string()];
        };

        let result = match action {
            ProfileAction::List => store.list().map(|names| {
                if names.is_empty() {
                    "No saved profiles".to_string()
                } else {
                    format!("Profiles: {}", names.join(", "))
                }
            }),
            ProfileAction::Save(name) => store
                .save(&name, &self.settings)
                .map(|()| format!("Saved profile {}", name)),
            ProfileAction::Load(name) => store.load(&name).map(|settings| {
                self.update_settings(settings);
                format!("Loaded profile {}", name)
            }),
            ProfileAction::Delete(name) => store.delete(&name).map(|()| format!("Deleted profile {}", name)),
        };

        match result {
            Ok(reply) => vec![reply],
            Err(e) => {
                log::warn!("Profile command failed: {}", e);
                vec![e.to_string()]
            }
        }
    }

    fn on_bite<H: Host + ?Sized>(&mut self, host: &mut H, bite: &FishBite, settings: &Settings) {
        self.stats.bites += 1;

        let notifications = &settings.notifications;
        if notifications.enabled && notifications.fish_messages {
            host.notify_operator(&format!("{} Fish on the hook!", TAG));
        }
        if notifications.enabled && notifications.sound_on_fish {
            host.play_feedback_sound(FeedbackSound::FishBite);
        }

        if self.enabled && settings.catch.auto_catch {
            self.reaction
                .on_fish_bite(bite.detected_at, &settings.catch, &mut self.rng);
        }
    }

    fn run_humanization<H: Host + ?Sized>(&mut self, host: &mut H, view: &WorldView, settings: &Settings) {
        let ctx = HumanizeContext {
            now: view.now,
            orientation: view.orientation,
            rod_engaged: view.is_rod_engaged(),
            use_item_busy: self.reaction.is_pulse_active(),
        };

        for behavior in Behavior::ALL {
            let intents = self
                .humanization
                .step(behavior, &ctx, &settings.humanize, &mut self.rng);
            if let Err(e) = self.input.apply_all(host, &intents) {
                log::warn!("{:?} input failed: {}", behavior, e);
                self.humanization.fault(behavior, view.now);
                if let Some(key) = behavior.key() {
                    self.input.force_release(host, key);
                }
            }
        }
    }

    fn run_reaction<H: Host + ?Sized>(&mut self, host: &mut H, view: &WorldView, settings: &Settings) {
        let ctx = ReactionContext {
            now: view.now,
            tick: view.tick,
            fishing: view.fishing,
            holding_rod: view.holding_rod,
            jump_active: self.humanization.is_jump_active(),
        };

        let mut intents = self
            .reaction
            .tick(&ctx, &settings.catch, &settings.recast, &mut self.rng);
        if std::mem::take(&mut self.cast_requested) {
            intents.extend(self.reaction.cast_if_needed(&ctx, &settings.catch));
        }

        if let Err(e) = self.input.apply_all(host, &intents) {
            log::warn!("Use-item input failed: {}", e);
            self.reaction.abort();
            self.input.force_release(host, InputKind::UseItem);
        }
    }

    fn mirror_notes<H: Host + ?Sized>(&mut self, host: &mut H, settings: &Settings) {
        let notes = self.reaction.take_notes();
        if settings.notifications.debug {
            for note in notes {
                host.notify_operator(&format!("{} {}", DEBUG_TAG, note));
            }
        }
    }

    /// Idle every behaviour and release the keys they held
    fn reset_humanization<H: Host + ?Sized>(&mut self, host: &mut H) {
        let releases = self.humanization.reset();
        if let Err(e) = self.input.apply_all(host, &releases) {
            log::warn!("Releasing humanization keys failed: {}", e);
            self.input.release_all(host);
        }
    }

    /// Stop everything in one go: plan, humanization, held keys
    fn shutdown<H: Host + ?Sized>(&mut self, host: &mut H, message: &str) {
        self.enabled = false;
        self.cast_requested = false;
        self.reaction.abort();
        self.reaction.take_notes();
        self.reset_humanization(host);
        self.input.force_release(host, InputKind::UseItem);

        log::info!("{}", message);
        host.notify_operator(&format!("{} {}", TAG, message));
    }
}

/// Global AutoFish instance for host adapters that only get callbacks
static AUTOFISH_INSTANCE: OnceCell<Mutex<AutoFish>> = OnceCell::new();

/// Initialize the global AutoFish instance. Returns false if already set.
pub fn init_autofish(settings: Settings) -> bool {
    AUTOFISH_INSTANCE.set(Mutex::new(AutoFish::new(settings))).is_ok()
}

/// Get a reference to the global AutoFish instance
pub fn get_autofish() -> Option<&'static Mutex<AutoFish>> {
    AUTOFISH_INSTANCE.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::MAX_DURATION_MS;
    use crate::game::{HookHandle, LiquidKind, Vec3};
    use crate::host::mock::{HostCall, MockHost};

    const HOOK_ID: i32 = 7;
    const TICK_MS: u64 = 50;

    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.humanize.shift.enabled = false;
        settings.humanize.jump.enabled = false;
        settings.catch.miss_enabled = false;
        settings
    }

    fn engine(settings: Settings) -> AutoFish {
        AutoFish::with_humanizer(settings, Humanizer::seeded(42))
    }

    fn water_hook() -> HookHandle {
        HookHandle::new(HOOK_ID, Vec3::new(0.0, 62.0, 3.0), 0.0, LiquidKind::Water)
    }

    fn fishing_host() -> MockHost {
        let mut host = MockHost::new();
        host.fishing = true;
        host.hook = Some(water_hook());
        host
    }

    /// Tick `count` times from `now`, returning the time after the last tick
    fn run(af: &mut AutoFish, host: &mut MockHost, now: u64, count: usize) -> u64 {
        let mut now = now;
        for _ in 0..count {
            af.tick(host, now);
            now += TICK_MS;
        }
        now
    }

    #[test]
    fn test_bite_reel_recast_cycle() {
        let mut host = fishing_host();
        let mut af = engine(quiet_settings());
        af.enable(&mut host, 0);
        let sender = af.signal_sender();

        let mut now = run(&mut af, &mut host, 0, 60);
        sender.on_entity_velocity_changed(HOOK_ID, -0.5);
        now = run(&mut af, &mut host, now, 1);
        assert_eq!(af.stats().bites, 1);
        assert!(host.messages.iter().any(|m| m.contains("Fish on the hook")));
        assert_eq!(host.sounds, vec![FeedbackSound::FishBite]);

        let mut seen = 0;
        for _ in 0..80 {
            af.tick(&mut host, now);
            now += TICK_MS;
            let pulses = host.pulses(InputKind::UseItem);
            if pulses != seen {
                seen = pulses;
                // The press lands: the line flips in or out
                host.fishing = !host.fishing;
                host.hook = if host.fishing { Some(water_hook()) } else { None };
            }
        }

        assert_eq!(host.pulses(InputKind::UseItem), 2);
        assert!(host.fishing);
        assert!(af.is_enabled());
    }

    #[test]
    fn test_safety_trip_stops_everything() {
        let mut settings = quiet_settings();
        settings.humanize.shift.enabled = true;
        settings.humanize.shift.min_interval_ms = 100;
        settings.humanize.shift.max_interval_ms = 100;

        let mut host = fishing_host();
        host.position = (100.0, 200.0);
        let mut af = engine(settings);
        af.enable(&mut host, 0);

        let now = run(&mut af, &mut host, 0, 5);
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::Sneak, true)));

        host.position = (100.2, 200.0);
        af.tick(&mut host, now);

        assert!(!af.is_enabled());
        assert!(host.messages.last().unwrap().contains("movement detected"));
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::Sneak, false)));
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::UseItem, false)));
        assert!(af.reaction.plan().is_none());
        assert!(!af.humanization.is_active(Behavior::Sneak));

        // Stays off even once the player is back in place
        host.position = (100.0, 200.0);
        run(&mut af, &mut host, now + TICK_MS, 5);
        assert!(!af.is_enabled());
        assert!(af.status().iter().any(|l| l.contains("tripped (movement detected)")));
    }

    #[test]
    fn test_read_fault_skips_tick() {
        let mut host = fishing_host();
        let mut af = engine(quiet_settings());
        af.enable(&mut host, 0);

        host.fail_reads = true;
        run(&mut af, &mut host, 0, 10);

        assert!(af.is_enabled());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_sneak_fault_is_isolated() {
        let mut settings = quiet_settings();
        settings.humanize.shift.enabled = true;
        settings.humanize.jump.enabled = true;
        for pulse in [&mut settings.humanize.shift, &mut settings.humanize.jump] {
            pulse.min_interval_ms = 100;
            pulse.max_interval_ms = 100;
        }

        let mut host = fishing_host();
        host.fail_kind = Some(InputKind::Sneak);
        let mut af = engine(settings);
        af.enable(&mut host, 0);
        run(&mut af, &mut host, 0, 5);

        assert!(af.is_enabled());
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::Jump, true)));
        assert!(!host.calls.contains(&HostCall::KeyState(InputKind::Sneak, true)));
        assert!(!af.humanization.is_active(Behavior::Sneak));
        assert!(af.humanization.is_jump_active());
    }

    #[test]
    fn test_use_item_fault_aborts_reaction() {
        let mut host = fishing_host();
        host.fail_kind = Some(InputKind::UseItem);
        let mut af = engine(quiet_settings());
        af.enable(&mut host, 0);
        let sender = af.signal_sender();

        let now = run(&mut af, &mut host, 0, 60);
        sender.on_entity_velocity_changed(HOOK_ID, -0.5);
        run(&mut af, &mut host, now, 20);

        assert_eq!(af.stats().bites, 1);
        assert_eq!(host.pulses(InputKind::UseItem), 0);
        assert!(af.reaction.plan().is_none());
        assert!(!af.reaction.is_pulse_active());
        assert!(af.is_enabled());
    }

    #[test]
    fn test_liquid_failures_disable() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());
        af.enable(&mut host, 0);

        let mut now = 0;
        for _ in 0..3 {
            host.hook = Some(HookHandle::new(HOOK_ID, Vec3::default(), 0.0, LiquidKind::None));
            now = run(&mut af, &mut host, now, 2);
            host.hook = None;
            now = run(&mut af, &mut host, now, 1);
        }

        assert!(!af.is_enabled());
        assert!(host.messages.last().unwrap().contains(LIQUID_FAILURE_REASON));
    }

    #[test]
    fn test_bite_while_disabled_only_notifies() {
        let mut host = fishing_host();
        let mut af = engine(quiet_settings());
        let sender = af.signal_sender();

        let now = run(&mut af, &mut host, 0, 60);
        sender.on_entity_velocity_changed(HOOK_ID, -0.5);
        run(&mut af, &mut host, now, 20);

        assert_eq!(af.stats().bites, 1);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_debug_mirrors_decisions() {
        let mut settings = quiet_settings();
        settings.notifications.debug = true;
        let mut host = fishing_host();
        let mut af = engine(settings);
        af.enable(&mut host, 0);
        let sender = af.signal_sender();

        let now = run(&mut af, &mut host, 0, 60);
        sender.on_entity_velocity_changed(HOOK_ID, -0.5);
        run(&mut af, &mut host, now, 1);

        assert!(host
            .messages
            .iter()
            .any(|m| m.starts_with(DEBUG_TAG) && m.contains("Scheduled catch")));
    }

    #[test]
    fn test_disable_releases_keys() {
        let mut settings = quiet_settings();
        settings.humanize.shift.enabled = true;
        settings.humanize.shift.min_interval_ms = 100;
        settings.humanize.shift.max_interval_ms = 100;

        let mut host = fishing_host();
        let mut af = engine(settings);
        af.enable(&mut host, 0);
        let now = run(&mut af, &mut host, 0, 5);
        assert!(af.humanization.is_active(Behavior::Sneak));

        host.calls.clear();
        af.disable(&mut host);
        af.tick(&mut host, now);

        assert!(!af.is_enabled());
        assert_eq!(
            host.calls,
            vec![
                HostCall::KeyState(InputKind::Sneak, false),
                HostCall::KeyState(InputKind::UseItem, false),
            ]
        );
    }

    #[test]
    fn test_failed_release_falls_back_to_every_key() {
        let mut settings = quiet_settings();
        settings.humanize.shift.enabled = true;
        settings.humanize.shift.min_interval_ms = 100;
        settings.humanize.shift.max_interval_ms = 100;

        let mut host = fishing_host();
        let mut af = engine(settings);
        af.enable(&mut host, 0);
        run(&mut af, &mut host, 0, 5);

        host.fail_kind = Some(InputKind::Sneak);
        host.calls.clear();
        af.disable(&mut host);

        assert!(!af.humanization.is_active(Behavior::Sneak));
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::Jump, false)));
        assert!(host.calls.contains(&HostCall::KeyState(InputKind::UseItem, false)));
    }

    #[test]
    fn test_extreme_timing_settings_never_panic() {
        let mut host = fishing_host();
        let mut af = engine(quiet_settings());
        for line in [
            "set catch.max_delay_ms 18446744073709551615",
            "set catch.min_delay_ms 18446744073709551615",
            "set catch.min_miss_offset_ms -9223372036854775808",
            "set catch.miss_enabled off",
            "set recast.max_delay_ms 18446744073709551615",
            "set humanize.shift.enabled on",
            "set humanize.shift.max_interval_ms 18446744073709551615",
            "set humanize.shift.min_interval_ms 18446744073709551615",
            "set humanize.jump.enabled on",
            "set humanize.jump.max_duration_ms 18446744073709551615",
            "set humanize.look.max_delay_ms 18446744073709551615",
        ] {
            af.run_command(&mut host, line, 0);
        }
        assert_eq!(af.settings().catch.max_delay_ms, MAX_DURATION_MS);
        assert_eq!(af.settings().humanize.shift.min_interval_ms, MAX_DURATION_MS);

        af.enable(&mut host, 0);
        let sender = af.signal_sender();
        let now = run(&mut af, &mut host, 0, 60);
        sender.on_entity_velocity_changed(HOOK_ID, -0.5);
        run(&mut af, &mut host, now, 5);

        assert_eq!(af.stats().bites, 1);
        assert!(af.is_enabled());
        let catch_at = af.reaction.plan().and_then(|p| p.catch_at);
        assert_eq!(catch_at, Some(now + MAX_DURATION_MS));
        assert_eq!(af.settings().catch.min_miss_offset_ms, -(MAX_DURATION_MS as i64));
        assert!(!af.humanization.is_active(Behavior::Sneak));

        // Ticks far in the future still behave
        run(&mut af, &mut host, u64::MAX - 10 * TICK_MS, 5);
        assert!(af.is_enabled());
    }

    #[test]
    fn test_requested_cast() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());
        af.enable(&mut host, 0);

        assert_eq!(af.run_command(&mut host, "/autofish cast", 0).len(), 1);
        af.tick(&mut host, 50);
        assert_eq!(host.calls, vec![HostCall::Pulse(InputKind::UseItem, 2)]);
    }

    #[test]
    fn test_chat_notifications() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());

        let event = af.on_chat_message(&mut host, "§aA Squid surfaces!");
        assert_eq!(event, Some(ChatEvent::SeaCreature("Squid".into())));
        assert_eq!(host.sounds, vec![FeedbackSound::SeaCreature]);
        assert!(host.messages[0].contains("Sea creature: Squid"));

        assert!(af.on_chat_message(&mut host, "hello").is_none());
    }

    #[test]
    fn test_commands_swap_settings() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());
        let before = af.settings();

        af.run_command(&mut host, "/autofish set catch.min_delay_ms 150", 0);
        af.run_command(&mut host, "/autofish look on", 0);

        assert_eq!(before.catch.min_delay_ms, 80);
        assert_eq!(af.settings().catch.min_delay_ms, 150);
        assert!(af.settings().humanize.look.enabled);

        let reply = af.run_command(&mut host, "/autofish set nope 1", 0);
        assert!(reply[0].contains("Unknown setting"));
        let reply = af.run_command(&mut host, "/autofish dance", 0);
        assert!(reply[0].contains("Unknown command"));
    }

    #[test]
    fn test_toggle_command() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());

        af.run_command(&mut host, "toggle", 0);
        assert!(af.is_enabled());
        af.run_command(&mut host, "toggle", 0);
        assert!(!af.is_enabled());
    }

    #[test]
    fn test_profile_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings()).with_profiles(ProfileStore::new(dir.path()));

        af.run_command(&mut host, "set catch.max_delay_ms 700", 0);
        assert_eq!(af.run_command(&mut host, "profile save slow", 0), vec!["Saved profile slow"]);
        af.run_command(&mut host, "set catch.max_delay_ms 300", 0);

        af.run_command(&mut host, "profile load slow", 0);
        assert_eq!(af.settings().catch.max_delay_ms, 700);
        assert_eq!(af.run_command(&mut host, "profile list", 0), vec!["Profiles: slow"]);

        af.run_command(&mut host, "profile delete slow", 0);
        assert_eq!(af.run_command(&mut host, "profile list", 0), vec!["No saved profiles"]);
    }

    #[test]
    fn test_profiles_unconfigured() {
        let mut host = MockHost::new();
        let mut af = engine(quiet_settings());
        assert_eq!(
            af.run_command(&mut host, "profile list", 0),
            vec!["Profiles are not configured"]
        );
    }

    #[test]
    fn test_global_instance() {
        assert!(init_autofish(Settings::default()));
        assert!(!init_autofish(Settings::default()));
        assert!(get_autofish().is_some());
    }
}
