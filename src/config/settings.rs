//! User settings
//!
//! Every threshold and timing range the engine consumes. The engine only ever
//! reads an immutable snapshot; changes are made on a copy and swapped in
//! between ticks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Upper bound for every delay, interval and duration (24 hours)
pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

/// Main settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reeling in after a bite
    pub catch: CatchSettings,
    /// Casting the line back out
    pub recast: RecastSettings,
    /// Bite detection
    pub detection: DetectionSettings,
    /// Look drift, sneak and jump
    pub humanize: HumanizeSettings,
    /// Operator movement safety
    pub safety: SafetySettings,
    /// Chat messages and sounds
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Slower, more varied reactions with every humanization feature on
    pub fn cautious_preset() -> Self {
        let mut settings = Self {
            catch: CatchSettings {
                min_delay_ms: 250,
                max_delay_ms: 900,
                miss_chance_percent: 15,
                ..Default::default()
            },
            recast: RecastSettings {
                min_delay_ms: 400,
                max_delay_ms: 1_800,
                ..Default::default()
            },
            ..Default::default()
        };
        settings.humanize.look.enabled = true;
        settings.humanize.shift.enabled = true;
        settings.humanize.jump.enabled = true;
        settings
    }

    /// Quick reactions, no intentional misses
    pub fn fast_preset() -> Self {
        let mut settings = Self {
            catch: CatchSettings {
                min_delay_ms: 80,
                max_delay_ms: 250,
                miss_enabled: false,
                ..Default::default()
            },
            recast: RecastSettings {
                min_delay_ms: 0,
                max_delay_ms: 300,
                ..Default::default()
            },
            ..Default::default()
        };
        settings.humanize.jump.enabled = false;
        settings
    }

    /// Clamp contradictory values into a usable configuration.
    ///
    /// Returns a description of every correction made.
    pub fn validate(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();
        self.cap_durations(&mut fixes);

        fix_range("catch.delay_ms", self.catch.min_delay_ms, &mut self.catch.max_delay_ms, &mut fixes);
        fix_range(
            "catch.miss_offset_ms",
            self.catch.min_miss_offset_ms,
            &mut self.catch.max_miss_offset_ms,
            &mut fixes,
        );
        if self.catch.miss_chance_percent > 100 {
            fixes.push(format!("catch.miss_chance_percent {} -> 100", self.catch.miss_chance_percent));
            self.catch.miss_chance_percent = 100;
        }
        if self.catch.use_item_hold_ticks == 0 {
            fixes.push("catch.use_item_hold_ticks 0 -> 1".to_string());
            self.catch.use_item_hold_ticks = 1;
        }

        fix_range("recast.delay_ms", self.recast.min_delay_ms, &mut self.recast.max_delay_ms, &mut fixes);

        let detection = &mut self.detection;
        fix_range(
            "detection.cast_ignore_ms",
            detection.min_cast_ignore_ms,
            &mut detection.max_cast_ignore_ms,
            &mut fixes,
        );
        for (name, thresholds) in [("water", &mut detection.water), ("lava", &mut detection.lava)] {
            if thresholds.dip > 0.0 {
                fixes.push(format!("detection.{}.dip must be negative", name));
                thresholds.dip = -thresholds.dip;
            }
            if thresholds.pop < 0.0 {
                fixes.push(format!("detection.{}.pop must be positive", name));
                thresholds.pop = -thresholds.pop;
            }
            thresholds.stable = thresholds.stable.abs();
        }
        detection.sound_radius = detection.sound_radius.max(0.0);
        detection.particle_radius = detection.particle_radius.max(0.0);

        let humanize = &mut self.humanize;
        fix_range(
            "humanize.shift.interval_ms",
            humanize.shift.min_interval_ms,
            &mut humanize.shift.max_interval_ms,
            &mut fixes,
        );
        fix_range(
            "humanize.shift.duration_ms",
            humanize.shift.min_duration_ms,
            &mut humanize.shift.max_duration_ms,
            &mut fixes,
        );
        fix_range(
            "humanize.jump.interval_ms",
            humanize.jump.min_interval_ms,
            &mut humanize.jump.max_interval_ms,
            &mut fixes,
        );
        fix_range(
            "humanize.jump.duration_ms",
            humanize.jump.min_duration_ms,
            &mut humanize.jump.max_duration_ms,
            &mut fixes,
        );
        let look = &mut humanize.look;
        fix_range("humanize.look.delay_ms", look.min_delay_ms, &mut look.max_delay_ms, &mut fixes);
        look.fov_radius = look.fov_radius.max(0.0);
        look.accel_phase = look.accel_phase.clamp(0.0, 1.0);
        look.decel_phase = look.decel_phase.clamp(0.0, 1.0);
        let phases = look.accel_phase + look.decel_phase;
        if phases > 1.0 {
            fixes.push(format!("humanize.look phases sum to {:.2}, scaled to 1.0", phases));
            look.accel_phase /= phases;
            look.decel_phase /= phases;
        }

        self.safety.position_threshold = self.safety.position_threshold.max(0.0);
        self.safety.rotation_threshold = self.safety.rotation_threshold.max(0.0);

        for fix in &fixes {
            log::warn!("Config corrected: {}", fix);
        }
        fixes
    }

    fn cap_durations(&mut self, fixes: &mut Vec<String>) {
        let limit = MAX_DURATION_MS as i64;
        for (name, offset) in [
            ("catch.min_miss_offset_ms", &mut self.catch.min_miss_offset_ms),
            ("catch.max_miss_offset_ms", &mut self.catch.max_miss_offset_ms),
        ] {
            if offset.unsigned_abs() > MAX_DURATION_MS {
                fixes.push(format!("{} {} capped to +/-{}", name, offset, limit));
                *offset = (*offset).clamp(-limit, limit);
            }
        }

        let Self {
            catch,
            recast,
            detection,
            humanize,
            ..
        } = self;
        let durations = [
            ("catch.min_delay_ms", &mut catch.min_delay_ms),
            ("catch.max_delay_ms", &mut catch.max_delay_ms),
            ("recast.min_delay_ms", &mut recast.min_delay_ms),
            ("recast.max_delay_ms", &mut recast.max_delay_ms),
            ("recast.backup_timeout_ms", &mut recast.backup_timeout_ms),
            ("detection.cast_ignore_ms", &mut detection.cast_ignore_ms),
            ("detection.min_cast_ignore_ms", &mut detection.min_cast_ignore_ms),
            ("detection.max_cast_ignore_ms", &mut detection.max_cast_ignore_ms),
            ("detection.bite_cooldown_ms", &mut detection.bite_cooldown_ms),
            ("humanize.shift.min_interval_ms", &mut humanize.shift.min_interval_ms),
            ("humanize.shift.max_interval_ms", &mut humanize.shift.max_interval_ms),
            ("humanize.shift.min_duration_ms", &mut humanize.shift.min_duration_ms),
            ("humanize.shift.max_duration_ms", &mut humanize.shift.max_duration_ms),
            ("humanize.jump.min_interval_ms", &mut humanize.jump.min_interval_ms),
            ("humanize.jump.max_interval_ms", &mut humanize.jump.max_interval_ms),
            ("humanize.jump.min_duration_ms", &mut humanize.jump.min_duration_ms),
            ("humanize.jump.max_duration_ms", &mut humanize.jump.max_duration_ms),
            ("humanize.look.min_delay_ms", &mut humanize.look.min_delay_ms),
            ("humanize.look.max_delay_ms", &mut humanize.look.max_delay_ms),
            ("humanize.look.duration_ms", &mut humanize.look.duration_ms),
        ];
        for (name, value) in durations {
            if *value > MAX_DURATION_MS {
                fixes.push(format!("{} {} capped to {}", name, value, MAX_DURATION_MS));
                *value = MAX_DURATION_MS;
            }
        }
    }

    /// Set a single value by dotted key, e.g. `catch.min_delay_ms`.
    ///
    /// The result is validated before returning.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "catch.auto_catch" => self.catch.auto_catch = parse_flag(key, value)?,
            "catch.min_delay_ms" => self.catch.min_delay_ms = parse_value(key, value)?,
            "catch.max_delay_ms" => self.catch.max_delay_ms = parse_value(key, value)?,
            "catch.miss_enabled" => self.catch.miss_enabled = parse_flag(key, value)?,
            "catch.miss_chance_percent" => self.catch.miss_chance_percent = parse_value(key, value)?,
            "catch.min_miss_offset_ms" => self.catch.min_miss_offset_ms = parse_value(key, value)?,
            "catch.max_miss_offset_ms" => self.catch.max_miss_offset_ms = parse_value(key, value)?,
            "catch.use_item_hold_ticks" => self.catch.use_item_hold_ticks = parse_value(key, value)?,

            "recast.auto_recast" => self.recast.auto_recast = parse_flag(key, value)?,
            "recast.min_delay_ms" => self.recast.min_delay_ms = parse_value(key, value)?,
            "recast.max_delay_ms" => self.recast.max_delay_ms = parse_value(key, value)?,
            "recast.backup_timeout_ms" => self.recast.backup_timeout_ms = parse_value(key, value)?,

            "detection.packet_detection" => self.detection.packet_detection = parse_flag(key, value)?,
            "detection.motion_detection" => self.detection.motion_detection = parse_flag(key, value)?,
            "detection.cast_ignore_ms" => self.detection.cast_ignore_ms = parse_value(key, value)?,
            "detection.random_cast_ignore" => self.detection.random_cast_ignore = parse_flag(key, value)?,
            "detection.min_cast_ignore_ms" => self.detection.min_cast_ignore_ms = parse_value(key, value)?,
            "detection.max_cast_ignore_ms" => self.detection.max_cast_ignore_ms = parse_value(key, value)?,
            "detection.bite_cooldown_ms" => self.detection.bite_cooldown_ms = parse_value(key, value)?,
            "detection.sound_radius" => self.detection.sound_radius = parse_finite(key, value)?,
            "detection.particle_radius" => self.detection.particle_radius = parse_finite(key, value)?,
            "detection.velocity_threshold" => self.detection.velocity_threshold = parse_finite(key, value)?,
            "detection.min_stable_ticks" => self.detection.min_stable_ticks = parse_value(key, value)?,
            "detection.liquid_detection" => self.detection.liquid_detection = parse_flag(key, value)?,
            "detection.max_liquid_failures" => self.detection.max_liquid_failures = parse_value(key, value)?,

            "humanize.avoid_use_item_overlap" => {
                self.humanize.avoid_use_item_overlap = parse_flag(key, value)?
            }
            "humanize.shift.enabled" => self.humanize.shift.enabled = parse_flag(key, value)?,
            "humanize.shift.min_interval_ms" => self.humanize.shift.min_interval_ms = parse_value(key, value)?,
            "humanize.shift.max_interval_ms" => self.humanize.shift.max_interval_ms = parse_value(key, value)?,
            "humanize.shift.min_duration_ms" => self.humanize.shift.min_duration_ms = parse_value(key, value)?,
            "humanize.shift.max_duration_ms" => self.humanize.shift.max_duration_ms = parse_value(key, value)?,
            "humanize.jump.enabled" => self.humanize.jump.enabled = parse_flag(key, value)?,
            "humanize.jump.min_interval_ms" => self.humanize.jump.min_interval_ms = parse_value(key, value)?,
            "humanize.jump.max_interval_ms" => self.humanize.jump.max_interval_ms = parse_value(key, value)?,
            "humanize.jump.min_duration_ms" => self.humanize.jump.min_duration_ms = parse_value(key, value)?,
            "humanize.jump.max_duration_ms" => self.humanize.jump.max_duration_ms = parse_value(key, value)?,
            "humanize.look.enabled" => self.humanize.look.enabled = parse_flag(key, value)?,
            "humanize.look.fov_radius" => self.humanize.look.fov_radius = parse_finite(key, value)?,
            "humanize.look.min_delay_ms" => self.humanize.look.min_delay_ms = parse_value(key, value)?,
            "humanize.look.max_delay_ms" => self.humanize.look.max_delay_ms = parse_value(key, value)?,
            "humanize.look.duration_ms" => self.humanize.look.duration_ms = parse_value(key, value)?,
            "humanize.look.mouse_acceleration" => {
                self.humanize.look.mouse_acceleration = parse_flag(key, value)?
            }
            "humanize.look.accel_phase" => self.humanize.look.accel_phase = parse_finite(key, value)?,
            "humanize.look.decel_phase" => self.humanize.look.decel_phase = parse_finite(key, value)?,
            "humanize.look.return_to_origin_every" => {
                self.humanize.look.return_to_origin_every = parse_value(key, value)?
            }

            "safety.enabled" => self.safety.enabled = parse_flag(key, value)?,
            "safety.position_enabled" => self.safety.position_enabled = parse_flag(key, value)?,
            "safety.rotation_enabled" => self.safety.rotation_enabled = parse_flag(key, value)?,
            "safety.position_threshold" => self.safety.position_threshold = parse_finite(key, value)?,
            "safety.rotation_threshold" => self.safety.rotation_threshold = parse_finite(key, value)?,

            "notifications.enabled" => self.notifications.enabled = parse_flag(key, value)?,
            "notifications.fish_messages" => self.notifications.fish_messages = parse_flag(key, value)?,
            "notifications.sea_creature_messages" => {
                self.notifications.sea_creature_messages = parse_flag(key, value)?
            }
            "notifications.treasure_messages" => self.notifications.treasure_messages = parse_flag(key, value)?,
            "notifications.sound_on_fish" => self.notifications.sound_on_fish = parse_flag(key, value)?,
            "notifications.sound_on_sea_creature" => {
                self.notifications.sound_on_sea_creature = parse_flag(key, value)?
            }
            "notifications.debug" => self.notifications.debug = parse_flag(key, value)?,

            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        self.validate();
        Ok(())
    }
}

fn fix_range<T>(name: &str, min: T, max: &mut T, fixes: &mut Vec<String>)
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if *max < min {
        fixes.push(format!("{} max {} raised to min {}", name, max, min));
        *max = min;
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_finite<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + Into<f64> + Copy,
{
    let parsed: T = parse_value(key, value)?;
    let as_f64: f64 = parsed.into();
    if as_f64.is_finite() {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Reaction to a detected bite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchSettings {
    /// React to bites automatically
    pub auto_catch: bool,
    /// Minimum reaction delay (ms)
    pub min_delay_ms: u64,
    /// Maximum reaction delay (ms)
    pub max_delay_ms: u64,
    /// Enable intentional misses
    pub miss_enabled: bool,
    /// Chance to intentionally miss (0-100)
    pub miss_chance_percent: u32,
    /// Earliest miss offset (ms, negative = early)
    pub min_miss_offset_ms: i64,
    /// Latest miss offset (ms, positive = late)
    pub max_miss_offset_ms: i64,
    /// Ticks the use-item key is held per pulse
    pub use_item_hold_ticks: u32,
}

impl Default for CatchSettings {
    fn default() -> Self {
        Self {
            auto_catch: true,
            min_delay_ms: 80,
            max_delay_ms: 500,
            miss_enabled: true,
            miss_chance_percent: 10,
            min_miss_offset_ms: -500,
            max_miss_offset_ms: 800,
            use_item_hold_ticks: 2,
        }
    }
}

/// Casting the line back out after a catch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecastSettings {
    /// Recast automatically after reeling in
    pub auto_recast: bool,
    /// Minimum recast delay (ms)
    pub min_delay_ms: u64,
    /// Maximum recast delay (ms)
    pub max_delay_ms: u64,
    /// Force a recast when nothing happened this long after a bite (ms)
    pub backup_timeout_ms: u64,
}

impl Default for RecastSettings {
    fn default() -> Self {
        Self {
            auto_recast: true,
            min_delay_ms: 0,
            max_delay_ms: 1_000,
            backup_timeout_ms: 10_000,
        }
    }
}

/// Motion thresholds for one liquid, in blocks per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionThresholds {
    /// Below this vertical speed the hook counts as floating still
    pub stable: f64,
    /// The hook must sink faster than this (negative) ...
    pub dip: f64,
    /// ... and then rise faster than this (positive) to count as a bite
    pub pop: f64,
}

/// Bite detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Detect bites from sound, particle and velocity events
    pub packet_detection: bool,
    /// Detect bites from the hook's own motion
    pub motion_detection: bool,
    /// Ignore detections for this long after a cast (ms)
    pub cast_ignore_ms: u64,
    /// Draw the cast grace period from a range instead
    pub random_cast_ignore: bool,
    pub min_cast_ignore_ms: u64,
    pub max_cast_ignore_ms: u64,
    /// Minimum time between two bites (ms)
    pub bite_cooldown_ms: u64,
    /// Splash sounds closer than this to the hook count as a bite
    pub sound_radius: f64,
    /// Splash particles closer than this to the hook count as a bite
    pub particle_radius: f64,
    /// Hook velocity updates above this magnitude count as a bite
    pub velocity_threshold: f64,
    /// Ticks the hook must float still before a dip counts
    pub min_stable_ticks: u32,
    pub water: MotionThresholds,
    pub lava: MotionThresholds,
    /// Sound names that mean a splash
    pub splash_sounds: Vec<String>,
    /// Particle kinds that mean a splash
    pub splash_particles: Vec<String>,
    /// Give up when casts keep missing liquid
    pub liquid_detection: bool,
    /// Casts allowed to miss liquid before automation stops
    pub max_liquid_failures: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            packet_detection: true,
            motion_detection: true,
            cast_ignore_ms: 2_000,
            random_cast_ignore: false,
            min_cast_ignore_ms: 500,
            max_cast_ignore_ms: 5_000,
            bite_cooldown_ms: 1_000,
            sound_radius: 2.0,
            particle_radius: 1.5,
            velocity_threshold: 0.2,
            min_stable_ticks: 10,
            water: MotionThresholds {
                stable: 0.03,
                dip: -0.04,
                pop: 0.02,
            },
            lava: MotionThresholds {
                stable: 0.06,
                dip: -0.08,
                pop: 0.04,
            },
            splash_sounds: vec!["random.splash".to_string(), "game.player.swim.splash".to_string()],
            splash_particles: vec!["WATER_SPLASH".to_string(), "splash".to_string()],
            liquid_detection: true,
            max_liquid_failures: 2,
        }
    }
}

/// A periodic held key: wait a random interval, hold for a random duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseSettings {
    pub enabled: bool,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

/// Random look movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    pub enabled: bool,
    /// Maximum distance from the origin view, in degrees
    pub fov_radius: f32,
    /// Minimum pause between movements (ms)
    pub min_delay_ms: u64,
    /// Maximum pause between movements (ms)
    pub max_delay_ms: u64,
    /// Duration of one movement (ms)
    pub duration_ms: u64,
    /// Ease in and out of each movement
    pub mouse_acceleration: bool,
    /// Fraction of a movement spent accelerating
    pub accel_phase: f32,
    /// Fraction of a movement spent decelerating
    pub decel_phase: f32,
    /// Force a return to the origin after this many movements (0 = never)
    pub return_to_origin_every: u32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            fov_radius: 5.0,
            min_delay_ms: 1_000,
            max_delay_ms: 4_000,
            duration_ms: 500,
            mouse_acceleration: true,
            accel_phase: 0.3,
            decel_phase: 0.3,
            return_to_origin_every: 10,
        }
    }
}

/// Humanization behaviours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeSettings {
    /// Periodic sneak
    pub shift: PulseSettings,
    /// Periodic jump
    pub jump: PulseSettings,
    /// Random look drift
    pub look: LookSettings,
    /// Don't start sneak or jump while the use-item key is pulsing
    pub avoid_use_item_overlap: bool,
}

impl Default for HumanizeSettings {
    fn default() -> Self {
        Self {
            shift: PulseSettings {
                enabled: true,
                min_interval_ms: 20_000,
                max_interval_ms: 60_000,
                min_duration_ms: 2_000,
                max_duration_ms: 4_000,
            },
            jump: PulseSettings {
                enabled: true,
                min_interval_ms: 120_000,
                max_interval_ms: 240_000,
                min_duration_ms: 500,
                max_duration_ms: 500,
            },
            look: LookSettings::default(),
            avoid_use_item_overlap: true,
        }
    }
}

/// Stop automation when the operator moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub enabled: bool,
    pub position_enabled: bool,
    pub rotation_enabled: bool,
    /// Allowed movement on x or z (blocks)
    pub position_threshold: f64,
    /// Allowed rotation beyond the look drift radius (degrees)
    pub rotation_threshold: f32,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            position_enabled: true,
            rotation_enabled: true,
            position_threshold: 0.1,
            rotation_threshold: 5.0,
        }
    }
}

/// Operator-facing messages and sounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub fish_messages: bool,
    pub sea_creature_messages: bool,
    pub treasure_messages: bool,
    pub sound_on_fish: bool,
    pub sound_on_sea_creature: bool,
    /// Mirror scheduling decisions to the operator
    pub debug: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fish_messages: true,
            sea_creature_messages: true,
            treasure_messages: true,
            sound_on_fish: true,
            sound_on_sea_creature: true,
            debug: false,
        }
    }
}
