//! Random look drift
//!
//! Moves the view along curved paths around an origin captured on the first
//! movement. All targets live in origin-relative space, so yaw wrap-around
//! never stretches a movement across the whole circle.

use super::Humanizer;
use crate::config::settings::LookSettings;
use crate::game::{wrap_degrees, Orientation};
use crate::host::InputIntent;

/// Retry delay after a failed movement (ms)
pub const FAULT_RETRY_MS: u64 = 1_000;

/// Beyond this share of the radius the next target is biased back
const CENTERING_SHARE: f32 = 0.75;

/// Returns to origin closer than this are not worth a movement (degrees)
const MIN_RETURN_DISTANCE: f32 = 0.5;

/// Origin-relative view offset in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub yaw: f32,
    pub pitch: f32,
}

impl Offset {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn length(&self) -> f32 {
        (self.yaw * self.yaw + self.pitch * self.pitch).sqrt()
    }

    /// Scale down onto the circle of `radius` if outside it
    fn clamp_to(self, radius: f32) -> Self {
        let length = self.length();
        if length <= radius || length == 0.0 {
            return self;
        }
        let scale = radius / length;
        Self::new(self.yaw * scale, self.pitch * scale)
    }

    fn lerp(self, to: Offset, t: f32) -> Self {
        Self::new(self.yaw + (to.yaw - self.yaw) * t, self.pitch + (to.pitch - self.pitch) * t)
    }
}

/// One curved movement in progress
#[derive(Debug, Clone, Copy)]
struct Movement {
    start: Offset,
    control1: Offset,
    control2: Offset,
    target: Offset,
    started_at: u64,
    duration_ms: u64,
}

impl Movement {
    fn position(&self, eased: f32) -> Offset {
        Offset::new(
            cubic_bezier(self.start.yaw, self.control1.yaw, self.control2.yaw, self.target.yaw, eased),
            cubic_bezier(self.start.pitch, self.control1.pitch, self.control2.pitch, self.target.pitch, eased),
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum DriftPhase {
    Idle { next_at: Option<u64> },
    Moving(Movement),
}

/// Look drift sub-machine
#[derive(Debug, Clone)]
pub struct LookDrift {
    phase: DriftPhase,
    origin: Option<Orientation>,
    movements: u32,
}

impl Default for LookDrift {
    fn default() -> Self {
        Self::new()
    }
}

impl LookDrift {
    pub fn new() -> Self {
        Self {
            phase: DriftPhase::Idle { next_at: None },
            origin: None,
            movements: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, DriftPhase::Moving(_))
    }

    /// Origin captured on the first movement
    pub fn origin(&self) -> Option<Orientation> {
        self.origin
    }

    /// Advance one tick.
    ///
    /// `may_start` gates new movements only; a movement already under way
    /// always runs to completion.
    pub fn step(
        &mut self,
        now: u64,
        current: Orientation,
        settings: &LookSettings,
        rng: &mut Humanizer,
        may_start: bool,
    ) -> Vec<InputIntent> {
        match self.phase {
            DriftPhase::Idle { next_at: None } => {
                self.schedule_next(now, settings, rng);
                Vec::new()
            }
            DriftPhase::Idle { next_at: Some(at) } => {
                if now < at || !may_start {
                    return Vec::new();
                }
                self.start_movement(now, current, settings, rng);
                Vec::new()
            }
            DriftPhase::Moving(movement) => {
                let Some(origin) = self.origin else {
                    self.phase = DriftPhase::Idle { next_at: None };
                    return Vec::new();
                };

                let elapsed = now.saturating_sub(movement.started_at);
                let progress = if movement.duration_ms == 0 {
                    1.0
                } else {
                    (elapsed as f32 / movement.duration_ms as f32).min(1.0)
                };

                let offset = if progress >= 1.0 {
                    self.schedule_next(now, settings, rng);
                    log::debug!(
                        "Look movement complete at ({:.2}, {:.2}) from origin",
                        movement.target.yaw,
                        movement.target.pitch
                    );
                    movement.target
                } else {
                    movement.position(ease(progress, settings))
                };

                vec![InputIntent::Look(to_absolute(origin, offset))]
            }
        }
    }

    /// Abort the current movement and wait for the next scheduling
    pub fn stop(&mut self) {
        self.phase = DriftPhase::Idle { next_at: None };
    }

    /// Back to Idle after a failed movement, retrying shortly
    pub fn fault(&mut self, now: u64) {
        self.phase = DriftPhase::Idle {
            next_at: Some(now.saturating_add(FAULT_RETRY_MS)),
        };
    }

    /// Forget the origin and movement count
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn schedule_next(&mut self, now: u64, settings: &LookSettings, rng: &mut Humanizer) {
        let delay = rng.delay_between(settings.min_delay_ms, settings.max_delay_ms);
        self.phase = DriftPhase::Idle {
            next_at: Some(now.saturating_add(delay)),
        };
        log::debug!("Next look movement in {}ms", delay);
    }

    fn start_movement(&mut self, now: u64, current: Orientation, settings: &LookSettings, rng: &mut Humanizer) {
        let origin = *self.origin.get_or_insert_with(|| {
            log::debug!("Look origin set to ({:.2}, {:.2})", current.yaw, current.pitch);
            current
        });
        let fov = settings.fov_radius;
        let (yaw, pitch) = current.delta_from(&origin);
        let start = Offset::new(yaw, pitch);

        self.movements += 1;
        let mut duration_ms = settings.duration_ms;
        let target = if settings.return_to_origin_every > 0
            && self.movements >= settings.return_to_origin_every
            && start.length() >= MIN_RETURN_DISTANCE
        {
            self.movements = 0;
            duration_ms = duration_ms.saturating_mul(4) / 5;
            log::debug!("Returning look to origin");
            Offset::default()
        } else {
            pick_target(start, fov, rng)
        };
        let target = clamp_pitch(origin, target);

        let curve = rng.float_between(0.3, 1.0);
        let spread = fov * curve * 0.3;
        let control1 = control_point(start.lerp(target, 0.3), spread, rng);
        let control2 = control_point(start.lerp(target, 0.7), spread, rng);

        self.phase = DriftPhase::Moving(Movement {
            start,
            control1,
            control2,
            target,
            started_at: now,
            duration_ms,
        });
    }
}

/// Choose a random target, pulled back toward the origin when near the edge
fn pick_target(start: Offset, fov: f32, rng: &mut Humanizer) -> Offset {
    let distance_from_origin = start.length();
    let (dx, dy) = rng.direction();

    let step = if fov > 0.0 && distance_from_origin > fov * CENTERING_SHARE {
        let bias = (distance_from_origin / fov).min(1.0);
        if rng.float_between(0.0, 1.0) < bias * 0.7 {
            // Toward the origin with a small angular wobble
            let home = Offset::new(-start.yaw, -start.pitch);
            let wobble = rng.float_between(-15.0, 15.0).to_radians();
            let angle = home.pitch.atan2(home.yaw) + wobble;
            let length = rng.float_between(0.5, 1.0) * distance_from_origin.min(fov * 0.3);
            Offset::new(angle.cos() * length, angle.sin() * length)
        } else {
            let length = rng.float_between(0.0, 1.0) * fov * (1.0 - bias * 0.8);
            Offset::new(dx * length, dy * length)
        }
    } else {
        let length = rng.float_between(0.0, 1.0) * fov * 0.7;
        Offset::new(dx * length, dy * length)
    };

    Offset::new(start.yaw + step.yaw, start.pitch + step.pitch).clamp_to(fov)
}

/// Jitter a point on the straight path to bend the curve
fn control_point(base: Offset, spread: f32, rng: &mut Humanizer) -> Offset {
    Offset::new(
        base.yaw + rng.float_between(-1.0, 1.0) * spread,
        base.pitch + rng.float_between(-1.0, 1.0) * spread,
    )
}

/// Keep the absolute pitch of a target within [-90, 90]
fn clamp_pitch(origin: Orientation, target: Offset) -> Offset {
    let pitch = (origin.pitch + target.pitch).clamp(-90.0, 90.0);
    Offset::new(target.yaw, pitch - origin.pitch)
}

fn to_absolute(origin: Orientation, offset: Offset) -> Orientation {
    Orientation::new(
        wrap_degrees(origin.yaw + offset.yaw),
        (origin.pitch + offset.pitch).clamp(-90.0, 90.0),
    )
}

/// Quadratic ease-in / linear / ease-out progress curve
pub fn ease(progress: f32, settings: &LookSettings) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    if !settings.mouse_acceleration {
        return progress;
    }

    let accel = settings.accel_phase;
    let decel = settings.decel_phase;
    if accel > 0.0 && progress < accel {
        let t = progress / accel;
        t * t * accel
    } else if decel > 0.0 && progress > 1.0 - decel {
        let t = (progress - (1.0 - decel)) / decel;
        (1.0 - decel) + (1.0 - (1.0 - t) * (1.0 - t)) * decel
    } else {
        progress
    }
}

fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}
