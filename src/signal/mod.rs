//! Inbound signal feed
//!
//! Decoded protocol events arrive on a network thread through a
//! [`SignalSender`]. The tick thread swaps the buffer out once per tick and
//! classifies what it finds into [`BiteSignal`]s. Classification is pure:
//! whether a signal is close enough to the hook is the detector's call.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::settings::DetectionSettings;
use crate::game::{EntityId, HookHandle, Vec3};

/// Events buffered between two ticks before new ones are dropped
pub const MAX_PENDING: usize = 1024;

/// Decoded event as delivered by the protocol layer
#[derive(Debug, Clone, PartialEq)]
pub enum RawSignal {
    Sound { pos: Vec3, name: String },
    Particle { pos: Vec3, kind: String },
    EntityVelocity { entity_id: EntityId, dy: f64 },
}

/// A signal that may indicate a bite
#[derive(Debug, Clone, PartialEq)]
pub enum BiteSignal {
    /// Splash sound somewhere in the world
    SoundSplash { pos: Vec3, name: String },
    /// Splash particles somewhere in the world
    ParticleSplash { pos: Vec3, kind: String },
    /// Server-side velocity update for an entity
    HookVelocity { entity_id: EntityId, dy: f64 },
    /// Hook vertical velocity sampled on this tick
    MotionSample { dy: f64 },
}

impl BiteSignal {
    /// Short name used in logs and notifications
    pub fn label(&self) -> &'static str {
        match self {
            BiteSignal::SoundSplash { .. } => "sound",
            BiteSignal::ParticleSplash { .. } => "particles",
            BiteSignal::HookVelocity { .. } => "velocity",
            BiteSignal::MotionSample { .. } => "motion",
        }
    }
}

type Inbox = Arc<Mutex<Vec<RawSignal>>>;

fn lock(inbox: &Inbox) -> MutexGuard<'_, Vec<RawSignal>> {
    // A panicking producer can't leave a Vec half-written
    inbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Producer handle, cheap to clone and safe to move to another thread
#[derive(Debug, Clone)]
pub struct SignalSender {
    inbox: Inbox,
}

impl SignalSender {
    /// A sound was played at `pos`
    pub fn on_sound_event(&self, pos: Vec3, name: impl Into<String>) {
        self.push(RawSignal::Sound { pos, name: name.into() });
    }

    /// A particle effect was spawned at `pos`
    pub fn on_particle_event(&self, pos: Vec3, kind: impl Into<String>) {
        self.push(RawSignal::Particle { pos, kind: kind.into() });
    }

    /// An entity's vertical velocity changed (blocks per tick)
    pub fn on_entity_velocity_changed(&self, entity_id: EntityId, dy: f64) {
        self.push(RawSignal::EntityVelocity { entity_id, dy });
    }

    fn push(&self, signal: RawSignal) {
        let mut inbox = lock(&self.inbox);
        if inbox.len() >= MAX_PENDING {
            log::trace!("Signal inbox full, dropping {:?}", signal);
            return;
        }
        inbox.push(signal);
    }
}

/// Consumer side of the signal feed
#[derive(Debug, Default)]
pub struct SignalBus {
    inbox: Inbox,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// New producer handle for this bus
    pub fn sender(&self) -> SignalSender {
        SignalSender {
            inbox: Arc::clone(&self.inbox),
        }
    }

    /// Take everything buffered since the last drain
    pub fn drain_raw(&self) -> Vec<RawSignal> {
        std::mem::take(&mut *lock(&self.inbox))
    }

    /// Take and classify everything buffered since the last drain
    pub fn drain(&self, settings: &DetectionSettings) -> Vec<BiteSignal> {
        self.drain_raw()
            .into_iter()
            .filter_map(|raw| classify(raw, settings))
            .collect()
    }

    /// Drop anything buffered
    pub fn clear(&self) {
        lock(&self.inbox).clear();
    }
}

/// Map a raw event to a bite signal, or `None` if it can't mean a bite
pub fn classify(raw: RawSignal, settings: &DetectionSettings) -> Option<BiteSignal> {
    match raw {
        RawSignal::Sound { pos, name } => {
            if matches_any(&name, &settings.splash_sounds) {
                Some(BiteSignal::SoundSplash { pos, name })
            } else {
                log::trace!("Ignoring sound {}", name);
                None
            }
        }
        RawSignal::Particle { pos, kind } => {
            if matches_any(&kind, &settings.splash_particles) {
                Some(BiteSignal::ParticleSplash { pos, kind })
            } else {
                log::trace!("Ignoring particle {}", kind);
                None
            }
        }
        RawSignal::EntityVelocity { entity_id, dy } => Some(BiteSignal::HookVelocity { entity_id, dy }),
    }
}

/// Motion sample for the hook on this tick
pub fn motion_sample(hook: &HookHandle) -> BiteSignal {
    BiteSignal::MotionSample {
        dy: hook.vertical_velocity(),
    }
}

fn matches_any(name: &str, names: &[String]) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(name))
}
