//! AutoFish CLI - simulated fishing session
//!
//! Runs the engine against an in-process host so the detection and reaction
//! timing can be watched on desktop without a game client.

use std::thread;

use autofish::config::Settings;
use autofish::game::{EntityId, HookHandle, LiquidKind, Orientation, Vec3};
use autofish::host::{FeedbackSound, Host, HostError, InputKind};
use autofish::AutoFish;

const TICK_MS: u64 = 50;
const SESSION_MS: u64 = 45_000;
/// How long a fish takes to bite after each cast
const BITE_AFTER_MS: u64 = 6_000;
const HOOK_POS: Vec3 = Vec3::new(12.5, 62.9, -4.5);

/// A tiny stand-in for the game client
struct SimHost {
    now: u64,
    hook: Option<HookHandle>,
    next_hook_id: EntityId,
    cast_at: Option<u64>,
    bite_sent: bool,
    orientation: Orientation,
}

impl SimHost {
    fn new() -> Self {
        Self {
            now: 0,
            hook: None,
            next_hook_id: 100,
            cast_at: None,
            bite_sent: false,
            orientation: Orientation::new(90.0, 10.0),
        }
    }

    fn use_item(&mut self) {
        if self.hook.take().is_some() {
            println!("[{:>6}ms] line reeled in", self.now);
            self.cast_at = None;
        } else {
            self.next_hook_id += 1;
            self.hook = Some(HookHandle::new(self.next_hook_id, HOOK_POS, 0.0, LiquidKind::Water));
            self.cast_at = Some(self.now);
            self.bite_sent = false;
            println!("[{:>6}ms] line cast (hook #{})", self.now, self.next_hook_id);
        }
    }

    /// Whether a scripted bite is due this tick
    fn bite_due(&mut self) -> bool {
        match self.cast_at {
            Some(at) if !self.bite_sent && self.now >= at + BITE_AFTER_MS => {
                self.bite_sent = true;
                true
            }
            _ => false,
        }
    }
}

impl Host for SimHost {
    fn tracked_hook(&self) -> Result<Option<HookHandle>, HostError> {
        Ok(self.hook)
    }

    fn is_player_fishing(&self) -> Result<bool, HostError> {
        Ok(self.hook.is_some())
    }

    fn is_holding_fishing_tool(&self) -> Result<bool, HostError> {
        Ok(true)
    }

    fn player_position(&self) -> Result<(f64, f64), HostError> {
        Ok((12.5, -1.5))
    }

    fn player_orientation(&self) -> Result<Orientation, HostError> {
        Ok(self.orientation)
    }

    fn emit_input_pulse(&mut self, kind: InputKind, duration_ticks: u32) -> Result<(), HostError> {
        println!("[{:>6}ms] press {:?} for {} ticks", self.now, kind, duration_ticks);
        if kind == InputKind::UseItem {
            self.use_item();
        }
        Ok(())
    }

    fn set_held_key_state(&mut self, kind: InputKind, pressed: bool) -> Result<(), HostError> {
        let state = if pressed { "down" } else { "up" };
        println!("[{:>6}ms] {:?} {}", self.now, kind, state);
        Ok(())
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), HostError> {
        self.orientation = orientation;
        Ok(())
    }

    fn notify_operator(&mut self, text: &str) {
        println!("[{:>6}ms] {}", self.now, text);
    }

    fn play_feedback_sound(&mut self, sound: FeedbackSound) {
        println!("[{:>6}ms] *{:?} sound*", self.now, sound);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("AutoFish - bite detection and humanized reactions");
    println!("=================================================");
    println!();

    let mut settings = Settings::default();
    settings.humanize.look.enabled = true;
    let mut autofish = AutoFish::new(settings);
    let mut host = SimHost::new();

    println!("Current Configuration:");
    let settings = autofish.settings();
    println!(
        "  - Catch delay: {}-{}ms (miss chance {}%)",
        settings.catch.min_delay_ms, settings.catch.max_delay_ms, settings.catch.miss_chance_percent
    );
    println!(
        "  - Recast delay: {}-{}ms",
        settings.recast.min_delay_ms, settings.recast.max_delay_ms
    );
    println!(
        "  - Look drift: {} (radius {})",
        settings.humanize.look.enabled, settings.humanize.look.fov_radius
    );
    println!();

    for line in autofish.run_command(&mut host, "/autofish on", 0) {
        println!("> {}", line);
    }
    autofish.run_command(&mut host, "/autofish cast", 0);

    let sender = autofish.signal_sender();
    while host.now < SESSION_MS {
        if host.bite_due() {
            // Splash packets arrive on the network thread
            let sender = sender.clone();
            let splash = thread::spawn(move || sender.on_sound_event(HOOK_POS, "random.splash"));
            if splash.join().is_err() {
                log::error!("Network thread panicked");
            }
        }

        let now = host.now;
        let was_fishing = host.hook.is_some();
        autofish.tick(&mut host, now);
        if was_fishing && host.hook.is_none() {
            autofish.on_chat_message(&mut host, "§aYou caught a §9Raw Cod§a!");
        }

        host.now += TICK_MS;
    }

    autofish.disable(&mut host);
    println!();
    for line in autofish.status() {
        println!("  {}", line);
    }
}
