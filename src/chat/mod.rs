//! Chat message watcher
//!
//! Recognizes the server's catch, sea creature and treasure lines so the
//! operator can get a short notification and sound for each.

use once_cell::sync::Lazy;
use regex::Regex;

static FORMAT_CODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"§[0-9a-fk-or]").expect("valid regex"));
static FISH_CAUGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^You caught an? (.+?)!$").expect("valid regex"));
static SEA_CREATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^An? (.+?) surfaces!$").expect("valid regex"));
static TREASURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^You found an? (.+?)!$").expect("valid regex"));

/// A recognized chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    FishCaught(String),
    SeaCreature(String),
    Treasure(String),
}

/// Remove `§x` formatting codes
pub fn strip_formatting(text: &str) -> String {
    FORMAT_CODES.replace_all(text, "").into_owned()
}

/// Match a chat line against the known fishing messages
pub fn parse_chat(text: &str) -> Option<ChatEvent> {
    let plain = strip_formatting(text);
    let plain = plain.trim();

    if let Some(name) = first_capture(&FISH_CAUGHT, plain) {
        Some(ChatEvent::FishCaught(name))
    } else if let Some(name) = first_capture(&SEA_CREATURE, plain) {
        Some(ChatEvent::SeaCreature(name))
    } else {
        first_capture(&TREASURE, plain).map(ChatEvent::Treasure)
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].trim().to_string())
}
