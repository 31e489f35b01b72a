//! Detection, reaction and safety engine
//!
//! The three core state machines driven by the orchestrator once per tick.

pub mod detector;
pub mod reaction;
pub mod safety;

pub use detector::{BiteDetector, FishBite};
pub use reaction::{InputPulse, PulsePurpose, ReactionContext, ReactionPlan, ReactionScheduler};
pub use safety::{SafetyBaseline, SafetyMonitor, SafetyTrip};
