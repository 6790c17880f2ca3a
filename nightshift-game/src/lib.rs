//! Nightshift Game Engine
//!
//! Platform-agnostic core logic for the Nightshift survival-horror night
//! simulation. This crate provides the full tick-loop engine without UI or
//! platform-specific dependencies; the optional `async` feature adds a
//! tokio-driven real-time runner.
//!
//! A night is a discrete-time loop over a single mutable world state:
//! every tick advances the clock, drains the power budget, rolls entity
//! movement along fixed path graphs, resolves door contests, and decays
//! the ambient static signal, in that order. The presentation layer only
//! reads snapshots and issues guarded commands.

pub mod ai;
pub mod cameras;
pub mod clock;
pub mod constants;
pub mod doors;
pub mod entity;
pub mod night;
pub mod progress;
pub mod result;
pub mod rng;
#[cfg(feature = "async")]
pub mod runner;
pub mod state;

// Re-export commonly used types
pub use cameras::{Camera, CameraId, camera_map};
pub use clock::{hour_for_tick, usage_level};
pub use entity::{Entity, EntityId, Location, aggression_for_night, path_for, start_location};
pub use night::{
    Directive, NightConfig, NightConfigError, NightEvent, NightSim, POWER_OUT_ATTACKER,
    TickOutcome,
};
pub use progress::{FINAL_NIGHT, FIRST_NIGHT, ProgressStore, SessionBridge, UnlockProgress};
pub use result::{NightOutcome, NightSummary, ScoreSubmission};
pub use rng::{CountingRng, NightRng};
#[cfg(feature = "async")]
pub use runner::{NightCommand, NightRunner};
pub use state::{NightState, NightStatus, Side, SidePair};
