//! Centralized balance and tuning constants for Nightshift game logic.
//!
//! These values define the deterministic math for the night simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control. `NightConfig::default` exposes
//! the tunable subset; the rest are structural.

// Tick cadence -------------------------------------------------------------
pub(crate) const TICK_INTERVAL_MS: u64 = 1_000;
pub(crate) const TICKS_PER_HOUR: u32 = 60;
pub(crate) const TOTAL_HOURS: u8 = 6;

// Power model --------------------------------------------------------------
pub(crate) const START_POWER: f32 = 100.0;
pub(crate) const POWER_DRAIN_PER_UNIT: f32 = 0.12;
pub(crate) const BASE_USAGE_LEVEL: u8 = 1;
pub(crate) const POWER_OUT_ATTACK_DELAY_MS_MIN: u64 = 5_000;
pub(crate) const POWER_OUT_ATTACK_DELAY_MS_MAX: u64 = 15_000;

// Entity movement ----------------------------------------------------------
pub(crate) const MOVE_ROLL_PERIOD_TICKS: u32 = 5;
pub(crate) const AGGRESSION_MAX: u8 = 20;
pub(crate) const PEEK_STAGE_MAX: u8 = 3;

// Door contest -------------------------------------------------------------
// Breach fires on the tick the door timer first exceeds the grace value;
// eviction on the tick it first exceeds the blocked value. Grace < blocked.
pub(crate) const BREACH_GRACE_TICKS: u8 = 4;
pub(crate) const BLOCKED_EVICT_TICKS: u8 = 5;
pub(crate) const BUTTON_BREAK_CHANCE: f32 = 0.20;

// Terminal pacing ----------------------------------------------------------
pub(crate) const JUMPSCARE_HOLD_MS: u64 = 2_500;

// Static-noise signal (no gameplay effect) ---------------------------------
pub(crate) const STATIC_FLOOR: f32 = 0.3;
pub(crate) const STATIC_DECAY_PER_TICK: f32 = 0.05;
pub(crate) const STATIC_SPIKE_CAMERA_SWITCH: f32 = 0.8;
pub(crate) const STATIC_JUMPSCARE: f32 = 1.0;

// Per-entity aggression ramp: (base, ramp per night, first active night).
// Indexed by `EntityId` declaration order. Night 1 yields {3, 2, 0, 0} and
// night 2 yields {8, 7, 5, 6}.
pub(crate) const AGGRESSION_RAMP: [(u8, u8, u32); 4] = [
    (3, 5, 1), // Bandit
    (2, 5, 1), // Juno
    (5, 5, 2), // Wick
    (6, 5, 2), // Moth
];
