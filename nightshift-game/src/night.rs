//! The night simulation engine: stage-ordered tick kernel, terminal
//! transitions, and the deferred directives for the two wall-clock timers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::ai;
use crate::cameras::CameraId;
use crate::clock;
use crate::constants::{
    BLOCKED_EVICT_TICKS, BREACH_GRACE_TICKS, BUTTON_BREAK_CHANCE, JUMPSCARE_HOLD_MS,
    MOVE_ROLL_PERIOD_TICKS, POWER_DRAIN_PER_UNIT, POWER_OUT_ATTACK_DELAY_MS_MAX,
    POWER_OUT_ATTACK_DELAY_MS_MIN, STATIC_DECAY_PER_TICK, STATIC_FLOOR, STATIC_JUMPSCARE,
    TICK_INTERVAL_MS, TICKS_PER_HOUR, TOTAL_HOURS,
};
use crate::doors;
use crate::entity::{EntityId, Location};
use crate::result::{NightOutcome, NightSummary};
use crate::rng::NightRng;
use crate::state::{NightState, NightStatus, Side};

/// Entity blamed when the lights go out for good.
pub const POWER_OUT_ATTACKER: EntityId = EntityId::Bandit;

/// Tunable constants for one night. `Default` is the shipped balance;
/// `validate` keeps the relative invariants intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightConfig {
    /// Wall-clock tick period driven by the runner.
    pub tick_interval_ms: u64,
    pub ticks_per_hour: u32,
    pub total_hours: u8,
    pub drain_per_unit: f32,
    /// Movement rolls run every Nth tick.
    pub move_roll_period: u32,
    /// Open-door grace before a breach fires.
    pub breach_grace_ticks: u8,
    /// Closed-door grace before the entity gives up.
    pub blocked_evict_ticks: u8,
    pub button_break_chance: f32,
    pub power_out_delay_ms: (u64, u64),
    pub jumpscare_hold_ms: u64,
}

impl Default for NightConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            ticks_per_hour: TICKS_PER_HOUR,
            total_hours: TOTAL_HOURS,
            drain_per_unit: POWER_DRAIN_PER_UNIT,
            move_roll_period: MOVE_ROLL_PERIOD_TICKS,
            breach_grace_ticks: BREACH_GRACE_TICKS,
            blocked_evict_ticks: BLOCKED_EVICT_TICKS,
            button_break_chance: BUTTON_BREAK_CHANCE,
            power_out_delay_ms: (POWER_OUT_ATTACK_DELAY_MS_MIN, POWER_OUT_ATTACK_DELAY_MS_MAX),
            jumpscare_hold_ms: JUMPSCARE_HOLD_MS,
        }
    }
}

impl NightConfig {
    /// Check the cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns an error when a cadence is zero or the breach grace is not
    /// strictly below the blocked-eviction grace.
    pub fn validate(&self) -> Result<(), NightConfigError> {
        if self.tick_interval_ms == 0 || self.move_roll_period == 0 {
            return Err(NightConfigError::ZeroTickCadence);
        }
        if self.ticks_per_hour == 0 || self.total_hours == 0 {
            return Err(NightConfigError::ZeroHourLength);
        }
        if self.breach_grace_ticks >= self.blocked_evict_ticks {
            return Err(NightConfigError::BreachNotBelowBlocked);
        }
        if !(0.0..=1.0).contains(&self.button_break_chance) {
            return Err(NightConfigError::ChanceOutOfRange);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NightConfigError {
    #[error("tick cadence values must be non-zero")]
    ZeroTickCadence,
    #[error("hour length and hour count must be non-zero")]
    ZeroHourLength,
    #[error("breach grace must be strictly below the blocked-eviction grace")]
    BreachNotBelowBlocked,
    #[error("button break chance must lie in [0, 1]")]
    ChanceOutOfRange,
    #[error("night index must be positive")]
    InvalidNight,
}

/// Something observable happened during a tick; consumed by the
/// presentation layer for audio/visual cues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NightEvent {
    HourAdvanced { hour: u8 },
    NightWon,
    PowerOut,
    EntityAdvanced { id: EntityId, to: Location },
    EntityPeeked { id: EntityId, stage: u8 },
    EntityEvicted { id: EntityId },
    DoorControlsBroken { side: Side },
    BreachDeclared { id: EntityId },
}

/// A deferred wall-clock task the engine asks its driver to schedule. Both
/// resolutions re-check the live status on fire, so a stale timer is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// After the delay, call [`NightSim::resolve_power_out_attack`].
    SchedulePowerOutAttack { delay_ms: u64 },
    /// After the delay, call [`NightSim::settle_game_over`].
    ScheduleGameOverHold { delay_ms: u64 },
}

/// Result of one `step` (or of a deferred resolution).
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: SmallVec<[NightEvent; 4]>,
    pub directives: SmallVec<[Directive; 2]>,
}

impl TickOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.directives.is_empty()
    }
}

/// One live night: canonical world state plus the RNG bundle and config.
/// All mutation flows through `step`, the command methods, and the two
/// deferred resolutions.
#[derive(Debug)]
pub struct NightSim {
    cfg: NightConfig,
    state: NightState,
    rng: NightRng,
    power_attack_pending: bool,
}

impl NightSim {
    /// Start a fresh night.
    ///
    /// # Errors
    ///
    /// Returns an error for night zero or an invalid config.
    pub fn start(night: u32, cfg: NightConfig, rng: NightRng) -> Result<Self, NightConfigError> {
        if night == 0 {
            return Err(NightConfigError::InvalidNight);
        }
        cfg.validate()?;
        Ok(Self {
            state: NightState::for_night(night),
            cfg,
            rng,
            power_attack_pending: false,
        })
    }

    /// Start with the shipped balance and an entropy-seeded RNG bundle.
    ///
    /// # Errors
    ///
    /// Returns an error for night zero.
    pub fn start_default(night: u32) -> Result<Self, NightConfigError> {
        Self::start(night, NightConfig::default(), NightRng::from_entropy())
    }

    #[must_use]
    pub const fn state(&self) -> &NightState {
        &self.state
    }

    /// Borrow the underlying mutable world state. Test harnesses use this
    /// to stage scenarios; live drivers should stick to commands.
    pub const fn state_mut(&mut self) -> &mut NightState {
        &mut self.state
    }

    #[must_use]
    pub const fn config(&self) -> &NightConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn status(&self) -> NightStatus {
        self.state.status
    }

    /// Advance the simulation by one tick, applying the stages in their
    /// contractual order: clock, power, movement, door contests, static
    /// decay. A terminal transition inside a stage skips the rest.
    pub fn step(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state.status != NightStatus::Playing {
            return outcome;
        }
        self.state.elapsed_ticks += 1;

        // 1. Clock: the win clamp beats every other stage this tick.
        if clock::advance_clock(&mut self.state, &self.cfg) {
            self.state.status = NightStatus::Win;
            outcome.events.push(NightEvent::NightWon);
            return outcome;
        }
        if self.state.elapsed_ticks % u64::from(self.cfg.ticks_per_hour) == 0 {
            outcome.events.push(NightEvent::HourAdvanced {
                hour: self.state.hour,
            });
        }

        // 2. Power drain and power-out detection. Power-out suppresses
        // movement and door resolution from this very tick.
        if !self.state.power_out && clock::drain_power(&mut self.state, &self.cfg) {
            self.state.power_out = true;
            self.state.shed_all_loads();
            outcome.events.push(NightEvent::PowerOut);
            if !self.power_attack_pending {
                self.power_attack_pending = true;
                let (min_ms, max_ms) = self.cfg.power_out_delay_ms;
                outcome.directives.push(Directive::SchedulePowerOutAttack {
                    delay_ms: self.rng.power_out_delay_ms(min_ms, max_ms),
                });
            }
        }

        if !self.state.power_out {
            // 3. Movement rolls on the coarse cadence.
            if self.state.elapsed_ticks % u64::from(self.cfg.move_roll_period) == 0 {
                ai::run_movement_rolls(&mut self.state, &self.rng, &mut outcome.events);
            }

            // 4. Door contests, every tick.
            if let Some(breacher) =
                doors::resolve_door_contests(&mut self.state, &self.cfg, &self.rng, &mut outcome.events)
            {
                self.trigger_jumpscare(breacher, &mut outcome);
                return outcome;
            }
        }

        // 5. Ambient static decay toward the floor.
        if self.state.static_intensity > STATIC_FLOOR {
            self.state.static_intensity =
                (self.state.static_intensity - STATIC_DECAY_PER_TICK).max(STATIC_FLOOR);
        }
        outcome
    }

    /// The delayed power-out attack. Safe against stale timers: a night
    /// that already ended some other way absorbs the call as a no-op.
    pub fn resolve_power_out_attack(&mut self) -> Option<TickOutcome> {
        if self.state.status != NightStatus::Playing || !self.state.power_out {
            return None;
        }
        let mut outcome = TickOutcome::default();
        self.trigger_jumpscare(POWER_OUT_ATTACKER, &mut outcome);
        Some(outcome)
    }

    /// The delayed jumpscare-to-game-over hold. Returns true when the
    /// transition applied; stale timers report false.
    pub fn settle_game_over(&mut self) -> bool {
        if self.state.status != NightStatus::Jumpscare {
            return false;
        }
        self.state.status = NightStatus::GameOver;
        true
    }

    /// Abandon the night and return to the menu; nothing is persisted.
    pub fn return_to_menu(&mut self) {
        self.state.status = NightStatus::Menu;
    }

    /// Final summary once the night has reached `GameOver` or `Win`.
    #[must_use]
    pub fn summary(&self) -> Option<NightSummary> {
        let outcome = match self.state.status {
            NightStatus::Win => NightOutcome::Survived,
            NightStatus::GameOver => NightOutcome::Caught,
            _ => return None,
        };
        Some(NightSummary {
            night: self.state.night,
            outcome,
            hour_reached: self.state.hour,
            power_remaining: self.state.power,
            jumpscare_entity: self.state.jumpscare_entity,
        })
    }

    // Player commands; guard conditions live on the state methods.

    pub fn toggle_door(&mut self, side: Side) {
        self.state.toggle_door(side);
    }

    pub fn toggle_light(&mut self, side: Side) {
        self.state.toggle_light(side);
    }

    pub fn toggle_monitor(&mut self) {
        self.state.toggle_monitor();
    }

    pub fn set_camera(&mut self, camera: CameraId) {
        self.state.set_camera(camera);
    }

    fn trigger_jumpscare(&mut self, id: EntityId, outcome: &mut TickOutcome) {
        if self.state.jumpscare_entity.is_some() {
            return;
        }
        self.state.status = NightStatus::Jumpscare;
        self.state.jumpscare_entity = Some(id);
        self.state.monitor_open = false;
        self.state.static_intensity = STATIC_JUMPSCARE;
        outcome.events.push(NightEvent::BreachDeclared { id });
        outcome.directives.push(Directive::ScheduleGameOverHold {
            delay_ms: self.cfg.jumpscare_hold_ms,
        });
    }
}
