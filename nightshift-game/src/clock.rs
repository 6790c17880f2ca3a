//! Clock and power model: tick-to-hour conversion, usage level, and drain.
use crate::constants::BASE_USAGE_LEVEL;
use crate::night::NightConfig;
use crate::state::NightState;

/// Display hour for an elapsed tick count, before the win clamp.
#[must_use]
pub fn hour_for_tick(elapsed_ticks: u64, ticks_per_hour: u32) -> u8 {
    let hour = elapsed_ticks / u64::from(ticks_per_hour.max(1));
    u8::try_from(hour).unwrap_or(u8::MAX)
}

/// Current power usage level: the baseline plus one per active fixture.
/// Drives both the drain rate and the HUD usage indicator.
#[must_use]
pub fn usage_level(state: &NightState) -> u8 {
    let mut level = BASE_USAGE_LEVEL;
    for active in [
        state.doors.left,
        state.doors.right,
        state.lights.left,
        state.lights.right,
        state.monitor_open,
    ] {
        if active {
            level += 1;
        }
    }
    level
}

/// Advance the display hour if this tick crosses an hour boundary. Returns
/// true when the configured final hour is reached, which wins the night
/// before any later stage of the tick runs.
pub(crate) fn advance_clock(state: &mut NightState, cfg: &NightConfig) -> bool {
    if state.elapsed_ticks % u64::from(cfg.ticks_per_hour) != 0 {
        return false;
    }
    state.hour = state.hour.saturating_add(1);
    state.hour >= cfg.total_hours
}

/// Apply one tick of power drain. Returns true on the tick the budget first
/// reaches zero; the caller owns the power-out transition.
pub(crate) fn drain_power(state: &mut NightState, cfg: &NightConfig) -> bool {
    let usage = f32::from(usage_level(state));
    state.power = (state.power - usage * cfg.drain_per_unit).max(0.0);
    state.power <= 0.0
}
