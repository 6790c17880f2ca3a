//! End-to-end night scenarios driven purely through the public engine API.
use nightshift_game::{
    Directive, EntityId, Location, NightConfig, NightOutcome, NightRng, NightSim, NightStatus,
    POWER_OUT_ATTACKER, Side, usage_level,
};

fn start(night: u32, seed: u64) -> NightSim {
    NightSim::start(night, NightConfig::default(), NightRng::from_user_seed(seed))
        .expect("valid start")
}

fn ticks_per_night(cfg: &NightConfig) -> u64 {
    u64::from(cfg.ticks_per_hour) * u64::from(cfg.total_hours)
}

#[test]
fn scenario_quiet_night_one_ends_in_a_win() {
    // Night 1, no commands, doors open: survive to 6 AM on base drain.
    let mut sim = start(1, 1337);
    // Nobody may reach a door and breach before dawn in this fixture; make
    // that structural rather than luck by parking the roster.
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }

    let total = ticks_per_night(sim.config());
    for tick in 1..=total {
        sim.step();
        if tick < total {
            assert_eq!(sim.status(), NightStatus::Playing, "tick {tick}");
        }
    }

    assert_eq!(sim.status(), NightStatus::Win);
    let state = sim.state();
    assert_eq!(state.hour, sim.config().total_hours);
    assert!(!state.power_out);
    assert!(state.power > 0.0);

    let summary = sim.summary().expect("win summary");
    assert_eq!(summary.outcome, NightOutcome::Survived);
    assert_eq!(summary.night, 1);
}

#[test]
fn scenario_full_load_burns_out_the_power() {
    let mut sim = start(1, 4242);
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }
    // Both doors down plus a light: usage 4, so the budget dies long
    // before dawn.
    sim.toggle_door(Side::Left);
    sim.toggle_door(Side::Right);
    sim.toggle_light(Side::Left);
    assert_eq!(usage_level(sim.state()), 4);

    let mut power_out_tick = None;
    let mut attack_delay = None;
    let total = ticks_per_night(sim.config());
    for tick in 1..=total {
        let previous_power = sim.state().power;
        let outcome = sim.step();
        assert!(sim.state().power <= previous_power, "power may never rise");
        for directive in &outcome.directives {
            if let Directive::SchedulePowerOutAttack { delay_ms } = directive {
                power_out_tick = Some(tick);
                attack_delay = Some(*delay_ms);
            }
        }
        if sim.state().power_out {
            break;
        }
    }

    let power_out_tick = power_out_tick.expect("power must run out under full load");
    assert!(power_out_tick < total);
    let state = sim.state();
    assert!(state.power_out);
    assert!((state.power).abs() < f32::EPSILON);
    assert!(!state.doors.any());
    assert!(!state.lights.any());
    assert!(!state.monitor_open);

    // The scheduled attack lands inside the configured window, and ends the
    // night through Jumpscare then GameOver.
    let (min_ms, max_ms) = sim.config().power_out_delay_ms;
    let delay = attack_delay.expect("attack armed with the outage");
    assert!((min_ms..=max_ms).contains(&delay));

    sim.resolve_power_out_attack().expect("night still live");
    assert_eq!(sim.status(), NightStatus::Jumpscare);
    assert_eq!(sim.state().jumpscare_entity, Some(POWER_OUT_ATTACKER));
    assert!(sim.settle_game_over());
    assert_eq!(sim.status(), NightStatus::GameOver);

    let summary = sim.summary().expect("loss summary");
    assert_eq!(summary.outcome, NightOutcome::Caught);
    assert_eq!(summary.nights_survived(), 0);
}

#[test]
fn scenario_open_left_door_breach_lands_on_the_threshold_tick() {
    let mut sim = start(1, 7);
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }
    sim.state_mut().entity_mut(EntityId::Bandit).location = Location::LeftDoor;
    assert!(!sim.state().doors.left, "left door stays open");

    let breach_tick = u64::from(sim.config().breach_grace_ticks) + 1;
    for tick in 1..breach_tick {
        sim.step();
        assert_eq!(sim.status(), NightStatus::Playing, "tick {tick}");
    }
    sim.step();
    assert_eq!(sim.status(), NightStatus::Jumpscare);
    assert_eq!(sim.state().jumpscare_entity, Some(EntityId::Bandit));

    // Status never returns to Playing for the rest of the night.
    sim.step();
    assert_eq!(sim.status(), NightStatus::Jumpscare);
    assert!(sim.settle_game_over());
    assert_eq!(sim.status(), NightStatus::GameOver);
}

#[test]
fn closed_left_door_holds_the_line_and_evicts() {
    let mut sim = start(1, 11);
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }
    sim.toggle_door(Side::Left);
    sim.state_mut().entity_mut(EntityId::Bandit).location = Location::LeftDoor;

    let evict_tick = u64::from(sim.config().blocked_evict_ticks) + 1;
    for _ in 1..evict_tick {
        sim.step();
        assert!(sim.state().entity(EntityId::Bandit).at_door());
    }
    sim.step();
    assert_eq!(sim.status(), NightStatus::Playing);
    let bandit = sim.state().entity(EntityId::Bandit);
    assert_eq!(bandit.location, Location::Camera(nightshift_game::CameraId::Cam1));
    assert_eq!(bandit.door_timer, 0);
}

#[test]
fn aggression_zero_roster_is_invariant_under_step() {
    let mut sim = start(1, 99);
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }
    let starts: Vec<Location> = EntityId::ALL
        .iter()
        .map(|id| sim.state().entity(*id).location)
        .collect();

    for _ in 0..300 {
        sim.step();
    }
    for (id, start) in EntityId::ALL.iter().zip(starts) {
        assert_eq!(sim.state().entity(*id).location, start);
    }
}

#[test]
fn usage_level_tracks_switch_count_within_bounds() {
    let mut sim = start(1, 3);
    assert_eq!(usage_level(sim.state()), 1);
    sim.toggle_door(Side::Left);
    sim.toggle_door(Side::Right);
    sim.toggle_light(Side::Right);
    sim.toggle_monitor();
    // The monitor kills the light, so the ceiling under the single-light
    // variant is doors + monitor + baseline.
    let level = usage_level(sim.state());
    assert!((1..=6).contains(&level));
    assert_eq!(level, 4);
}

#[test]
fn monitor_double_toggle_is_idempotent() {
    let mut sim = start(1, 5);
    sim.toggle_light(Side::Left);
    let before = sim.state().monitor_open;

    sim.toggle_monitor();
    assert!(!sim.state().lights.any());
    sim.toggle_monitor();
    assert!(!sim.state().lights.any());
    assert_eq!(sim.state().monitor_open, before);
}

#[test]
fn hour_reporting_matches_the_floor_rule() {
    let cfg = NightConfig::default();
    let mut sim = start(1, 21);
    for id in EntityId::ALL {
        sim.state_mut().entity_mut(id).aggression = 0;
    }
    for tick in 1..u64::from(cfg.ticks_per_hour) * 3 {
        sim.step();
        assert_eq!(
            u64::from(sim.state().hour),
            tick / u64::from(cfg.ticks_per_hour),
            "tick {tick}"
        );
    }
}
