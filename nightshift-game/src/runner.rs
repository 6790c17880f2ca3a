//! Real-time driver for a night: a single tokio task owns the interval
//! tick loop, the two deferred one-shot timers, the command channel from
//! the presentation side, and a watch channel publishing state snapshots.
//!
//! Dropping or aborting the runner cancels every timer with it; the two
//! deferred resolutions re-check live status on fire, so a timer that
//! outlives its reason is absorbed as a no-op.
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior, Sleep};

use crate::cameras::CameraId;
use crate::night::{Directive, NightSim, TickOutcome};
use crate::result::NightSummary;
use crate::state::{NightState, Side};

/// Player commands accepted while a night is live. Invalid commands are
/// absorbed as no-ops by the engine's guard conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightCommand {
    ToggleDoor(Side),
    ToggleLight(Side),
    ToggleMonitor,
    SetCamera(CameraId),
    ReturnToMenu,
}

const COMMAND_BUFFER: usize = 32;

/// Handle to a running night.
pub struct NightRunner {
    commands: mpsc::Sender<NightCommand>,
    snapshots: watch::Receiver<NightState>,
    handle: JoinHandle<Option<NightSummary>>,
}

impl NightRunner {
    /// Spawn the drive task for an already-started simulation.
    #[must_use]
    pub fn spawn(sim: NightSim) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(sim.state().clone());
        let handle = tokio::spawn(drive(sim, snapshot_tx, command_rx));
        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            handle,
        }
    }

    /// Sender half for issuing player commands.
    #[must_use]
    pub fn commands(&self) -> mpsc::Sender<NightCommand> {
        self.commands.clone()
    }

    /// Receiver half observing the latest state snapshot.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<NightState> {
        self.snapshots.clone()
    }

    /// Wait for the night to finish. `None` means the night was abandoned
    /// to the menu rather than played to a terminal status.
    pub async fn finished(self) -> Option<NightSummary> {
        self.handle.await.ok().flatten()
    }

    /// Hard-stop the drive task, cancelling the tick loop and any pending
    /// one-shot timers.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Await an armed one-shot timer, or park forever when it is unarmed.
async fn armed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

fn arm(timer: &mut Option<Pin<Box<Sleep>>>, delay_ms: u64) {
    *timer = Some(Box::pin(time::sleep(Duration::from_millis(delay_ms))));
}

async fn drive(
    mut sim: NightSim,
    snapshots: watch::Sender<NightState>,
    mut commands: mpsc::Receiver<NightCommand>,
) -> Option<NightSummary> {
    let mut ticker = time::interval(Duration::from_millis(sim.config().tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval fire is immediate; consume it so tick one lands a
    // full period after start.
    ticker.tick().await;

    let mut power_attack: Option<Pin<Box<Sleep>>> = None;
    let mut game_over_hold: Option<Pin<Box<Sleep>>> = None;
    let mut commands_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick(), if sim.status() == crate::state::NightStatus::Playing => {
                let outcome = sim.step();
                schedule(&mut power_attack, &mut game_over_hold, &outcome);
                let _ = snapshots.send(sim.state().clone());
            }
            () = armed(&mut power_attack) => {
                power_attack = None;
                if let Some(outcome) = sim.resolve_power_out_attack() {
                    schedule(&mut power_attack, &mut game_over_hold, &outcome);
                    let _ = snapshots.send(sim.state().clone());
                }
            }
            () = armed(&mut game_over_hold) => {
                game_over_hold = None;
                if sim.settle_game_over() {
                    let _ = snapshots.send(sim.state().clone());
                }
            }
            command = commands.recv(), if commands_open => {
                match command {
                    Some(NightCommand::ReturnToMenu) => {
                        sim.return_to_menu();
                        let _ = snapshots.send(sim.state().clone());
                        return None;
                    }
                    Some(command) => {
                        apply_command(&mut sim, command);
                        let _ = snapshots.send(sim.state().clone());
                    }
                    None => commands_open = false,
                }
            }
        }

        if sim.status().is_terminal() {
            return sim.summary();
        }
    }
}

fn apply_command(sim: &mut NightSim, command: NightCommand) {
    match command {
        NightCommand::ToggleDoor(side) => sim.toggle_door(side),
        NightCommand::ToggleLight(side) => sim.toggle_light(side),
        NightCommand::ToggleMonitor => sim.toggle_monitor(),
        NightCommand::SetCamera(camera) => sim.set_camera(camera),
        NightCommand::ReturnToMenu => sim.return_to_menu(),
    }
}

fn schedule(
    power_attack: &mut Option<Pin<Box<Sleep>>>,
    game_over_hold: &mut Option<Pin<Box<Sleep>>>,
    outcome: &TickOutcome,
) {
    for directive in &outcome.directives {
        match *directive {
            Directive::SchedulePowerOutAttack { delay_ms } => arm(power_attack, delay_ms),
            Directive::ScheduleGameOverHold { delay_ms } => arm(game_over_hold, delay_ms),
        }
    }
}
