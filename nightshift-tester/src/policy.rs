//! Scripted defense policies standing in for a human player.
use clap::ValueEnum;

use nightshift_game::{NightSim, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefensePolicy {
    /// Issue no commands at all.
    Passive,
    /// Close a door only while an entity stands at that sentinel.
    Reactive,
    /// Keep both doors closed from the first tick.
    Paranoid,
}

impl DefensePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::Reactive => "reactive",
            Self::Paranoid => "paranoid",
        }
    }

    /// Apply the policy's commands for the upcoming tick.
    pub fn apply(self, sim: &mut NightSim) {
        match self {
            Self::Passive => {}
            Self::Reactive => {
                for side in Side::BOTH {
                    let threatened = sim
                        .state()
                        .entities
                        .iter()
                        .any(|entity| entity.location.door_side() == Some(side));
                    let closed = *sim.state().doors.get(side);
                    if threatened != closed {
                        sim.toggle_door(side);
                    }
                }
            }
            Self::Paranoid => {
                for side in Side::BOTH {
                    if !*sim.state().doors.get(side) {
                        sim.toggle_door(side);
                    }
                }
            }
        }
    }
}
