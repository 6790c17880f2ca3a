//! The night world state and the guarded player commands that mutate it.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cameras::CameraId;
use crate::constants::{START_POWER, STATIC_FLOOR, STATIC_SPIKE_CAMERA_SWITCH};
use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NightStatus {
    #[default]
    Menu,
    Playing,
    Jumpscare,
    GameOver,
    Win,
}

impl NightStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::Jumpscare => "jumpscare",
            Self::GameOver => "gameover",
            Self::Win => "win",
        }
    }

    /// Whether the session has reached a final outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Win)
    }
}

impl fmt::Display for NightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NightStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(Self::Menu),
            "playing" => Ok(Self::Playing),
            "jumpscare" => Ok(Self::Jumpscare),
            "gameover" => Ok(Self::GameOver),
            "win" => Ok(Self::Win),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A left/right pair of office fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SidePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SidePair<T> {
    #[must_use]
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub const fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn set(&mut self, side: Side, value: T) {
        *self.get_mut(side) = value;
    }
}

impl SidePair<bool> {
    #[must_use]
    pub const fn any(&self) -> bool {
        self.left || self.right
    }

    pub fn clear(&mut self) {
        self.left = false;
        self.right = false;
    }
}

/// The single mutable world aggregate for one night. The engine owns it;
/// the presentation layer only ever receives clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightState {
    pub status: NightStatus,
    pub night: u32,
    pub elapsed_ticks: u64,
    /// Display hour in [0, total); 0 is midnight.
    pub hour: u8,
    pub power: f32,
    pub power_out: bool,
    /// True means the barrier is down: it blocks entities and draws power.
    pub doors: SidePair<bool>,
    pub lights: SidePair<bool>,
    pub monitor_open: bool,
    /// Once broken, a side's door and light controls stay dead all night.
    pub buttons_broken: SidePair<bool>,
    pub current_camera: CameraId,
    pub entities: [Entity; 4],
    pub jumpscare_entity: Option<EntityId>,
    /// Decaying visual-noise signal in [0, 1]; no gameplay effect.
    pub static_intensity: f32,
}

impl Default for NightState {
    fn default() -> Self {
        Self::for_night(1)
    }
}

impl NightState {
    /// Fresh world state for the given night, ready to play.
    #[must_use]
    pub fn for_night(night: u32) -> Self {
        Self {
            status: NightStatus::Playing,
            night,
            elapsed_ticks: 0,
            hour: 0,
            power: START_POWER,
            power_out: false,
            doors: SidePair::default(),
            lights: SidePair::default(),
            monitor_open: false,
            buttons_broken: SidePair::default(),
            current_camera: CameraId::Cam1,
            entities: EntityId::ALL.map(|id| Entity::spawn(id, night)),
            jumpscare_entity: None,
            static_intensity: STATIC_FLOOR,
        }
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    /// Whether player commands are currently accepted at all.
    fn accepts_commands(&self) -> bool {
        self.status == NightStatus::Playing && !self.power_out
    }

    /// Toggle a door. Silent no-op while not playing, during power-out, or
    /// when that side's buttons are broken.
    pub fn toggle_door(&mut self, side: Side) {
        if !self.accepts_commands() || *self.buttons_broken.get(side) {
            return;
        }
        let closed = !*self.doors.get(side);
        self.doors.set(side, closed);
    }

    /// Toggle a light. At most one light burns at a time, and a lit light
    /// closes the monitor; same guards as doors.
    pub fn toggle_light(&mut self, side: Side) {
        if !self.accepts_commands() || *self.buttons_broken.get(side) {
            return;
        }
        let turning_on = !*self.lights.get(side);
        self.lights.clear();
        self.lights.set(side, turning_on);
        if turning_on {
            self.monitor_open = false;
        }
    }

    /// Toggle the camera monitor; raising or dropping it kills both lights.
    pub fn toggle_monitor(&mut self) {
        if !self.accepts_commands() {
            return;
        }
        self.monitor_open = !self.monitor_open;
        self.lights.clear();
    }

    /// Switch the monitor to another feed, spiking the static signal. No-op
    /// while the monitor is down or when the feed is already selected.
    pub fn set_camera(&mut self, camera: CameraId) {
        if !self.accepts_commands() || !self.monitor_open || self.current_camera == camera {
            return;
        }
        self.current_camera = camera;
        self.static_intensity = STATIC_SPIKE_CAMERA_SWITCH;
    }

    /// Force every powered fixture off. Runs exactly once, when the power
    /// budget hits zero.
    pub(crate) fn shed_all_loads(&mut self) {
        self.power = 0.0;
        self.doors.clear();
        self.lights.clear();
        self.monitor_open = false;
    }
}
