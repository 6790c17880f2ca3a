//! Entity roster, per-entity path graphs, and per-night aggression.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cameras::CameraId;
use crate::constants::{AGGRESSION_MAX, AGGRESSION_RAMP};
use crate::state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityId {
    Bandit,
    Juno,
    Wick,
    Moth,
}

impl EntityId {
    /// Fixed resolution order; doubles as the breach tie-break order.
    pub const ALL: [Self; 4] = [Self::Bandit, Self::Juno, Self::Wick, Self::Moth];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bandit => "bandit",
            Self::Juno => "juno",
            Self::Wick => "wick",
            Self::Moth => "moth",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bandit => "Bandit",
            Self::Juno => "Juno",
            Self::Wick => "Wick",
            Self::Moth => "Moth",
        }
    }

    /// Asset key the presentation layer resolves to breach/room imagery.
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Bandit => "mascot-bandit",
            Self::Juno => "mascot-juno",
            Self::Wick => "mascot-wick",
            Self::Moth => "mascot-moth",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bandit" => Ok(Self::Bandit),
            "juno" => Ok(Self::Juno),
            "wick" => Ok(Self::Wick),
            "moth" => Ok(Self::Moth),
            _ => Err(()),
        }
    }
}

/// Where an entity currently is: a camera feed or one of the two door
/// sentinels. Sentinels are not camera rooms; the monitor never shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Camera(CameraId),
    LeftDoor,
    RightDoor,
}

impl Location {
    /// The office side implied by a door sentinel, if this is one.
    #[must_use]
    pub const fn door_side(self) -> Option<Side> {
        match self {
            Self::LeftDoor => Some(Side::Left),
            Self::RightDoor => Some(Side::Right),
            Self::Camera(_) => None,
        }
    }
}

const BANDIT_PATH: [Location; 4] = [
    Location::Camera(CameraId::Cam1),
    Location::Camera(CameraId::Cam2),
    Location::Camera(CameraId::Cam3),
    Location::LeftDoor,
];
const JUNO_PATH: [Location; 4] = [
    Location::Camera(CameraId::Cam1),
    Location::Camera(CameraId::Cam2),
    Location::Camera(CameraId::Cam4),
    Location::RightDoor,
];
const WICK_PATH: [Location; 4] = [
    Location::Camera(CameraId::Cam1),
    Location::Camera(CameraId::Cam5),
    Location::Camera(CameraId::Cam3),
    Location::LeftDoor,
];
const MOTH_PATH: [Location; 3] = [
    Location::Camera(CameraId::Cam6),
    Location::Camera(CameraId::Cam4),
    Location::RightDoor,
];

/// Ordered approach path for an entity; the final node is always a door
/// sentinel.
#[must_use]
pub fn path_for(id: EntityId) -> &'static [Location] {
    match id {
        EntityId::Bandit => &BANDIT_PATH,
        EntityId::Juno => &JUNO_PATH,
        EntityId::Wick => &WICK_PATH,
        EntityId::Moth => &MOTH_PATH,
    }
}

/// Spawn location at night start. Wick lurks one node into its path; the
/// rest begin at their path head.
#[must_use]
pub fn start_location(id: EntityId) -> Location {
    match id {
        EntityId::Wick => WICK_PATH[1],
        _ => path_for(id)[0],
    }
}

/// Movement-roll target for a given night. Zero means the entity is inert
/// for the whole night.
#[must_use]
pub fn aggression_for_night(id: EntityId, night: u32) -> u8 {
    let (base, ramp, first_active) = AGGRESSION_RAMP[id.index()];
    if night < first_active {
        return 0;
    }
    let nights_active = (night - first_active).min(u32::from(AGGRESSION_MAX));
    let scaled = u32::from(base) + u32::from(ramp) * nights_active;
    u8::try_from(scaled.min(u32::from(AGGRESSION_MAX))).unwrap_or(AGGRESSION_MAX)
}

/// One autonomous entity. Owned by the night state; the engine is the only
/// writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub asset: String,
    pub location: Location,
    pub aggression: u8,
    /// Consecutive ticks spent at a door sentinel; reset on leaving it.
    pub door_timer: u8,
    /// Peek-sequence progress for entities whose door approach is staged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peek_stage: Option<u8>,
}

impl Entity {
    /// Fresh entity record for the given night.
    #[must_use]
    pub fn spawn(id: EntityId, night: u32) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            asset: id.asset().to_string(),
            location: start_location(id),
            aggression: aggression_for_night(id, night),
            door_timer: 0,
            peek_stage: matches!(id, EntityId::Wick).then_some(0),
        }
    }

    #[must_use]
    pub fn at_door(&self) -> bool {
        self.location.door_side().is_some()
    }

    /// Index of the current location on this entity's path.
    #[must_use]
    pub fn path_index(&self) -> Option<usize> {
        path_for(self.id).iter().position(|node| *node == self.location)
    }

    /// Send the entity back to the head of its own path and clear door and
    /// peek progress.
    pub fn evict(&mut self) {
        self.location = path_for(self.id)[0];
        self.door_timer = 0;
        if self.peek_stage.is_some() {
            self.peek_stage = Some(0);
        }
    }
}
