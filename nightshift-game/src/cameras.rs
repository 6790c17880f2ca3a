//! Static camera map: the ordered set of rooms the monitor can display.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraId {
    #[default]
    Cam1,
    Cam2,
    Cam3,
    Cam4,
    Cam5,
    Cam6,
}

impl CameraId {
    pub const ALL: [Self; 6] = [
        Self::Cam1,
        Self::Cam2,
        Self::Cam3,
        Self::Cam4,
        Self::Cam5,
        Self::Cam6,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cam1 => "cam1",
            Self::Cam2 => "cam2",
            Self::Cam3 => "cam3",
            Self::Cam4 => "cam4",
            Self::Cam5 => "cam5",
            Self::Cam6 => "cam6",
        }
    }

    /// Room label shown on the monitor overlay.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cam1 => "Show Stage",
            Self::Cam2 => "Dining Area",
            Self::Cam3 => "West Hall",
            Self::Cam4 => "East Hall",
            Self::Cam5 => "Supply Closet",
            Self::Cam6 => "Kitchen",
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cam1" => Ok(Self::Cam1),
            "cam2" => Ok(Self::Cam2),
            "cam3" => Ok(Self::Cam3),
            "cam4" => Ok(Self::Cam4),
            "cam5" => Ok(Self::Cam5),
            "cam6" => Ok(Self::Cam6),
            _ => Err(()),
        }
    }
}

/// A single feed in the camera map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: &'static str,
}

/// The fixed camera map, in monitor display order.
#[must_use]
pub fn camera_map() -> [Camera; 6] {
    CameraId::ALL.map(|id| Camera {
        id,
        name: id.display_name(),
    })
}
