//! Terminal night summaries and the leaderboard submission record.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;

/// How the night ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NightOutcome {
    /// The clock reached 6 AM.
    Survived,
    /// A breach or the power-out attack landed.
    Caught,
}

impl fmt::Display for NightOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survived => write!(f, "survived"),
            Self::Caught => write!(f, "caught"),
        }
    }
}

/// Final engine output handed to the session bridge once the status leaves
/// `Playing` for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSummary {
    pub night: u32,
    pub outcome: NightOutcome,
    pub hour_reached: u8,
    pub power_remaining: f32,
    pub jumpscare_entity: Option<EntityId>,
}

impl NightSummary {
    /// Nights fully survived by the end of this session.
    #[must_use]
    pub const fn nights_survived(&self) -> u32 {
        match self.outcome {
            NightOutcome::Survived => self.night,
            NightOutcome::Caught => self.night.saturating_sub(1),
        }
    }

    /// Wire-shaped score record for the leaderboard collaborator.
    #[must_use]
    pub fn score_submission(&self, player_name: &str) -> ScoreSubmission {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let remaining_energy = self.power_remaining.clamp(0.0, 100.0).floor() as u32;
        ScoreSubmission {
            player_name: player_name.to_string(),
            survived_nights: self.nights_survived(),
            remaining_energy,
        }
    }
}

/// Body of `POST /api/leaderboard`, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub survived_nights: u32,
    pub remaining_energy: u32,
}
