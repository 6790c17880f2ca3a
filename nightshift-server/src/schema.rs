//! Leaderboard row shapes and score validation.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nightshift_game::ScoreSubmission;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 32;
/// Remaining energy is a display percentage.
pub const MAX_REMAINING_ENERGY: i64 = 100;

/// A stored leaderboard row, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: i64,
    pub player_name: String,
    pub survived_nights: u32,
    pub remaining_energy: u32,
    pub created_at: DateTime<Utc>,
}

/// A structured validation fault: human-readable message plus the wire name
/// of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field: String,
}

impl ValidationError {
    fn new(message: &str, field: &str) -> Self {
        Self {
            message: message.to_string(),
            field: field.to_string(),
        }
    }
}

/// Raw POST body before validation. Every field is optional here so that a
/// missing field reports its own name instead of a generic parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreDraft {
    pub player_name: Option<String>,
    pub survived_nights: Option<i64>,
    pub remaining_energy: Option<i64>,
}

impl ScoreDraft {
    /// Validate the draft into an accepted submission.
    ///
    /// # Errors
    ///
    /// Returns the first failing field with a human-readable message.
    pub fn validate(self) -> Result<ScoreSubmission, ValidationError> {
        let Some(player_name) = self.player_name else {
            return Err(ValidationError::new("playerName is required", "playerName"));
        };
        let player_name = player_name.trim().to_string();
        if player_name.is_empty() {
            return Err(ValidationError::new(
                "playerName must not be blank",
                "playerName",
            ));
        }
        if player_name.chars().count() > MAX_PLAYER_NAME_LEN {
            return Err(ValidationError::new(
                "playerName is too long",
                "playerName",
            ));
        }

        let Some(survived_nights) = self.survived_nights else {
            return Err(ValidationError::new(
                "survivedNights is required",
                "survivedNights",
            ));
        };
        let survived_nights = u32::try_from(survived_nights).map_err(|_| {
            ValidationError::new("survivedNights must be a non-negative integer", "survivedNights")
        })?;

        let Some(remaining_energy) = self.remaining_energy else {
            return Err(ValidationError::new(
                "remainingEnergy is required",
                "remainingEnergy",
            ));
        };
        if !(0..=MAX_REMAINING_ENERGY).contains(&remaining_energy) {
            return Err(ValidationError::new(
                "remainingEnergy must lie in [0, 100]",
                "remainingEnergy",
            ));
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let remaining_energy = remaining_energy as u32;

        Ok(ScoreSubmission {
            player_name,
            survived_nights,
            remaining_energy,
        })
    }
}
