//! Score storage behind a trait seam; the shipped store is in-memory.
use chrono::Utc;
use std::sync::Mutex;
use thiserror::Error;

use nightshift_game::ScoreSubmission;

use crate::schema::ScoreRecord;

/// Rows returned by a leaderboard read.
pub const LEADERBOARD_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("score store is unavailable")]
    Unavailable,
}

/// Storage seam for leaderboard rows. A database-backed implementation
/// would slot in here; the engine boundary only needs these two calls.
pub trait ScoreStore: Send + Sync {
    /// Top rows ordered by nights survived, then remaining energy.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    fn leaderboard(&self) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Insert a validated submission, assigning id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    fn create(&self, submission: ScoreSubmission) -> Result<ScoreRecord, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    rows: Vec<ScoreRecord>,
}

/// Process-local score store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn leaderboard(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Unavailable)?;
        let mut rows = inner.rows.clone();
        rows.sort_by(|a, b| {
            b.survived_nights
                .cmp(&a.survived_nights)
                .then(b.remaining_energy.cmp(&a.remaining_energy))
        });
        rows.truncate(LEADERBOARD_LIMIT);
        Ok(rows)
    }

    fn create(&self, submission: ScoreSubmission) -> Result<ScoreRecord, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Unavailable)?;
        inner.next_id += 1;
        let record = ScoreRecord {
            id: inner.next_id,
            player_name: submission.player_name,
            survived_nights: submission.survived_nights,
            remaining_energy: submission.remaining_energy,
            created_at: Utc::now(),
        };
        inner.rows.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, nights: u32, energy: u32) -> ScoreSubmission {
        ScoreSubmission {
            player_name: name.to_string(),
            survived_nights: nights,
            remaining_energy: energy,
        }
    }

    #[test]
    fn create_assigns_sequential_ids_and_timestamps() {
        let store = MemoryStore::new();
        let first = store.create(submission("AAA", 1, 10)).unwrap();
        let second = store.create(submission("BBB", 1, 20)).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn leaderboard_orders_by_nights_then_energy() {
        let store = MemoryStore::new();
        store.create(submission("LOW", 1, 90)).unwrap();
        store.create(submission("TOP", 3, 5)).unwrap();
        store.create(submission("MID", 1, 95)).unwrap();

        let rows = store.leaderboard().unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["TOP", "MID", "LOW"]);
    }

    #[test]
    fn leaderboard_truncates_to_the_limit() {
        let store = MemoryStore::new();
        for i in 0..(LEADERBOARD_LIMIT + 10) {
            #[allow(clippy::cast_possible_truncation)]
            store
                .create(submission(&format!("P{i}"), i as u32, 0))
                .unwrap();
        }
        let rows = store.leaderboard().unwrap();
        assert_eq!(rows.len(), LEADERBOARD_LIMIT);
        // Highest nights first, the ten weakest rows dropped.
        assert!(rows.iter().all(|r| r.survived_nights >= 10));
    }
}
