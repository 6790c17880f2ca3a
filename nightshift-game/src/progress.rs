//! Unlock-progress persistence: which night the player may start.
use serde::{Deserialize, Serialize};

use crate::result::{NightOutcome, NightSummary};

pub const FIRST_NIGHT: u32 = 1;
pub const FINAL_NIGHT: u32 = 5;

/// Persisted menu progress. A win on the lowest unwon night unlocks the
/// next one; everything else leaves the record alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockProgress {
    pub unlocked_night: u32,
}

impl Default for UnlockProgress {
    fn default() -> Self {
        Self {
            unlocked_night: FIRST_NIGHT,
        }
    }
}

impl UnlockProgress {
    /// Fold a finished night into the record. Returns true when the unlock
    /// advanced.
    pub fn record(&mut self, summary: &NightSummary) -> bool {
        if summary.outcome != NightOutcome::Survived {
            return false;
        }
        if summary.night != self.unlocked_night || self.unlocked_night >= FINAL_NIGHT {
            return false;
        }
        self.unlocked_night += 1;
        true
    }
}

/// Trait for abstracting progress persistence.
/// Platform-specific implementations should provide this.
pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stored progress, if any exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Option<UnlockProgress>, Self::Error>;

    /// Persist the progress record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, progress: &UnlockProgress) -> Result<(), Self::Error>;
}

/// Session bridge between the engine's final output and persisted progress.
pub struct SessionBridge<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> SessionBridge<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist the outcome of a finished night and return the up-to-date
    /// progress record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn finish_night(&self, summary: &NightSummary) -> Result<UnlockProgress, S::Error> {
        let mut progress = self.store.load()?.unwrap_or_default();
        if progress.record(summary) {
            self.store.save(&progress)?;
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryProgressStore {
        slot: Rc<RefCell<Option<UnlockProgress>>>,
        saves: Rc<RefCell<u32>>,
    }

    impl ProgressStore for MemoryProgressStore {
        type Error = Infallible;

        fn load(&self) -> Result<Option<UnlockProgress>, Self::Error> {
            Ok(*self.slot.borrow())
        }

        fn save(&self, progress: &UnlockProgress) -> Result<(), Self::Error> {
            *self.slot.borrow_mut() = Some(*progress);
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    fn won(night: u32) -> NightSummary {
        NightSummary {
            night,
            outcome: NightOutcome::Survived,
            hour_reached: 6,
            power_remaining: 20.0,
            jumpscare_entity: None,
        }
    }

    fn lost(night: u32) -> NightSummary {
        NightSummary {
            night,
            outcome: NightOutcome::Caught,
            hour_reached: 2,
            power_remaining: 0.0,
            jumpscare_entity: None,
        }
    }

    #[test]
    fn winning_the_lowest_unwon_night_unlocks_the_next() {
        let store = MemoryProgressStore::default();
        let bridge = SessionBridge::new(store.clone());

        let progress = bridge.finish_night(&won(1)).unwrap();
        assert_eq!(progress.unlocked_night, 2);
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[test]
    fn losses_and_replays_do_not_touch_the_store() {
        let store = MemoryProgressStore::default();
        let bridge = SessionBridge::new(store.clone());
        bridge.finish_night(&won(1)).unwrap();

        // Losing, or re-winning an already-cleared night, persists nothing.
        let progress = bridge.finish_night(&lost(2)).unwrap();
        assert_eq!(progress.unlocked_night, 2);
        let progress = bridge.finish_night(&won(1)).unwrap();
        assert_eq!(progress.unlocked_night, 2);
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[test]
    fn unlock_caps_at_the_final_night() {
        let mut progress = UnlockProgress {
            unlocked_night: FINAL_NIGHT,
        };
        assert!(!progress.record(&won(FINAL_NIGHT)));
        assert_eq!(progress.unlocked_night, FINAL_NIGHT);
    }

    #[test]
    fn skipping_ahead_never_unlocks() {
        let mut progress = UnlockProgress::default();
        assert!(!progress.record(&won(3)));
        assert_eq!(progress.unlocked_night, FIRST_NIGHT);
    }
}
