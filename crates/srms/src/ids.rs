//! Record id generation.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::record::RecordId;

/// Hands out strictly increasing record ids based on wall-clock milliseconds.
///
/// A new id is the current time in milliseconds, bumped past the previously
/// issued id when the clock has not advanced (or has stepped backwards).
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator that will never issue an id at or below `floor`.
    ///
    /// Seed with the largest id already in the store so ids are not reused
    /// across restarts.
    #[must_use]
    pub fn starting_after(floor: Option<RecordId>) -> Self {
        Self {
            last: floor.map_or(0, RecordId::get),
        }
    }

    /// Issue the next id using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] once `i64::MAX` has been issued.
    pub fn next_id(&mut self) -> Result<RecordId> {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Issue the next id as if the clock read `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] once `i64::MAX` has been issued.
    pub fn next_at(&mut self, now_ms: i64) -> Result<RecordId> {
        let floor = self
            .last
            .checked_add(1)
            .ok_or(Error::IdsExhausted { last: self.last })?;
        let id = now_ms.max(floor);
        self.last = id;
        Ok(RecordId::new(id))
    }

    /// The most recently issued (or seeded) id value.
    #[must_use]
    pub fn last(&self) -> i64 {
        self.last
    }
}
