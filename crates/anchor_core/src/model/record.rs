//! Daily completion record model.
//!
//! # Responsibility
//! - Capture one item's progress for one normalized day.
//! - Derive completion state against an explicitly resolved item.
//!
//! # Invariants
//! - `day` is always a normalized UTC-midnight bucket.
//! - `count` is never negative.
//! - Completion is false whenever the owning item cannot be resolved.

use crate::model::day::NormalizedDay;
use crate::model::item::{CheckInItem, ItemId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a record row.
pub type RecordId = Uuid;

/// One day's completion entry for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CheckInRecordWire")]
pub struct CheckInRecord {
    pub id: RecordId,
    pub day: NormalizedDay,
    pub count: u32,
    /// Owning item. `None` only while a record is being assembled.
    pub item_id: Option<ItemId>,
}

#[derive(Deserialize)]
struct CheckInRecordWire {
    id: RecordId,
    day: NormalizedDay,
    count: i64,
    item_id: Option<ItemId>,
}

impl From<CheckInRecordWire> for CheckInRecord {
    fn from(wire: CheckInRecordWire) -> Self {
        Self {
            id: wire.id,
            day: wire.day,
            count: clamp_count(wire.count),
            item_id: wire.item_id,
        }
    }
}

impl CheckInRecord {
    /// Creates a record for the day containing `at_epoch_ms`.
    ///
    /// Negative counts clamp to zero.
    pub fn new(at_epoch_ms: i64, count: i64, item_id: Option<ItemId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            day: NormalizedDay::from_epoch_ms(at_epoch_ms),
            count: clamp_count(count),
            item_id,
        }
    }

    /// Creates a record already marked complete for `item`.
    pub fn completed_for(item: &CheckInItem, day: NormalizedDay) -> Self {
        Self {
            id: Uuid::new_v4(),
            day,
            count: item.target_count,
            item_id: Some(item.id),
        }
    }

    /// Returns whether this record meets the resolved item's target.
    ///
    /// `item` must be the result of looking up `item_id`; a missing or
    /// mismatched item counts as not completed.
    pub fn is_completed(&self, item: Option<&CheckInItem>) -> bool {
        match (self.item_id, item) {
            (Some(owner), Some(item)) if owner == item.id => self.count >= item.target_count,
            _ => false,
        }
    }

    /// Sets the count to the item's target and binds the record to it.
    pub fn complete_for(&mut self, item: &CheckInItem) {
        self.count = item.target_count;
        self.item_id = Some(item.id);
    }
}

/// Clamps any integer input to a valid record count.
pub fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
