//! Check-in use-case service.
//!
//! # Responsibility
//! - Provide the item/record entry points the UI layer calls.
//! - Apply creation-form rules (trimmed title, icon fallback, target range).
//! - Toggle daily completion and publish store changes.
//!
//! # Invariants
//! - "Not done" is represented by the absence of a record.
//! - Toggle never writes a partial count; completion is all-or-nothing.
//! - Changes are published only after the write succeeded.

use crate::model::day::NormalizedDay;
use crate::model::item::{
    clamp_target_count, sanitize_icon, Category, CheckInItem, ItemId, ThemeColor,
    ICON_SUGGESTIONS, TARGET_COUNT_MAX,
};
use crate::model::record::{CheckInRecord, RecordId};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use crate::repo::record_repo::RecordRepository;
use crate::service::change_feed::{ChangeFeed, StoreChange};
use chrono::Utc;
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Service error for check-in use-cases.
#[derive(Debug, Error)]
pub enum CheckInServiceError {
    /// Title is blank after trim; the save action is disabled for this input.
    #[error("item title must not be blank")]
    EmptyTitle,
    /// Target item does not exist.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    /// Persistence-layer failure.
    #[error("{0}")]
    Repo(RepoError),
}

impl From<RepoError> for CheckInServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ItemNotFound(item_id) => Self::ItemNotFound(item_id),
            other => Self::Repo(other),
        }
    }
}

impl CheckInServiceError {
    /// Message shown in the dismissible alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyTitle => "Enter a name for this check-in.".to_string(),
            Self::ItemNotFound(_) => "This check-in no longer exists.".to_string(),
            Self::Repo(err) => err.to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::ItemNotFound(_) => "item_not_found",
            Self::Repo(_) => "persistence_failed",
        }
    }
}

/// Input of the add/edit item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    /// `None` creates a new item; `Some` edits the existing one.
    pub id: Option<ItemId>,
    pub title: String,
    pub category: Category,
    pub icon: String,
    pub color: ThemeColor,
    /// Clamped to `1..=20`.
    pub target_count: i64,
    /// Creation instant in epoch milliseconds; defaults to now. Ignored on edit.
    pub created_at: Option<i64>,
}

impl ItemRequest {
    /// Create request pre-filled with the form defaults.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            category: Category::default(),
            icon: ICON_SUGGESTIONS[0].to_string(),
            color: ThemeColor::default(),
            target_count: 1,
            created_at: None,
        }
    }
}

/// Result of one completion toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No record existed; a completed one was inserted.
    Created(CheckInRecord),
    /// A partial record was raised to the item's target.
    Completed(CheckInRecord),
    /// A completed record was deleted.
    Cleared(RecordId),
}

impl ToggleOutcome {
    /// Completion state after the toggle.
    pub fn is_completed(&self) -> bool {
        !matches!(self, Self::Cleared(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Completed(_) => "completed",
            Self::Cleared(_) => "cleared",
        }
    }
}

/// One card of the today grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCard {
    pub item: CheckInItem,
    pub record: Option<CheckInRecord>,
    pub is_completed: bool,
}

/// Read model for the today grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayBoard {
    pub day: NormalizedDay,
    /// Cards in item creation order.
    pub cards: Vec<BoardCard>,
}

impl TodayBoard {
    pub fn completed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_completed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Builds the item-id → record map used to render completion state.
pub fn completion_lookup(
    records: impl IntoIterator<Item = CheckInRecord>,
) -> HashMap<ItemId, CheckInRecord> {
    records
        .into_iter()
        .filter_map(|record| record.item_id.map(|item_id| (item_id, record)))
        .collect()
}

/// Check-in service facade over item and record repositories.
pub struct CheckInService<I: ItemRepository, R: RecordRepository> {
    items: I,
    records: R,
    feed: Arc<ChangeFeed>,
}

impl<I: ItemRepository, R: RecordRepository> CheckInService<I, R> {
    /// Creates a service with a private change feed.
    pub fn new(items: I, records: R) -> Self {
        Self::with_feed(items, records, Arc::new(ChangeFeed::new()))
    }

    /// Creates a service publishing into a shared change feed.
    pub fn with_feed(items: I, records: R, feed: Arc<ChangeFeed>) -> Self {
        Self {
            items,
            records,
            feed,
        }
    }

    /// Change feed observed by the UI layer.
    pub fn feed(&self) -> &Arc<ChangeFeed> {
        &self.feed
    }

    /// Lists all items ordered by creation time ascending.
    pub fn list_items(&self) -> RepoResult<Vec<CheckInItem>> {
        self.items.list_items()
    }

    /// Gets one item by id.
    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<CheckInItem>> {
        self.items.get_item(id)
    }

    /// Lists records dated on the given normalized day.
    pub fn list_records_for_day(&self, day: NormalizedDay) -> RepoResult<Vec<CheckInRecord>> {
        self.records.list_records_for_day(day)
    }

    /// Creates a new item or edits an existing one.
    ///
    /// # Contract
    /// - Title is trimmed; blank titles return `EmptyTitle` without writing.
    /// - Blank icon is replaced by the fallback glyph.
    /// - Target count is clamped to `1..=20`.
    /// - Edits keep `id` and `created_at`.
    pub fn upsert_item(&self, request: &ItemRequest) -> Result<CheckInItem, CheckInServiceError> {
        let title = request.title.trim();
        if title.is_empty() {
            warn!("event=item_upsert module=service status=rejected error_code=empty_title");
            return Err(CheckInServiceError::EmptyTitle);
        }
        let icon = sanitize_icon(&request.icon);
        let target_count = clamp_target_count(request.target_count).min(TARGET_COUNT_MAX);

        let result = match request.id {
            Some(id) => self.update_existing(id, title, icon, request, target_count),
            None => self.create_new(title, icon, request, target_count),
        };

        match result {
            Ok(item) => {
                info!(
                    "event=item_upsert module=service status=ok mode={} item_id={} target_count={}",
                    if request.id.is_some() { "update" } else { "create" },
                    item.id,
                    item.target_count
                );
                self.feed.publish(StoreChange::ItemSaved(item.id));
                Ok(item)
            }
            Err(err) => {
                error!(
                    "event=item_upsert module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Toggles today's completion for one item.
    ///
    /// # Contract
    /// - Completed record → deleted.
    /// - Partial record → count raised to the item's target.
    /// - No record → completed record inserted for `today`.
    /// - Write failures are returned as-is; nothing is retried or undone.
    pub fn toggle_completion(
        &self,
        item_id: ItemId,
        today: NormalizedDay,
    ) -> Result<ToggleOutcome, CheckInServiceError> {
        match self.toggle_inner(item_id, today) {
            Ok(outcome) => {
                info!(
                    "event=checkin_toggle module=service status=ok outcome={} item_id={} day={}",
                    outcome.label(),
                    item_id,
                    today
                );
                self.feed
                    .publish(StoreChange::RecordChanged { item_id, day: today });
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    "event=checkin_toggle module=service status=error item_id={} day={} error_code={} error={}",
                    item_id,
                    today,
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Toggles completion for the current UTC day.
    pub fn toggle_completion_today(
        &self,
        item_id: ItemId,
    ) -> Result<ToggleOutcome, CheckInServiceError> {
        self.toggle_completion(item_id, NormalizedDay::today())
    }

    /// Deletes an item and, through the cascade, all of its records.
    pub fn delete_item(&self, id: ItemId) -> Result<(), CheckInServiceError> {
        match self.items.delete_item(id) {
            Ok(()) => {
                info!("event=item_delete module=service status=ok item_id={id}");
                self.feed.publish(StoreChange::ItemDeleted(id));
                Ok(())
            }
            Err(err) => {
                let err = CheckInServiceError::from(err);
                error!(
                    "event=item_delete module=service status=error item_id={id} error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Builds the today grid: items in order with their record for `today`.
    pub fn today_board(&self, today: NormalizedDay) -> RepoResult<TodayBoard> {
        let items = self.items.list_items()?;
        let mut lookup = completion_lookup(self.records.list_records_for_day(today)?);
        let cards = items
            .into_iter()
            .map(|item| {
                let record = lookup.remove(&item.id);
                let is_completed = record
                    .as_ref()
                    .is_some_and(|record| record.is_completed(Some(&item)));
                BoardCard {
                    item,
                    record,
                    is_completed,
                }
            })
            .collect();

        Ok(TodayBoard { day: today, cards })
    }

    fn toggle_inner(
        &self,
        item_id: ItemId,
        today: NormalizedDay,
    ) -> Result<ToggleOutcome, CheckInServiceError> {
        let item = self
            .items
            .get_item(item_id)?
            .ok_or(CheckInServiceError::ItemNotFound(item_id))?;

        match self.records.find_record(item.id, today)? {
            Some(record) if record.is_completed(Some(&item)) => {
                self.records.delete_record(record.id)?;
                Ok(ToggleOutcome::Cleared(record.id))
            }
            Some(mut record) => {
                record.complete_for(&item);
                self.records.update_record(&record)?;
                Ok(ToggleOutcome::Completed(record))
            }
            None => {
                let record = CheckInRecord::completed_for(&item, today);
                self.records.insert_record(&record)?;
                Ok(ToggleOutcome::Created(record))
            }
        }
    }

    fn create_new(
        &self,
        title: &str,
        icon: String,
        request: &ItemRequest,
        target_count: u32,
    ) -> Result<CheckInItem, CheckInServiceError> {
        let created_at = request
            .created_at
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let item = CheckInItem::new(
            title,
            request.category,
            icon,
            request.color,
            i64::from(target_count),
            created_at,
        );
        self.items.create_item(&item)?;
        Ok(item)
    }

    fn update_existing(
        &self,
        id: ItemId,
        title: &str,
        icon: String,
        request: &ItemRequest,
        target_count: u32,
    ) -> Result<CheckInItem, CheckInServiceError> {
        let mut item = self
            .items
            .get_item(id)?
            .ok_or(CheckInServiceError::ItemNotFound(id))?;
        item.title = title.to_string();
        item.category = request.category;
        item.icon = icon;
        item.color = request.color;
        item.target_count = target_count;
        self.items.update_item(&item)?;
        Ok(item)
    }
}
