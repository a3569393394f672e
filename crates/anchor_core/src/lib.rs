//! Core domain logic for the Anchor daily check-in app.
//! This crate is the single source of truth for item/record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::day::{normalized_day, NormalizedDay, DAY_MILLIS};
pub use model::item::{
    clamp_target_count, sample_items, sanitize_icon, Category, CheckInItem, ItemId,
    ItemValidationError, ThemeColor, FALLBACK_ICON, ICON_SUGGESTIONS, TARGET_COUNT_MAX,
    TARGET_COUNT_MIN,
};
pub use model::record::{clamp_count, CheckInRecord, RecordId};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use repo::record_repo::{RecordRepository, SqliteRecordRepository};
pub use service::change_feed::{ChangeFeed, StoreChange, SubscriptionId};
pub use service::checkin_service::{
    completion_lookup, BoardCard, CheckInService, CheckInServiceError, ItemRequest,
    TodayBoard, ToggleOutcome,
};

/// SQLite-backed service type used by FFI and CLI callers.
pub type SqliteCheckInService<'conn> =
    CheckInService<SqliteItemRepository<'conn>, SqliteRecordRepository<'conn>>;

/// Builds a SQLite-backed service over one migrated connection.
pub fn sqlite_service(
    conn: &rusqlite::Connection,
    feed: std::sync::Arc<ChangeFeed>,
) -> SqliteCheckInService<'_> {
    CheckInService::with_feed(
        SqliteItemRepository::new(conn),
        SqliteRecordRepository::new(conn),
        feed,
    )
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
