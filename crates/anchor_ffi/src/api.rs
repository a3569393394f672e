//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level check-in functions to Dart via FRB.
//! - Convert core errors into envelopes the UI shows in its alert.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every write goes through `CheckInService`, so the shared change feed
//!   sees each committed mutation.

use anchor_core::db::open_db;
use anchor_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    sqlite_service, BoardCard, Category, ChangeFeed, CheckInItem, ItemId, ItemRequest,
    NormalizedDay, SqliteCheckInService, ThemeColor, ICON_SUGGESTIONS,
};
use log::warn;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

const DB_PATH_ENV: &str = "ANCHOR_DB_PATH";
const DB_FILE_NAME: &str = "anchor.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CHANGE_FEED: Lazy<Arc<ChangeFeed>> = Lazy::new(|| Arc::new(ChangeFeed::new()));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Item projection sent to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item_id: String,
    pub title: String,
    /// Category storage id (`wellness|fitness|...`).
    pub category: String,
    pub icon: String,
    /// Color storage id (`ember|mint|...`).
    pub color: String,
    pub target_count: u32,
    pub created_at: i64,
}

/// One card of the today grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub item: ItemView,
    /// Today's progress; 0 when no record exists.
    pub count: u32,
    pub is_completed: bool,
}

/// Picker entry for categories and colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
}

/// Static picker data for the add-item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResponse {
    pub categories: Vec<CatalogEntry>,
    pub colors: Vec<CatalogEntry>,
    pub icon_suggestions: Vec<String>,
}

/// Item list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListResponse {
    pub ok: bool,
    pub items: Vec<ItemView>,
    pub message: String,
}

/// Today grid envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayResponse {
    pub ok: bool,
    /// UTC midnight of the board day in epoch milliseconds.
    pub day_epoch_ms: i64,
    pub cards: Vec<CardView>,
    pub completed_count: u32,
    pub message: String,
}

/// Generic action envelope for item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub ok: bool,
    pub item_id: Option<String>,
    pub message: String,
}

impl ItemActionResponse {
    fn success(message: impl Into<String>, item_id: ItemId) -> Self {
        Self {
            ok: true,
            item_id: Some(item_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Toggle envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    pub ok: bool,
    /// Completion state after the toggle; `false` on failure.
    pub is_completed: bool,
    pub message: String,
}

/// Returns categories, colors and icon suggestions in picker order.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_catalog() -> CatalogResponse {
    CatalogResponse {
        categories: Category::ALL
            .into_iter()
            .map(|category| CatalogEntry {
                id: category.as_str().to_string(),
                display_name: category.display_name().to_string(),
            })
            .collect(),
        colors: ThemeColor::ALL
            .into_iter()
            .map(|color| CatalogEntry {
                id: color.as_str().to_string(),
                display_name: color.display_name().to_string(),
            })
            .collect(),
        icon_suggestions: ICON_SUGGESTIONS.iter().map(|icon| icon.to_string()).collect(),
    }
}

/// Current change-feed revision; the UI re-reads when it moves.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_revision() -> u64 {
    CHANGE_FEED.revision()
}

/// Lists items in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_list_items() -> ItemListResponse {
    match with_service(|service| service.list_items().map_err(|err| err.to_string())) {
        Ok(items) => ItemListResponse {
            ok: true,
            message: format!("{} item(s).", items.len()),
            items: items.iter().map(to_item_view).collect(),
        },
        Err(err) => ItemListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("checkin_list_items failed: {err}"),
        },
    }
}

/// Builds the today grid for the current UTC day.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_today() -> TodayResponse {
    let today = NormalizedDay::today();
    match with_service(|service| service.today_board(today).map_err(|err| err.to_string())) {
        Ok(board) => TodayResponse {
            ok: true,
            day_epoch_ms: board.day.epoch_ms(),
            completed_count: u32::try_from(board.completed_count()).unwrap_or(u32::MAX),
            message: if board.is_empty() {
                "Create your first check-in.".to_string()
            } else {
                String::new()
            },
            cards: board.cards.iter().map(to_card_view).collect(),
        },
        Err(err) => TodayResponse {
            ok: false,
            day_epoch_ms: today.epoch_ms(),
            cards: Vec::new(),
            completed_count: 0,
            message: format!("checkin_today failed: {err}"),
        },
    }
}

/// Creates an item from the add form.
///
/// # FFI contract
/// - Blank `title` fails with `ok=false`; the UI keeps save disabled for it.
/// - Blank `icon` stores the fallback glyph; `target_count` clamps to 1..=20.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_create_item(
    title: String,
    category: String,
    icon: String,
    color: String,
    target_count: i64,
) -> ItemActionResponse {
    save_item(None, title, category, icon, color, target_count, "Check-in created.")
}

/// Edits an existing item; id and creation time are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_update_item(
    item_id: String,
    title: String,
    category: String,
    icon: String,
    color: String,
    target_count: i64,
) -> ItemActionResponse {
    let id = match parse_item_id(&item_id) {
        Ok(id) => id,
        Err(err) => return ItemActionResponse::failure(err),
    };
    save_item(Some(id), title, category, icon, color, target_count, "Check-in updated.")
}

/// Toggles today's completion for one item.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_toggle(item_id: String) -> ToggleResponse {
    let result = parse_item_id(&item_id).and_then(|id| {
        with_service(|service| {
            service
                .toggle_completion_today(id)
                .map_err(|err| err.user_message())
        })
    });

    match result {
        Ok(outcome) => ToggleResponse {
            ok: true,
            is_completed: outcome.is_completed(),
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_toggle module=ffi status=error error={err}");
            ToggleResponse {
                ok: false,
                is_completed: false,
                message: err,
            }
        }
    }
}

/// Deletes an item and its records.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_delete_item(item_id: String) -> ItemActionResponse {
    let result = parse_item_id(&item_id).and_then(|id| {
        with_service(|service| {
            service
                .delete_item(id)
                .map(|()| id)
                .map_err(|err| err.user_message())
        })
    });

    match result {
        Ok(id) => ItemActionResponse::success("Check-in deleted.", id),
        Err(err) => ItemActionResponse::failure(format!("checkin_delete_item failed: {err}")),
    }
}

fn save_item(
    id: Option<ItemId>,
    title: String,
    category: String,
    icon: String,
    color: String,
    target_count: i64,
    success_message: &str,
) -> ItemActionResponse {
    let request = match build_request(id, title, &category, icon, &color, target_count) {
        Ok(request) => request,
        Err(err) => return ItemActionResponse::failure(err),
    };

    match with_service(|service| {
        service
            .upsert_item(&request)
            .map_err(|err| err.user_message())
    }) {
        Ok(item) => ItemActionResponse::success(success_message, item.id),
        Err(err) => {
            warn!("event=ffi_save_item module=ffi status=error error={err}");
            ItemActionResponse::failure(err)
        }
    }
}

fn build_request(
    id: Option<ItemId>,
    title: String,
    category: &str,
    icon: String,
    color: &str,
    target_count: i64,
) -> Result<ItemRequest, String> {
    Ok(ItemRequest {
        id,
        title,
        category: Category::from_str(category).map_err(|err| err.to_string())?,
        icon,
        color: ThemeColor::from_str(color).map_err(|err| err.to_string())?,
        target_count,
        created_at: None,
    })
}

fn parse_item_id(raw: &str) -> Result<ItemId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid item id `{raw}`"))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_service<T>(
    f: impl FnOnce(&SqliteCheckInService<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("check-in DB open failed: {err}"))?;
    let service = sqlite_service(&conn, Arc::clone(&CHANGE_FEED));
    f(&service)
}

fn to_item_view(item: &CheckInItem) -> ItemView {
    ItemView {
        item_id: item.id.to_string(),
        title: item.title.clone(),
        category: item.category.as_str().to_string(),
        icon: item.icon.clone(),
        color: item.color.as_str().to_string(),
        target_count: item.target_count,
        created_at: item.created_at,
    }
}

fn to_card_view(card: &BoardCard) -> CardView {
    CardView {
        item: to_item_view(&card.item),
        count: card.record.as_ref().map_or(0, |record| record.count),
        is_completed: card.is_completed,
    }
}
