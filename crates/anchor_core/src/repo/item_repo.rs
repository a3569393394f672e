//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `CheckInItem::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list_items` orders by `created_at ASC, uuid ASC`.

use crate::db::DbError;
use crate::model::item::{
    Category, CheckInItem, ItemId, ItemValidationError, ThemeColor, TARGET_COUNT_MIN,
};
use crate::model::record::RecordId;
use rusqlite::{params, Connection, Row};
use thiserror::Error;
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    category,
    icon,
    color,
    target_count,
    created_at
FROM items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item/record persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(#[from] ItemValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),
    #[error("record {0} has no owning item")]
    MissingItemReference(RecordId),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn create_item(&self, item: &CheckInItem) -> RepoResult<ItemId>;
    /// Rewrites mutable fields; `id` and `created_at` are left untouched.
    fn update_item(&self, item: &CheckInItem) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<CheckInItem>>;
    fn list_items(&self) -> RepoResult<Vec<CheckInItem>>;
    /// Hard-deletes the item; its records go with it.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &CheckInItem) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (
                uuid,
                title,
                category,
                icon,
                color,
                target_count,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                item.category.as_str(),
                item.icon.as_str(),
                item.color.as_str(),
                item.target_count,
                item.created_at,
            ],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &CheckInItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                title = ?1,
                category = ?2,
                icon = ?3,
                color = ?4,
                target_count = ?5
             WHERE uuid = ?6;",
            params![
                item.title.as_str(),
                item.category.as_str(),
                item.icon.as_str(),
                item.color.as_str(),
                item.target_count,
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<CheckInItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self) -> RepoResult<Vec<CheckInItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }

        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<CheckInItem> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in items.uuid"))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in items.category"
        ))
    })?;

    let color_text: String = row.get("color")?;
    let color = ThemeColor::parse(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in items.color"))
    })?;

    let target_count = row.get::<_, i64>("target_count")?;
    let target_count = u32::try_from(target_count)
        .ok()
        .filter(|value| *value >= TARGET_COUNT_MIN)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid target_count `{target_count}` in items.target_count"
            ))
        })?;

    let item = CheckInItem {
        id,
        title: row.get("title")?,
        category,
        icon: row.get("icon")?,
        color,
        target_count,
        created_at: row.get("created_at")?,
    };
    item.validate()?;
    Ok(item)
}
