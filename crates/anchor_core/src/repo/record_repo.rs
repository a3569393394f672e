//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-day completion rows keyed by `(item_uuid, day)`.
//! - Answer the day-bucket queries behind the today board.
//!
//! # Invariants
//! - At most one record exists per item and normalized day.
//! - Rows are removed with their item through `ON DELETE CASCADE`.

use crate::model::day::{NormalizedDay, DAY_MILLIS};
use crate::model::item::ItemId;
use crate::model::record::{CheckInRecord, RecordId};
use crate::repo::item_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    item_uuid,
    day,
    count
FROM records";

/// Repository interface for daily record operations.
pub trait RecordRepository {
    /// Finds the record for one item on one day.
    fn find_record(&self, item_id: ItemId, day: NormalizedDay)
        -> RepoResult<Option<CheckInRecord>>;
    /// Lists every record dated `day`.
    fn list_records_for_day(&self, day: NormalizedDay) -> RepoResult<Vec<CheckInRecord>>;
    fn insert_record(&self, record: &CheckInRecord) -> RepoResult<RecordId>;
    /// Rewrites `count` and `item_uuid` of an existing record.
    fn update_record(&self, record: &CheckInRecord) -> RepoResult<()>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn find_record(
        &self,
        item_id: ItemId,
        day: NormalizedDay,
    ) -> RepoResult<Option<CheckInRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE item_uuid = ?1
               AND day = ?2;"
        ))?;

        let mut rows = stmt.query(params![item_id.to_string(), day.epoch_ms()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_records_for_day(&self, day: NormalizedDay) -> RepoResult<Vec<CheckInRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE day = ?1
             ORDER BY item_uuid ASC;"
        ))?;
        let mut rows = stmt.query([day.epoch_ms()])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn insert_record(&self, record: &CheckInRecord) -> RepoResult<RecordId> {
        let item_id = record
            .item_id
            .ok_or(RepoError::MissingItemReference(record.id))?;

        self.conn.execute(
            "INSERT INTO records (
                uuid,
                item_uuid,
                day,
                count
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                record.id.to_string(),
                item_id.to_string(),
                record.day.epoch_ms(),
                record.count,
            ],
        )?;

        Ok(record.id)
    }

    fn update_record(&self, record: &CheckInRecord) -> RepoResult<()> {
        let item_id = record
            .item_id
            .ok_or(RepoError::MissingItemReference(record.id))?;

        let changed = self.conn.execute(
            "UPDATE records
             SET
                item_uuid = ?1,
                count = ?2
             WHERE uuid = ?3;",
            params![item_id.to_string(), record.count, record.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::RecordNotFound(record.id));
        }

        Ok(())
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::RecordNotFound(id));
        }

        Ok(())
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<CheckInRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in records.uuid"))
    })?;

    let item_text: String = row.get("item_uuid")?;
    let item_id = Uuid::parse_str(&item_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{item_text}` in records.item_uuid"
        ))
    })?;

    let day = row.get::<_, i64>("day")?;
    if day.rem_euclid(DAY_MILLIS) != 0 {
        return Err(RepoError::InvalidData(format!(
            "unnormalized day `{day}` in records.day"
        )));
    }

    let count = row.get::<_, i64>("count")?;
    let count = u32::try_from(count).map_err(|_| {
        RepoError::InvalidData(format!("invalid count `{count}` in records.count"))
    })?;

    Ok(CheckInRecord {
        id,
        day: NormalizedDay::from_epoch_ms(day),
        count,
        item_id: Some(item_id),
    })
}
