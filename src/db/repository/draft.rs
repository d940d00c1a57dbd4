//! Draft slots: local recovery storage for in-progress forms.
//!
//! One slot per form, keyed by `{form kind}:{record id}`. The payload is
//! the full JSON-serialized draft; it survives reloads until the form is
//! successfully submitted or explicitly discarded.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{open_database, open_memory_database, DatabaseError};

/// A stored draft slot.
#[derive(Debug, Clone)]
pub struct DraftSlot {
    pub slot_key: String,
    pub payload: String,
    pub saved_at: DateTime<Utc>,
}

pub fn upsert_draft(conn: &Connection, slot_key: &str, payload: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO drafts (slot_key, payload, saved_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(slot_key) DO UPDATE SET payload = ?2, saved_at = ?3",
        params![slot_key, payload, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn load_draft(conn: &Connection, slot_key: &str) -> Result<Option<DraftSlot>, DatabaseError> {
    let slot = conn
        .query_row(
            "SELECT slot_key, payload, saved_at FROM drafts WHERE slot_key = ?1",
            params![slot_key],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    slot.map(|(slot_key, payload, saved_at)| {
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("Bad saved_at: {e}")))?
            .with_timezone(&Utc);
        Ok(DraftSlot { slot_key, payload, saved_at })
    })
    .transpose()
}

pub fn clear_draft(conn: &Connection, slot_key: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM drafts WHERE slot_key = ?1", params![slot_key])?;
    Ok(())
}

pub fn list_drafts(conn: &Connection) -> Result<Vec<DraftSlot>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT slot_key, payload, saved_at FROM drafts ORDER BY saved_at DESC")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut slots = Vec::new();
    for row in rows {
        let (slot_key, payload, saved_at) = row?;
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("Bad saved_at: {e}")))?
            .with_timezone(&Utc);
        slots.push(DraftSlot { slot_key, payload, saved_at });
    }
    Ok(slots)
}

/// Shared handle to the drafts database, usable from the auto-save task.
pub struct DraftStore {
    conn: Mutex<Connection>,
}

impl DraftStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self { conn: Mutex::new(open_database(path)?) })
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self { conn: Mutex::new(open_memory_database()?) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DatabaseError> {
        self.conn
            .lock()
            .map_err(|_| DatabaseError::ConstraintViolation("drafts store lock poisoned".into()))
    }

    pub fn save(&self, slot_key: &str, payload: &str) -> Result<(), DatabaseError> {
        upsert_draft(&*self.lock()?, slot_key, payload)
    }

    pub fn load(&self, slot_key: &str) -> Result<Option<DraftSlot>, DatabaseError> {
        load_draft(&*self.lock()?, slot_key)
    }

    pub fn clear(&self, slot_key: &str) -> Result<(), DatabaseError> {
        clear_draft(&*self.lock()?, slot_key)
    }

    pub fn list(&self) -> Result<Vec<DraftSlot>, DatabaseError> {
        list_drafts(&*self.lock()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_load_round_trips() {
        let conn = open_memory_database().unwrap();
        upsert_draft(&conn, "patient:abc", r#"{"firstName":"Maria"}"#).unwrap();

        let slot = load_draft(&conn, "patient:abc").unwrap().unwrap();
        assert_eq!(slot.payload, r#"{"firstName":"Maria"}"#);
    }

    #[test]
    fn upsert_overwrites_existing_slot() {
        let conn = open_memory_database().unwrap();
        upsert_draft(&conn, "initial_visit:v1", r#"{"draft":1}"#).unwrap();
        upsert_draft(&conn, "initial_visit:v1", r#"{"draft":2}"#).unwrap();

        let slot = load_draft(&conn, "initial_visit:v1").unwrap().unwrap();
        assert_eq!(slot.payload, r#"{"draft":2}"#);
        assert_eq!(list_drafts(&conn).unwrap().len(), 1);
    }

    #[test]
    fn clear_removes_slot() {
        let conn = open_memory_database().unwrap();
        upsert_draft(&conn, "followup_visit:v2", "{}").unwrap();
        clear_draft(&conn, "followup_visit:v2").unwrap();
        assert!(load_draft(&conn, "followup_visit:v2").unwrap().is_none());
    }

    #[test]
    fn missing_slot_loads_none() {
        let conn = open_memory_database().unwrap();
        assert!(load_draft(&conn, "patient:nope").unwrap().is_none());
    }

    #[test]
    fn store_is_shareable() {
        let store = std::sync::Arc::new(DraftStore::in_memory().unwrap());
        let store2 = std::sync::Arc::clone(&store);
        store.save("patient:x", "{}").unwrap();
        assert!(store2.load("patient:x").unwrap().is_some());
    }
}
