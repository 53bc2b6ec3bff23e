//! The `logs` collection: one row per calendar date.
//!
//! Saving a log for an existing date replaces the row (upsert), so the
//! collection never holds two records for the same day.

use super::db::Db;
use crate::libs::daily_log::{date_key, parse_date_key, DailyLog, LogBook};
use crate::libs::error::Result;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

const UPSERT_LOG: &str = "INSERT INTO logs (date, fasting_hours, weight, hydration, mood, notes, completed, protocol)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(date) DO UPDATE SET
        fasting_hours = excluded.fasting_hours,
        weight = excluded.weight,
        hydration = excluded.hydration,
        mood = excluded.mood,
        notes = excluded.notes,
        completed = excluded.completed,
        protocol = excluded.protocol";
const SELECT_LOG: &str = "SELECT date, fasting_hours, weight, hydration, mood, notes, completed, protocol FROM logs WHERE date = ?1";
const SELECT_ALL_LOGS: &str = "SELECT date, fasting_hours, weight, hydration, mood, notes, completed, protocol FROM logs ORDER BY date";
const DELETE_LOG: &str = "DELETE FROM logs WHERE date = ?1";
const COUNT_LOGS: &str = "SELECT COUNT(*) FROM logs";

pub struct Logs<'a> {
    db: &'a Db,
}

impl<'a> Logs<'a> {
    pub fn new(db: &'a Db) -> Self {
        Logs { db }
    }

    /// Inserts or replaces the log for `log.date`.
    pub fn put(&self, log: &DailyLog) -> Result<()> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                UPSERT_LOG,
                params![
                    log.key(),
                    log.fasting_hours,
                    log.weight,
                    log.hydration,
                    log.mood,
                    log.notes,
                    log.completed,
                    log.protocol,
                ],
            )?;
            tx.commit()
        })
    }

    pub fn get(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        self.db
            .with_conn(|conn| conn.query_row(SELECT_LOG, [date_key(date)], map_log).optional())
            .map(Option::flatten)
    }

    /// Every stored log keyed by date.
    ///
    /// Rows whose key is not a valid date cannot have been written by
    /// [`Logs::put`] and are skipped.
    pub fn get_all(&self) -> Result<LogBook> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(SELECT_ALL_LOGS)?;
            let rows = stmt.query_map([], map_log)?;
            let mut logs = LogBook::new();
            for row in rows {
                if let Some(log) = row? {
                    logs.insert(log.date, log);
                }
            }
            Ok(logs)
        })
    }

    /// Removes the log for `date`; returns whether a row existed.
    pub fn delete(&self, date: NaiveDate) -> Result<bool> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            let deleted = tx.execute(DELETE_LOG, [date_key(date)])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
    }

    pub fn count(&self) -> Result<usize> {
        self.db
            .with_conn(|conn| conn.query_row(COUNT_LOGS, [], |row| row.get::<_, i64>(0)))
            .map(|count| count as usize)
    }
}

fn map_log(row: &Row<'_>) -> rusqlite::Result<Option<DailyLog>> {
    let key: String = row.get(0)?;
    let Some(date) = parse_date_key(&key) else {
        return Ok(None);
    };
    Ok(Some(DailyLog {
        date,
        fasting_hours: row.get(1)?,
        weight: row.get(2)?,
        hydration: row.get(3)?,
        mood: row.get(4)?,
        notes: row.get(5)?,
        completed: row.get(6)?,
        protocol: row.get(7)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::DEFAULT_BUSY_TIMEOUT;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_put_is_an_upsert() {
        let dir = tempfile::tempdir().unwrap();
        let db = Db::open(dir.path().join("logs.db"), DEFAULT_BUSY_TIMEOUT).unwrap();
        let logs = db.logs();

        let mut log = DailyLog::new(date(2024, 2, 1));
        log.fasting_hours = 14.0;
        logs.put(&log).unwrap();

        log.fasting_hours = 18.0;
        log.weight = Some(80.5);
        log.mood = Some(4);
        logs.put(&log).unwrap();

        assert_eq!(logs.count().unwrap(), 1);
        assert_eq!(logs.get(log.date).unwrap(), Some(log));
    }

    #[test]
    fn test_get_all_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let db = Db::open(dir.path().join("logs.db"), DEFAULT_BUSY_TIMEOUT).unwrap();
        let logs = db.logs();

        for day in [3, 1, 2] {
            logs.put(&DailyLog::new(date(2024, 2, day))).unwrap();
        }

        let all = logs.get_all().unwrap();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 3)]);

        assert!(logs.delete(date(2024, 2, 2)).unwrap());
        assert!(!logs.delete(date(2024, 2, 2)).unwrap());
        assert_eq!(logs.get(date(2024, 2, 2)).unwrap(), None);
        assert_eq!(logs.count().unwrap(), 2);
    }
}
