//! Day model
//!
//! Per-user container for meal entries and measurements.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A day container for meal entries and measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub id: i64,
    pub user_id: String,
    pub date: String, // ISO date: "2025-01-09"
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Day {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a day by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM days WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(day) => Ok(Some(day)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user's day by date
    pub fn get_by_date(conn: &Connection, user_id: &str, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM days WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(day) => Ok(Some(day)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get or create a user's day by date
    pub fn get_or_create(conn: &Connection, user_id: &str, date: &str) -> DbResult<Self> {
        if let Some(day) = Self::get_by_date(conn, user_id, date)? {
            return Ok(day);
        }

        conn.execute(
            "INSERT INTO days (user_id, date) VALUES (?1, ?2)",
            params![user_id, date],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// List a user's days with optional date range, newest first
    pub fn list(
        conn: &Connection,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let (filter, mut params_vec) = Self::range_filter(user_id, start_date, end_date);
        let mut sql = format!("SELECT * FROM days WHERE {} ORDER BY date DESC", filter);

        params_vec.push(Box::new(limit));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));

        params_vec.push(Box::new(offset));
        sql.push_str(&format!(" OFFSET ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let days = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Count a user's days with optional date range
    pub fn count(
        conn: &Connection,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<i64> {
        let (filter, params_vec) = Self::range_filter(user_id, start_date, end_date);
        let sql = format!("SELECT COUNT(*) FROM days WHERE {}", filter);

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    fn range_filter(
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut filter = String::from("user_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            filter.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            filter.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        (filter, params_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_get_or_create_is_stable() {
        let conn = setup();
        let first = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();
        let second = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_days_are_per_user() {
        let conn = setup();
        let a = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();
        let b = Day::get_or_create(&conn, "u2", "2025-03-01").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(Day::count(&conn, "u1", None, None).unwrap(), 1);
    }

    #[test]
    fn test_list_with_range() {
        let conn = setup();
        for date in ["2025-03-01", "2025-03-02", "2025-03-03", "2025-03-04"] {
            Day::get_or_create(&conn, "u1", date).unwrap();
        }

        let days = Day::list(&conn, "u1", Some("2025-03-02"), Some("2025-03-03"), 10, 0).unwrap();
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-03", "2025-03-02"]);

        let page = Day::list(&conn, "u1", None, None, 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].date, "2025-03-03");
        assert_eq!(Day::count(&conn, "u1", Some("2025-03-02"), None).unwrap(), 3);
    }
}
