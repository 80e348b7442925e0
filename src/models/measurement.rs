//! Measurement model
//!
//! Daily habit measurements: sleep (hours), steps (count) and body weight
//! (stored in pounds).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Measurement type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Sleep,
    Steps,
    Weight,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Sleep => "sleep",
            MeasurementType::Steps => "steps",
            MeasurementType::Weight => "weight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sleep" => Some(MeasurementType::Sleep),
            "steps" | "step" => Some(MeasurementType::Steps),
            "weight" => Some(MeasurementType::Weight),
            _ => None,
        }
    }

    /// Unit values are stored in
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementType::Sleep => "hours",
            MeasurementType::Steps => "steps",
            MeasurementType::Weight => "lbs",
        }
    }
}

/// A single measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub day_id: i64,
    pub measurement_type: MeasurementType,
    pub value: f64,
    pub unit: String,
    pub timestamp: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for creating a measurement; `value` must already be in the type's unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementCreate {
    pub day_id: i64,
    pub measurement_type: MeasurementType,
    pub value: f64,
    pub timestamp: Option<String>,
    pub notes: Option<String>,
}

/// A measurement joined with its day's date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatedMeasurement {
    pub date: String,
    pub measurement: Measurement,
}

impl Measurement {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let type_str: String = row.get("measurement_type")?;
        let measurement_type = MeasurementType::from_str(&type_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                0,
                format!("measurement_type '{}'", type_str),
                rusqlite::types::Type::Text,
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            day_id: row.get("day_id")?,
            measurement_type,
            value: row.get("value")?,
            unit: row.get("unit")?,
            timestamp: row.get("timestamp")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new measurement
    pub fn create(conn: &Connection, data: &MeasurementCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO measurements (day_id, measurement_type, value, unit, timestamp, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.day_id,
                data.measurement_type.as_str(),
                data.value,
                data.measurement_type.unit(),
                timestamp,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a measurement by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM measurements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All measurements for a day, oldest first
    pub fn get_for_day(conn: &Connection, day_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM measurements WHERE day_id = ?1 ORDER BY timestamp, id",
        )?;
        let measurements = stmt
            .query_map([day_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    /// A user's measurements within a date range (inclusive), oldest first
    pub fn list_by_date_range(
        conn: &Connection,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<DatedMeasurement>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT m.*, d.date AS day_date FROM measurements m
            JOIN days d ON m.day_id = d.id
            WHERE d.user_id = ?1 AND d.date >= ?2 AND d.date <= ?3
            ORDER BY d.date, m.timestamp, m.id
            "#,
        )?;
        let measurements = stmt
            .query_map(params![user_id, start_date, end_date], |row| {
                Ok(DatedMeasurement {
                    date: row.get("day_date")?,
                    measurement: Self::from_row(row)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    /// Delete a measurement
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM measurements WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::Day;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn log(conn: &Connection, day_id: i64, measurement_type: MeasurementType, value: f64) -> Measurement {
        Measurement::create(
            conn,
            &MeasurementCreate {
                day_id,
                measurement_type,
                value,
                timestamp: None,
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_sets_unit() {
        let conn = setup();
        let day = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();

        let sleep = log(&conn, day.id, MeasurementType::Sleep, 7.5);
        assert_eq!(sleep.unit, "hours");
        let weight = log(&conn, day.id, MeasurementType::Weight, 160.0);
        assert_eq!(weight.unit, "lbs");

        assert_eq!(Measurement::get_for_day(&conn, day.id).unwrap().len(), 2);
    }

    #[test]
    fn test_list_by_date_range_filters_user_and_dates() {
        let conn = setup();
        let d1 = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();
        let d2 = Day::get_or_create(&conn, "u1", "2025-03-05").unwrap();
        let other = Day::get_or_create(&conn, "u2", "2025-03-01").unwrap();

        log(&conn, d1.id, MeasurementType::Steps, 8000.0);
        log(&conn, d2.id, MeasurementType::Steps, 12000.0);
        log(&conn, other.id, MeasurementType::Steps, 500.0);

        let found = Measurement::list_by_date_range(&conn, "u1", "2025-03-01", "2025-03-03").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, "2025-03-01");
        assert_eq!(found[0].measurement.value, 8000.0);
    }

    #[test]
    fn test_deleting_day_cascades() {
        let conn = setup();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        let day = Day::get_or_create(&conn, "u1", "2025-03-01").unwrap();
        let m = log(&conn, day.id, MeasurementType::Sleep, 8.0);

        conn.execute("DELETE FROM days WHERE id = ?1", [day.id]).unwrap();
        assert!(Measurement::get_by_id(&conn, m.id).unwrap().is_none());
    }
}
