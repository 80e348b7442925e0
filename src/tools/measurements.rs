//! Measurement MCP Tools
//!
//! Tools for logging sleep, steps and body weight against a day.

use serde::Serialize;

use super::{normalize_date, DeleteResponse};
use crate::db::Database;
use crate::models::{Day, Measurement, MeasurementCreate, MeasurementType};
use crate::nutrition::WeightUnit;

/// Response for the log_* measurement tools
#[derive(Debug, Serialize)]
pub struct LogMeasurementResponse {
    pub date: String,
    pub measurement: Measurement,
    /// What the value was converted from, if it was not stored as given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_from: Option<String>,
}

fn log_measurement(
    db: &Database,
    user_id: &str,
    date: &str,
    measurement_type: MeasurementType,
    value: f64,
    notes: Option<&str>,
) -> Result<LogMeasurementResponse, String> {
    let date = normalize_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_or_create(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get or create day: {}", e))?;

    let measurement = Measurement::create(
        &conn,
        &MeasurementCreate {
            day_id: day.id,
            measurement_type,
            value,
            timestamp: None,
            notes: notes.map(String::from),
        },
    )
    .map_err(|e| format!("Failed to log {}: {}", measurement_type.as_str(), e))?;

    tracing::info!(user_id, date = %day.date, kind = measurement_type.as_str(), value, "Logged measurement");
    Ok(LogMeasurementResponse {
        date: day.date,
        measurement,
        converted_from: None,
    })
}

/// Log hours slept, attributed to `date`
pub fn log_sleep(
    db: &Database,
    user_id: &str,
    date: &str,
    hours: f64,
    notes: Option<&str>,
) -> Result<LogMeasurementResponse, String> {
    if !hours.is_finite() || hours <= 0.0 || hours > 24.0 {
        return Err(format!("Sleep hours must be more than 0 and at most 24 (got {})", hours));
    }

    log_measurement(db, user_id, date, MeasurementType::Sleep, hours, notes)
}

/// Log a step count
pub fn log_steps(
    db: &Database,
    user_id: &str,
    date: &str,
    steps: i64,
    notes: Option<&str>,
) -> Result<LogMeasurementResponse, String> {
    if steps < 0 {
        return Err(format!("Steps cannot be negative (got {})", steps));
    }

    log_measurement(db, user_id, date, MeasurementType::Steps, steps as f64, notes)
}

/// Log body weight. Kilograms are converted; weight is always stored in pounds.
pub fn log_weight(
    db: &Database,
    user_id: &str,
    date: &str,
    value: f64,
    unit: Option<&str>,
    notes: Option<&str>,
) -> Result<LogMeasurementResponse, String> {
    let unit = match unit {
        Some(u) => WeightUnit::from_str(u)
            .ok_or_else(|| format!("Invalid weight unit '{}'. Use lbs or kg.", u))?,
        None => WeightUnit::Pounds,
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("Weight must be a positive number (got {})", value));
    }

    let pounds = unit.to_pounds(value);
    let mut response =
        log_measurement(db, user_id, date, MeasurementType::Weight, pounds, notes)?;

    if unit == WeightUnit::Kilograms {
        response.converted_from = Some(format!("{} {}", value, unit.as_str()));
    }
    Ok(response)
}

/// Delete a measurement
pub fn delete_measurement(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Measurement::delete(&conn, id)
        .map_err(|e| format!("Failed to delete measurement: {}", e))?;

    Ok(DeleteResponse { id, deleted })
}
