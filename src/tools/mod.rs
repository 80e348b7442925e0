//! Wellness Tools module
//!
//! MCP tool implementations for the Student Wellness Tracker.

pub mod days;
pub mod energy;
pub mod macros;
pub mod measurements;
pub mod profile;
pub mod status;
pub mod trends;

use chrono::NaiveDate;
use serde::Serialize;

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Parse an ISO date (YYYY-MM-DD)
pub(crate) fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", date))
}

/// Parse a date and return it in the zero-padded form days are stored under
pub(crate) fn normalize_date(date: &str) -> Result<String, String> {
    parse_date(date).map(|d| d.format("%Y-%m-%d").to_string())
}
