//! Trend MCP Tools
//!
//! Per-day rollups and averages over a date range.

use std::collections::BTreeMap;

use serde::Serialize;

use super::parse_date;
use crate::db::Database;
use crate::models::{
    calculate_day_nutrition, Day, Measurement, MeasurementType, Nutrition, Profile,
};

/// Longest range get_trends will cover
pub const MAX_TREND_DAYS: i64 = 366;

/// One day's rollup
#[derive(Debug, Default, Serialize)]
pub struct TrendDay {
    pub date: String,
    pub nutrition: Nutrition,
    pub sleep_hours: Option<f64>,
    pub steps: Option<f64>,
    pub weight_pounds: Option<f64>,
}

/// Averages over the days that have data for each series
#[derive(Debug, Serialize)]
pub struct TrendAverages {
    pub calories: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub steps: Option<f64>,
    /// Last weight minus first weight in the range
    pub weight_change_pounds: Option<f64>,
}

/// Response for get_trends
#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub start_date: String,
    pub end_date: String,
    pub calorie_goal: Option<i64>,
    pub days: Vec<TrendDay>,
    pub averages: TrendAverages,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn averages(days: &[TrendDay]) -> TrendAverages {
    let weights: Vec<f64> = days.iter().filter_map(|d| d.weight_pounds).collect();

    TrendAverages {
        calories: mean(
            days.iter()
                .map(|d| d.nutrition.calories)
                .filter(|c| *c > 0.0),
        ),
        sleep_hours: mean(days.iter().filter_map(|d| d.sleep_hours)),
        steps: mean(days.iter().filter_map(|d| d.steps)),
        weight_change_pounds: match (weights.first(), weights.last()) {
            (Some(first), Some(last)) if weights.len() > 1 => Some(last - first),
            _ => None,
        },
    }
}

/// Daily calories, sleep, steps and weight between two dates (inclusive)
pub fn get_trends(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<TrendsResponse, String> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if start > end {
        return Err(format!("start_date {} is after end_date {}", start, end));
    }
    let span = (end - start).num_days() + 1;
    if span > MAX_TREND_DAYS {
        return Err(format!(
            "Range covers {} days; the most is {}",
            span, MAX_TREND_DAYS
        ));
    }

    let start_date = start.format("%Y-%m-%d").to_string();
    let end_date = end.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut by_date: BTreeMap<String, TrendDay> = BTreeMap::new();

    let days = Day::list(&conn, user_id, Some(start_date.as_str()), Some(end_date.as_str()), span, 0)
        .map_err(|e| format!("Failed to list days: {}", e))?;
    for day in days {
        let nutrition = calculate_day_nutrition(&conn, day.id)
            .map_err(|e| format!("Failed to total day: {}", e))?;
        by_date.insert(
            day.date.clone(),
            TrendDay {
                date: day.date,
                nutrition,
                ..Default::default()
            },
        );
    }

    let measurements = Measurement::list_by_date_range(&conn, user_id, &start_date, &end_date)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;
    for dated in measurements {
        let entry = by_date.entry(dated.date.clone()).or_insert_with(|| TrendDay {
            date: dated.date.clone(),
            ..Default::default()
        });
        let m = dated.measurement;
        match m.measurement_type {
            MeasurementType::Sleep => *entry.sleep_hours.get_or_insert(0.0) += m.value,
            MeasurementType::Steps => *entry.steps.get_or_insert(0.0) += m.value,
            MeasurementType::Weight => entry.weight_pounds = Some(m.value),
        }
    }

    let calorie_goal = Profile::get(&conn, user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .and_then(|p| p.calorie_goal);

    let days: Vec<TrendDay> = by_date.into_values().collect();
    let averages = averages(&days);

    Ok(TrendsResponse {
        start_date,
        end_date,
        calorie_goal,
        days,
        averages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::days::log_meal;
    use crate::tools::measurements::{log_sleep, log_steps, log_weight};

    fn meal(calories: f64) -> Nutrition {
        Nutrition { calories, protein: 0.0, carbs: 0.0, fat: 0.0 }
    }

    #[test]
    fn test_trends_rollup() {
        let db = Database::in_memory().unwrap();
        log_meal(&db, "u1", "2025-03-01", "lunch", "Bowl", meal(1800.0), None).unwrap();
        log_meal(&db, "u1", "2025-03-03", "lunch", "Bowl", meal(2200.0), None).unwrap();
        log_sleep(&db, "u1", "2025-03-02", 8.0, None).unwrap();
        log_sleep(&db, "u1", "2025-03-03", 6.0, None).unwrap();
        log_steps(&db, "u1", "2025-03-03", 10000, None).unwrap();
        log_weight(&db, "u1", "2025-03-01", 161.0, None, None).unwrap();
        log_weight(&db, "u1", "2025-03-03", 159.5, None, None).unwrap();
        // outside the range
        log_meal(&db, "u1", "2025-03-05", "lunch", "Bowl", meal(5000.0), None).unwrap();

        let trends = get_trends(&db, "u1", "2025-03-01", "2025-03-03").unwrap();
        let dates: Vec<_> = trends.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-03-02", "2025-03-03"]);

        assert_eq!(trends.averages.calories, Some(2000.0));
        assert_eq!(trends.averages.sleep_hours, Some(7.0));
        assert_eq!(trends.averages.steps, Some(10000.0));
        assert_eq!(trends.averages.weight_change_pounds, Some(-1.5));
        assert_eq!(trends.calorie_goal, None);
    }

    #[test]
    fn test_trends_empty_range() {
        let db = Database::in_memory().unwrap();
        let trends = get_trends(&db, "u1", "2025-03-01", "2025-03-31").unwrap();

        assert!(trends.days.is_empty());
        assert!(trends.averages.calories.is_none());
        assert!(trends.averages.weight_change_pounds.is_none());
    }

    #[test]
    fn test_trends_range_checks() {
        let db = Database::in_memory().unwrap();

        assert!(get_trends(&db, "u1", "2025-03-02", "2025-03-01").is_err());
        assert!(get_trends(&db, "u1", "2024-01-01", "2025-01-01").is_err());
        assert!(get_trends(&db, "u1", "2025-01-01", "2025-12-31").is_ok());
        assert!(get_trends(&db, "u1", "soon", "2025-12-31").is_err());
    }
}
