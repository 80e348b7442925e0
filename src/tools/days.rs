//! Day and Meal Entry MCP Tools
//!
//! Tools for logging meals and viewing daily summaries.

use rusqlite::Connection;
use serde::Serialize;

use super::{normalize_date, DeleteResponse};
use crate::db::{Database, DbResult};
use crate::models::{
    calculate_day_nutrition, Day, MealEntry, MealEntryCreate, MealType, Measurement,
    MeasurementType, Nutrition, Profile,
};
use crate::nutrition::MacroGrams;
use crate::profile::MacroPlan;

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub id: i64,
    pub day_id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub name: String,
    pub nutrition: Nutrition,
    pub day_total: Nutrition,
}

/// Actual macro split of what was eaten, in percent of macro calories
#[derive(Debug, Serialize)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// Intake compared to the user's goal
#[derive(Debug, Serialize)]
pub struct DayProgress {
    pub calorie_goal: Option<i64>,
    pub calories_remaining: Option<f64>,
    pub targets: Option<MacroGrams>,
    pub actual_split: Option<MacroSplit>,
}

/// Habit totals for a day
#[derive(Debug, Default, Serialize)]
pub struct DayHabits {
    pub sleep_hours: Option<f64>,
    pub steps: Option<f64>,
    /// Last weight logged that day, in pounds
    pub weight_pounds: Option<f64>,
}

/// Day with meals and measurements
#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub id: i64,
    pub date: String,
    pub meals: Vec<MealEntry>,
    pub measurements: Vec<Measurement>,
    pub nutrition_total: Nutrition,
    pub habits: DayHabits,
    pub progress: DayProgress,
    pub notes: Option<String>,
}

/// Day summary for listing
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub id: i64,
    pub date: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_count: usize,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DaySummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Sum sleep and steps; keep the last weight
pub(crate) fn summarize_habits(measurements: &[Measurement]) -> DayHabits {
    let mut habits = DayHabits::default();
    for m in measurements {
        match m.measurement_type {
            MeasurementType::Sleep => *habits.sleep_hours.get_or_insert(0.0) += m.value,
            MeasurementType::Steps => *habits.steps.get_or_insert(0.0) += m.value,
            MeasurementType::Weight => habits.weight_pounds = Some(m.value),
        }
    }
    habits
}

fn progress(total: &Nutrition, profile: Option<&Profile>) -> DayProgress {
    let plan = MacroPlan::for_profile(profile);

    DayProgress {
        calorie_goal: plan.calorie_goal,
        calories_remaining: plan.calorie_goal.map(|goal| goal as f64 - total.calories),
        targets: plan.grams,
        actual_split: total.macro_percentages().map(|(p, c, f)| MacroSplit {
            protein_pct: p,
            carbs_pct: c,
            fat_pct: f,
        }),
    }
}

// ============================================================================
// Meal Tools
// ============================================================================

/// Log a meal on a date (the day is created if needed)
pub fn log_meal(
    db: &Database,
    user_id: &str,
    date: &str,
    meal_type: &str,
    name: &str,
    nutrition: Nutrition,
    notes: Option<&str>,
) -> Result<LogMealResponse, String> {
    let date = normalize_date(date)?;
    if name.trim().is_empty() {
        return Err("Meal name cannot be empty".to_string());
    }
    for (field, value) in [
        ("calories", nutrition.calories),
        ("protein", nutrition.protein),
        ("carbs", nutrition.carbs),
        ("fat", nutrition.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be zero or more (got {})", field, value));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_or_create(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get or create day: {}", e))?;

    let entry = MealEntry::create(
        &conn,
        &MealEntryCreate {
            day_id: day.id,
            meal_type: MealType::from_str(meal_type),
            name: name.trim().to_string(),
            nutrition,
            notes: notes.map(String::from),
        },
    )
    .map_err(|e| format!("Failed to log meal: {}", e))?;

    let day_total = calculate_day_nutrition(&conn, day.id)
        .map_err(|e| format!("Failed to total day: {}", e))?;

    tracing::info!(user_id, date = %day.date, calories = nutrition.calories, "Logged meal");

    Ok(LogMealResponse {
        id: entry.id,
        day_id: day.id,
        date: day.date,
        meal_type: entry.meal_type,
        name: entry.name,
        nutrition: entry.nutrition,
        day_total,
    })
}

/// Delete a meal entry
pub fn delete_meal_entry(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = MealEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete meal entry: {}", e))?;

    Ok(DeleteResponse { id, deleted })
}

// ============================================================================
// Day Tools
// ============================================================================

fn day_detail(conn: &Connection, day: Day, profile: Option<&Profile>) -> DbResult<DayDetail> {
    let meals = MealEntry::get_for_day(conn, day.id)?;
    let measurements = Measurement::get_for_day(conn, day.id)?;
    let nutrition_total: Nutrition = meals.iter().map(|m| m.nutrition).sum();

    Ok(DayDetail {
        id: day.id,
        date: day.date,
        habits: summarize_habits(&measurements),
        progress: progress(&nutrition_total, profile),
        meals,
        measurements,
        nutrition_total,
        notes: day.notes,
    })
}

/// Get a day with meals, measurements and progress against the user's goal
pub fn get_day(db: &Database, user_id: &str, date: &str) -> Result<Option<DayDetail>, String> {
    let date = normalize_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_by_date(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get day: {}", e))?;

    let Some(day) = day else {
        return Ok(None);
    };

    let profile = Profile::get(&conn, user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    day_detail(&conn, day, profile.as_ref())
        .map(Some)
        .map_err(|e| format!("Failed to load day: {}", e))
}

/// List days with optional date range
pub fn list_days(
    db: &Database,
    user_id: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListDaysResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let start_date = start_date.map(normalize_date).transpose()?;
    let end_date = end_date.map(normalize_date).transpose()?;
    let (start_date, end_date) = (start_date.as_deref(), end_date.as_deref());

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let days = Day::list(&conn, user_id, start_date, end_date, limit, offset)
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let total = Day::count(&conn, user_id, start_date, end_date)
        .map_err(|e| format!("Failed to count days: {}", e))?;

    let mut summaries = Vec::new();
    for day in days {
        let entries = MealEntry::get_for_day(&conn, day.id)
            .map_err(|e| format!("Failed to get meal entries: {}", e))?;
        let total: Nutrition = entries.iter().map(|e| e.nutrition).sum();

        summaries.push(DaySummary {
            id: day.id,
            date: day.date,
            total_calories: total.calories,
            total_protein: total.protein,
            total_carbs: total.carbs,
            total_fat: total.fat,
            meal_count: entries.len(),
        });
    }

    Ok(ListDaysResponse {
        days: summaries,
        total,
        limit,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measurements::{log_sleep, log_steps};
    use crate::tools::profile::{update_profile, ProfileChanges};

    fn lunch() -> Nutrition {
        Nutrition { calories: 650.0, protein: 40.0, carbs: 70.0, fat: 20.0 }
    }

    #[test]
    fn test_log_meal_and_get_day() {
        let db = Database::in_memory().unwrap();
        update_profile(
            &db,
            "u1",
            ProfileChanges { calorie_goal: Some(2000), ..Default::default() },
        )
        .unwrap();

        log_meal(&db, "u1", "2025-03-01", "lunch", "Burrito bowl", lunch(), None).unwrap();
        let second =
            log_meal(&db, "u1", "2025-03-01", "snack", "Apple", Nutrition { calories: 95.0, protein: 0.5, carbs: 25.0, fat: 0.3 }, None)
                .unwrap();
        assert_eq!(second.day_total.calories, 745.0);

        log_sleep(&db, "u1", "2025-03-01", 6.5, None).unwrap();
        log_sleep(&db, "u1", "2025-03-01", 1.0, Some("nap")).unwrap();
        log_steps(&db, "u1", "2025-03-01", 9000, None).unwrap();

        let day = get_day(&db, "u1", "2025-03-01").unwrap().unwrap();
        assert_eq!(day.meals.len(), 2);
        assert_eq!(day.habits.sleep_hours, Some(7.5));
        assert_eq!(day.habits.steps, Some(9000.0));
        assert_eq!(day.habits.weight_pounds, None);
        assert_eq!(day.progress.calorie_goal, Some(2000));
        assert_eq!(day.progress.calories_remaining, Some(1255.0));
        assert_eq!(day.progress.targets.map(|t| t.protein_g), Some(125));
        assert!(day.progress.actual_split.is_some());
    }

    #[test]
    fn test_unpadded_dates_share_one_day() {
        let db = Database::in_memory().unwrap();
        let first = log_meal(&db, "u1", "2025-3-1", "lunch", "Bowl", lunch(), None).unwrap();
        let second = log_meal(&db, "u1", " 2025-03-01", "dinner", "Pasta", lunch(), None).unwrap();

        assert_eq!(first.date, "2025-03-01");
        assert_eq!(first.day_id, second.day_id);

        let day = get_day(&db, "u1", "2025-03-01").unwrap().unwrap();
        assert_eq!(day.meals.len(), 2);
        assert_eq!(get_day(&db, "u1", "2025-3-01").unwrap().unwrap().id, day.id);

        let listed = list_days(&db, "u1", Some("2025-3-1"), Some("2025-3-1"), 10, 0).unwrap();
        assert_eq!(listed.total, 1);
    }

    #[test]
    fn test_get_missing_day() {
        let db = Database::in_memory().unwrap();
        assert!(get_day(&db, "u1", "2025-03-01").unwrap().is_none());
        assert!(get_day(&db, "u1", "yesterday").is_err());
    }

    #[test]
    fn test_log_meal_validation() {
        let db = Database::in_memory().unwrap();
        let mut bad = lunch();
        bad.fat = -1.0;
        assert!(log_meal(&db, "u1", "2025-03-01", "lunch", "Bowl", bad, None).is_err());
        assert!(log_meal(&db, "u1", "2025-03-01", "lunch", "  ", lunch(), None).is_err());
        assert!(log_meal(&db, "u1", "2025-3-1x", "lunch", "Bowl", lunch(), None).is_err());
    }

    #[test]
    fn test_delete_meal_entry() {
        let db = Database::in_memory().unwrap();
        let logged = log_meal(&db, "u1", "2025-03-01", "dinner", "Pasta", lunch(), None).unwrap();

        assert!(delete_meal_entry(&db, logged.id).unwrap().deleted);
        assert!(!delete_meal_entry(&db, logged.id).unwrap().deleted);
    }

    #[test]
    fn test_list_days() {
        let db = Database::in_memory().unwrap();
        for date in ["2025-03-01", "2025-03-02", "2025-03-03"] {
            log_meal(&db, "u1", date, "lunch", "Bowl", lunch(), None).unwrap();
        }
        log_meal(&db, "u2", "2025-03-01", "lunch", "Bowl", lunch(), None).unwrap();

        let response = list_days(&db, "u1", None, None, 2, 0).unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.days.len(), 2);
        assert_eq!(response.days[0].date, "2025-03-03");
        assert_eq!(response.days[0].meal_count, 1);
        assert_eq!(response.days[0].total_calories, 650.0);
    }
}
