//! Wellness MCP Server Implementation
//!
//! Implements the MCP server with all wellness tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::Nutrition;
use crate::tools::energy::{self, BiometricOverrides};
use crate::tools::profile::{self, ProfileChanges};
use crate::tools::status::StatusTracker;
use crate::tools::{days, macros, measurements, trends};

/// Wellness MCP Service
#[derive(Clone)]
pub struct WellnessService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    /// User for calls that don't name one
    default_user_id: String,
    tool_router: ToolRouter<WellnessService>,
}

impl WellnessService {
    pub fn new(database_path: PathBuf, database: Database, default_user_id: String) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            default_user_id,
            tool_router: Self::tool_router(),
        }
    }

    fn user<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_user_id.as_str())
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile and Energy Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// User ID (defaults to the configured user)
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub user_id: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Height in inches
    pub height_inches: Option<f64>,
    /// Weight in pounds
    pub weight_pounds: Option<f64>,
    /// male or female
    pub sex: Option<String>,
    /// sedentary, light, moderate, heavy or athlete
    pub activity_level: Option<String>,
    /// Daily calorie goal (kcal)
    pub calorie_goal: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateTdeeParams {
    pub user_id: Option<String>,
    /// Age in years (falls back to the profile)
    pub age: Option<i64>,
    /// Height in inches (falls back to the profile)
    pub height_inches: Option<f64>,
    /// Weight in pounds (falls back to the profile)
    pub weight_pounds: Option<f64>,
    /// male or female (falls back to the profile)
    pub sex: Option<String>,
    /// sedentary, light, moderate, heavy or athlete (falls back to the profile)
    pub activity_level: Option<String>,
    /// Store the estimate as the profile's calorie goal
    #[serde(default)]
    pub apply_as_goal: bool,
}

// ============================================================================
// Macro Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveMacrosParams {
    pub user_id: Option<String>,
    /// Whole percent
    pub protein_pct: i64,
    /// Whole percent
    pub carbs_pct: i64,
    /// Whole percent
    pub fat_pct: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustMacrosPairParams {
    pub user_id: Option<String>,
    /// protein or carbs
    pub target: String,
    /// New percent for the target (give this or steps)
    pub value: Option<i64>,
    /// Number of 5% steps to move the target, may be negative (give this or value)
    pub steps: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustMacrosPositionParams {
    pub user_id: Option<String>,
    /// Position along the slider track, 0-100
    pub position: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMacroTargetsParams {
    pub user_id: Option<String>,
    /// Calorie goal to use instead of the stored one
    pub calorie_goal: Option<i64>,
}

// ============================================================================
// Day and Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub user_id: Option<String>,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Meal type: breakfast, lunch, dinner, snack, or unspecified
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    pub name: String,
    pub calories: f64,
    /// Grams
    #[serde(default)]
    pub protein: f64,
    /// Grams
    #[serde(default)]
    pub carbs: f64,
    /// Grams
    #[serde(default)]
    pub fat: f64,
    pub notes: Option<String>,
}

fn default_meal_type() -> String { "unspecified".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    pub user_id: Option<String>,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    pub user_id: Option<String>,
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

// ============================================================================
// Measurement and Trend Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogSleepParams {
    pub user_id: Option<String>,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Hours slept (0-24)
    pub hours: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogStepsParams {
    pub user_id: Option<String>,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    pub steps: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub user_id: Option<String>,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    pub value: f64,
    /// lbs (default) or kg
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTrendsParams {
    pub user_id: Option<String>,
    /// Start date (inclusive), YYYY-MM-DD
    pub start_date: String,
    /// End date (inclusive), YYYY-MM-DD, at most 366 days after start
    pub end_date: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl WellnessService {
    // --- Status ---

    #[tool(description = "Get the current status of the wellness service including version, database status, and process information")]
    async fn wellness_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for the energy, macro and logging tools. Call this when unsure how the tools fit together.")]
    fn wellness_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::WELLNESS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(WELLNESS_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get the user's profile with estimated TDEE, macro split and gram targets")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, self.user(&p.user_id)).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update profile biometrics (age, height in inches, weight in pounds, sex, activity level) and calorie goal. Only provided fields change.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let changes = ProfileChanges {
            age: p.age, height_inches: p.height_inches, weight_pounds: p.weight_pounds,
            sex: p.sex, activity_level: p.activity_level, calorie_goal: p.calorie_goal,
        };
        let result = profile::update_profile(&self.database, self.user(&p.user_id), changes).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Energy ---

    #[tool(description = "Estimate total daily energy expenditure (Mifflin-St Jeor x activity multiplier). Missing inputs fall back to the profile. Set apply_as_goal to store the result as the calorie goal.")]
    fn estimate_tdee(&self, Parameters(p): Parameters<EstimateTdeeParams>) -> Result<CallToolResult, McpError> {
        let overrides = BiometricOverrides {
            age: p.age, height_inches: p.height_inches, weight_pounds: p.weight_pounds,
            sex: p.sex, activity_level: p.activity_level,
        };
        let result = energy::estimate_tdee(&self.database, self.user(&p.user_id), overrides, p.apply_as_goal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Macros ---

    #[tool(description = "Save an explicit macro split. The three percentages must add up to 100 or nothing is saved.")]
    fn save_macros(&self, Parameters(p): Parameters<SaveMacrosParams>) -> Result<CallToolResult, McpError> {
        let result = macros::save_macros(&self.database, self.user(&p.user_id), p.protein_pct, p.carbs_pct, p.fat_pct)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set protein or carbs to a percent (value) or move it by 5% steps (steps). Fat becomes the remainder. Saved immediately.")]
    fn adjust_macros_pair(&self, Parameters(p): Parameters<AdjustMacrosPairParams>) -> Result<CallToolResult, McpError> {
        let result = macros::adjust_macros_pair(&self.database, self.user(&p.user_id), &p.target, p.value, p.steps)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Move the slider handle nearest to a track position (0-100). The protein handle moves the protein/carbs boundary; the other moves the carbs/fat boundary. Saved immediately.")]
    fn adjust_macros_position(&self, Parameters(p): Parameters<AdjustMacrosPositionParams>) -> Result<CallToolResult, McpError> {
        let result = macros::adjust_macros_position(&self.database, self.user(&p.user_id), p.position)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Convert the macro split to daily gram targets for a calorie goal (given, or the stored one)")]
    fn get_macro_targets(&self, Parameters(p): Parameters<GetMacroTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = macros::get_macro_targets(&self.database, self.user(&p.user_id), p.calorie_goal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Meals and Days ---

    #[tool(description = "Log a meal with calories and macros (grams) on a date")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let nutrition = Nutrition { calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat };
        let result = days::log_meal(&self.database, self.user(&p.user_id), &p.date, &p.meal_type, &p.name, nutrition, p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal entry")]
    fn delete_meal_entry(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = days::delete_meal_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a day's meals, measurements, totals and progress against the calorie and macro targets")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let result = days::get_day(&self.database, self.user(&p.user_id), &p.date).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(day) => json_result(&day),
            None => json_result(&serde_json::json!({"error": "Day not found", "date": p.date})),
        }
    }

    #[tool(description = "List days with nutrition totals, newest first, with optional date range and pagination")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = days::list_days(&self.database, self.user(&p.user_id), p.start_date.as_deref(), p.end_date.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Measurements ---

    #[tool(description = "Log hours of sleep for a date")]
    fn log_sleep(&self, Parameters(p): Parameters<LogSleepParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::log_sleep(&self.database, self.user(&p.user_id), &p.date, p.hours, p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a step count for a date")]
    fn log_steps(&self, Parameters(p): Parameters<LogStepsParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::log_steps(&self.database, self.user(&p.user_id), &p.date, p.steps, p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log body weight for a date in lbs (default) or kg. Stored in pounds.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::log_weight(&self.database, self.user(&p.user_id), &p.date, p.value, p.unit.as_deref(), p.notes.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a sleep, steps or weight measurement")]
    fn delete_measurement(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::delete_measurement(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Trends ---

    #[tool(description = "Per-day calories, sleep, steps and weight over a date range (at most 366 days), with averages")]
    fn get_trends(&self, Parameters(p): Parameters<GetTrendsParams>) -> Result<CallToolResult, McpError> {
        let result = trends::get_trends(&self.database, self.user(&p.user_id), &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for WellnessService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wellness".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Student Wellness Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Student Wellness Tracker - energy estimates, macro planning and daily habit logging. \
                 Call wellness_instructions for the formulas and workflow. \
                 Profile: get_profile/update_profile. Energy: estimate_tdee (apply_as_goal to store). \
                 Macros: save_macros/adjust_macros_pair/adjust_macros_position/get_macro_targets; \
                 percentages always add up to 100. \
                 Meals: log_meal/delete_meal_entry. Habits: log_sleep/log_steps/log_weight/delete_measurement. \
                 Review: get_day/list_days/get_trends. Dates are YYYY-MM-DD."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(default_user: &str) -> WellnessService {
        let database = Database::in_memory().unwrap();
        WellnessService::new(PathBuf::from(":memory:"), database, default_user.to_string())
    }

    #[test]
    fn test_user_falls_back_to_default() {
        let service = service("student");

        assert_eq!(service.user(&None), "student");
        assert_eq!(service.user(&Some("   ".into())), "student");
        assert_eq!(service.user(&Some(" alex ".into())), "alex");
    }

    #[test]
    fn test_missing_day_reply_is_valid_json() {
        let service = service("default");
        let result = service
            .get_day(Parameters(GetDayParams { user_id: None, date: " 2025-3-1".into() }))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        let text = json["content"][0]["text"].as_str().unwrap();
        let reply: serde_json::Value = serde_json::from_str(text).unwrap();

        assert_eq!(reply["error"], "Day not found");
        assert_eq!(reply["date"], " 2025-3-1");
    }

    #[test]
    fn test_server_info() {
        let info = service("default").get_info();

        assert_eq!(info.server_info.name, "wellness");
        assert!(info.instructions.unwrap().contains("estimate_tdee"));
    }
}
