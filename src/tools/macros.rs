//! Macro MCP Tools
//!
//! Tools for saving, adjusting and projecting a user's macro split.

use serde::Serialize;

use crate::db::Database;
use crate::models::{MacroSettings, Profile};
use crate::nutrition::{MacroAllocation, MacroGrams, PairTarget};
use crate::profile::{self, MacroPlan, ProfileStore};

/// Response for macro save/adjust tools
#[derive(Debug, Serialize)]
pub struct MacroResponse {
    pub user_id: String,
    pub allocation: MacroAllocation,
    pub calorie_goal: Option<i64>,
    pub grams: Option<MacroGrams>,
    pub updated_at: String,
}

impl From<Profile> for MacroResponse {
    fn from(profile: Profile) -> Self {
        let plan = MacroPlan::for_profile(Some(&profile));
        Self {
            user_id: profile.user_id,
            allocation: plan.allocation,
            calorie_goal: plan.calorie_goal,
            grams: plan.grams,
            updated_at: profile.updated_at,
        }
    }
}

/// Response for get_macro_targets
#[derive(Debug, Serialize)]
pub struct MacroTargetsResponse {
    pub allocation: MacroAllocation,
    pub calorie_goal: i64,
    pub grams: MacroGrams,
    /// Calories the rounded grams add back up to
    pub grams_calories: i64,
}

/// Validate and save an explicit split
pub fn save_macros(
    db: &Database,
    user_id: &str,
    protein_pct: i64,
    carbs_pct: i64,
    fat_pct: i64,
) -> Result<MacroResponse, String> {
    let settings = MacroSettings {
        protein_pct,
        carbs_pct,
        fat_pct,
    };

    profile::save_macro_settings(db, user_id, &settings)
        .map(MacroResponse::from)
        .map_err(|e| e.to_string())
}

/// Set protein or carbs to a value, or move it by +/-5 steps.
/// Exactly one of `value` and `steps` must be given.
pub fn adjust_macros_pair(
    db: &Database,
    user_id: &str,
    target: &str,
    value: Option<i64>,
    steps: Option<i64>,
) -> Result<MacroResponse, String> {
    let target = PairTarget::from_str(target).ok_or_else(|| {
        format!("Invalid macro '{}'. Use protein or carbs; fat is always the remainder.", target)
    })?;

    let result = match (value, steps) {
        (Some(v), None) => profile::adjust_pair(db, user_id, target, v),
        (None, Some(s)) => profile::adjust_step(db, user_id, target, s),
        _ => return Err("Provide exactly one of value or steps".to_string()),
    };

    result.map(MacroResponse::from).map_err(|e| e.to_string())
}

/// Drag the nearest slider handle to a track position (0-100)
pub fn adjust_macros_position(
    db: &Database,
    user_id: &str,
    pointer_percent: f64,
) -> Result<MacroResponse, String> {
    if !pointer_percent.is_finite() {
        return Err(format!("Invalid position {}", pointer_percent));
    }

    profile::adjust_position(db, user_id, pointer_percent)
        .map(MacroResponse::from)
        .map_err(|e| e.to_string())
}

/// Gram targets for an explicit calorie goal, or the stored one
pub fn get_macro_targets(
    db: &Database,
    user_id: &str,
    calorie_goal: Option<i64>,
) -> Result<MacroTargetsResponse, String> {
    let stored = db
        .load_profile(user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?;
    let plan = MacroPlan::for_profile(stored.as_ref());

    let goal = calorie_goal.or(plan.calorie_goal).ok_or_else(|| {
        "No calorie goal set. Pass calorie_goal or run estimate_tdee with apply_as_goal.".to_string()
    })?;
    if goal < 0 {
        return Err(format!("Calorie goal cannot be negative (got {})", goal));
    }

    let grams = plan.allocation.derive_grams(goal);
    Ok(MacroTargetsResponse {
        allocation: plan.allocation,
        calorie_goal: goal,
        grams,
        grams_calories: grams.calories(),
    })
}
