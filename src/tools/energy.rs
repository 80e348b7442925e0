//! Energy MCP Tools
//!
//! TDEE estimation from explicit inputs, stored profile fields, or both.

use serde::Serialize;

use crate::db::Database;
use crate::models::ProfileFields;
use crate::nutrition::{estimate_energy, ActivityLevel, BiometricInput, EnergyEstimate, Sex};
use crate::profile::{MacroPlan, ProfileStore};
use crate::tools::profile::{check_biometrics, normalize_activity_level, normalize_sex};

/// Explicit inputs that take precedence over stored profile fields
#[derive(Debug, Clone, Default)]
pub struct BiometricOverrides {
    pub age: Option<i64>,
    pub height_inches: Option<f64>,
    pub weight_pounds: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
}

/// Response for estimate_tdee
#[derive(Debug, Serialize)]
pub struct EstimateTdeeResponse {
    pub user_id: String,
    pub input: BiometricInput,
    pub estimate: Option<EnergyEstimate>,
    pub missing_fields: Vec<&'static str>,
    pub message: String,
    pub applied_as_goal: bool,
    pub macros: Option<MacroPlan>,
}

impl BiometricOverrides {
    /// Layer these values over `base`. Overrides follow the same rules as
    /// profile updates.
    fn apply(self, mut base: BiometricInput) -> Result<BiometricInput, String> {
        check_biometrics(self.age, self.height_inches, self.weight_pounds)?;

        if self.age.is_some() {
            base.age_years = self.age;
        }
        if self.height_inches.is_some() {
            base.height_inches = self.height_inches;
        }
        if self.weight_pounds.is_some() {
            base.weight_pounds = self.weight_pounds;
        }
        if let Some(ref sex) = self.sex {
            base.sex = Sex::from_str(&normalize_sex(sex)?);
        }
        if let Some(ref level) = self.activity_level {
            base.activity_level = ActivityLevel::from_str(&normalize_activity_level(level)?);
        }
        Ok(base)
    }
}

/// Estimate TDEE for a user. Missing overrides fall back to the stored
/// profile. With `apply_as_goal`, a successful estimate becomes the
/// profile's calorie goal.
pub fn estimate_tdee(
    db: &Database,
    user_id: &str,
    overrides: BiometricOverrides,
    apply_as_goal: bool,
) -> Result<EstimateTdeeResponse, String> {
    let stored = db
        .load_profile(user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    let base = stored.as_ref().map(|p| p.biometrics()).unwrap_or_default();
    let input = overrides.apply(base)?;
    let estimate = estimate_energy(&input);
    let missing_fields = input.missing_fields();

    let Some(energy) = estimate else {
        return Ok(EstimateTdeeResponse {
            user_id: user_id.to_string(),
            message: format!(
                "Please fill in all fields to estimate TDEE (missing: {})",
                missing_fields.join(", ")
            ),
            input,
            estimate: None,
            missing_fields,
            applied_as_goal: false,
            macros: None,
        });
    };

    if apply_as_goal && energy.tdee <= 0 {
        tracing::warn!(user_id, tdee = energy.tdee, "Estimate not usable as a calorie goal");
        return Ok(EstimateTdeeResponse {
            user_id: user_id.to_string(),
            message: format!(
                "Estimated TDEE is {} kcal/day, which cannot be a calorie goal. Check the inputs; nothing was saved.",
                energy.tdee
            ),
            input,
            estimate,
            missing_fields,
            applied_as_goal: false,
            macros: None,
        });
    }

    let mut macros = None;
    if apply_as_goal {
        let profile = db
            .save_profile(
                user_id,
                &ProfileFields {
                    calorie_goal: Some(energy.tdee),
                    ..Default::default()
                },
            )
            .map_err(|e| format!("Failed to save calorie goal: {}", e))?;

        tracing::info!(user_id, calorie_goal = energy.tdee, "Applied TDEE as calorie goal");
        macros = Some(MacroPlan::for_profile(Some(&profile)));
    }

    Ok(EstimateTdeeResponse {
        user_id: user_id.to_string(),
        message: format!("Estimated TDEE: {} kcal/day", energy.tdee),
        input,
        estimate,
        missing_fields,
        applied_as_goal: apply_as_goal,
        macros,
    })
}
