//! Profile MCP Tools
//!
//! Tools for reading and updating a user's profile.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileFields};
use crate::nutrition::{estimate_energy, ActivityLevel, EnergyEstimate, Sex};
use crate::profile::{MacroPlan, ProfileStore};

/// Profile with everything derived from it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    /// Fields still needed for an energy estimate
    pub missing_fields: Vec<&'static str>,
    pub energy: Option<EnergyEstimate>,
    pub macros: MacroPlan,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let biometrics = profile.biometrics();
        let macros = MacroPlan::for_profile(Some(&profile));
        Self {
            missing_fields: biometrics.missing_fields(),
            energy: estimate_energy(&biometrics),
            macros,
            profile,
        }
    }
}

/// Profile changes requested through a tool
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub age: Option<i64>,
    pub height_inches: Option<f64>,
    pub weight_pounds: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub calorie_goal: Option<i64>,
}

/// Normalize a sex value for storage
pub(crate) fn normalize_sex(value: &str) -> Result<String, String> {
    Sex::from_str(value)
        .map(|s| s.as_str().to_string())
        .ok_or_else(|| format!("Invalid sex '{}'. Use male or female.", value))
}

/// Normalize an activity level for storage; unknown names are rejected here
/// rather than silently stored
pub(crate) fn normalize_activity_level(value: &str) -> Result<String, String> {
    let normalized = value.trim().to_lowercase();
    ActivityLevel::ALL
        .iter()
        .find(|level| level.as_str() == normalized)
        .map(|level| level.as_str().to_string())
        .ok_or_else(|| {
            let names: Vec<_> = ActivityLevel::ALL.iter().map(|l| l.as_str()).collect();
            format!("Invalid activity level '{}'. Use one of: {}.", value, names.join(", "))
        })
}

/// Range checks shared by profile updates and estimate overrides
pub(crate) fn check_biometrics(
    age: Option<i64>,
    height_inches: Option<f64>,
    weight_pounds: Option<f64>,
) -> Result<(), String> {
    if let Some(age) = age {
        if age <= 0 || age > 130 {
            return Err(format!("Age must be between 1 and 130 (got {})", age));
        }
    }
    for (name, value) in [("Height", height_inches), ("Weight", weight_pounds)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("{} must be a positive number (got {})", name, v));
            }
        }
    }
    Ok(())
}

impl ProfileChanges {
    /// Check ranges and normalize text fields
    fn into_fields(self) -> Result<ProfileFields, String> {
        check_biometrics(self.age, self.height_inches, self.weight_pounds)?;
        if let Some(goal) = self.calorie_goal {
            if goal < 0 {
                return Err(format!("Calorie goal cannot be negative (got {})", goal));
            }
        }

        Ok(ProfileFields {
            age: self.age,
            height_inches: self.height_inches,
            weight_pounds: self.weight_pounds,
            sex: self.sex.as_deref().map(normalize_sex).transpose()?,
            activity_level: self
                .activity_level
                .as_deref()
                .map(normalize_activity_level)
                .transpose()?,
            calorie_goal: self.calorie_goal,
            macro_settings: None,
        })
    }
}

/// Get a user's profile, creating an empty one on first access
pub fn get_profile(db: &Database, user_id: &str) -> Result<ProfileResponse, String> {
    let profile = match db
        .load_profile(user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?
    {
        Some(profile) => profile,
        None => db
            .save_profile(user_id, &ProfileFields::default())
            .map_err(|e| format!("Failed to create profile: {}", e))?,
    };

    Ok(profile.into())
}

/// Update biometrics and calorie goal
pub fn update_profile(
    db: &Database,
    user_id: &str,
    changes: ProfileChanges,
) -> Result<ProfileResponse, String> {
    let fields = changes.into_fields()?;

    let profile = db
        .save_profile(user_id, &fields)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!(user_id, "Updated profile");
    Ok(profile.into())
}
