//! Energy expenditure estimation
//!
//! Mifflin-St Jeor basal metabolic rate scaled by an activity multiplier.

use serde::{Deserialize, Serialize};

use super::units::{inches_to_cm, pounds_to_kg};

/// Biological sex used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parse from string; anything unrecognized counts as missing
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Constant term of the Mifflin-St Jeor equation
    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Heavy,
    Athlete,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Heavy,
        ActivityLevel::Athlete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Heavy => "heavy",
            ActivityLevel::Athlete => "athlete",
        }
    }

    /// Parse from string.
    ///
    /// Empty input is missing. Unknown input falls back to sedentary so an
    /// estimate can still be produced.
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let trimmed = lower.trim();

        match trimmed {
            "" => None,
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "heavy" => Some(ActivityLevel::Heavy),
            "athlete" => Some(ActivityLevel::Athlete),
            _ => {
                tracing::warn!(
                    "Unknown activity level '{}'. Defaulting to sedentary.",
                    trimmed
                );
                Some(ActivityLevel::Sedentary)
            }
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Heavy => 1.725,
            ActivityLevel::Athlete => 1.9,
        }
    }
}

/// Inputs for an energy estimate. A field that is absent, zero, negative or
/// non-finite counts as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiometricInput {
    pub age_years: Option<i64>,
    pub height_inches: Option<f64>,
    pub weight_pounds: Option<f64>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
}

impl BiometricInput {
    /// Names of required fields that are missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.age().is_none() {
            missing.push("age");
        }
        if positive(self.height_inches).is_none() {
            missing.push("height");
        }
        if positive(self.weight_pounds).is_none() {
            missing.push("weight");
        }
        if self.sex.is_none() {
            missing.push("sex");
        }
        if self.activity_level.is_none() {
            missing.push("activity_level");
        }
        missing
    }

    fn age(&self) -> Option<i64> {
        self.age_years.filter(|age| *age > 0)
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Breakdown of an energy estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub tdee: i64,
}

/// Basal metabolic rate (kcal/day) via Mifflin-St Jeor
pub fn estimate_bmr(input: &BiometricInput) -> Option<f64> {
    let age = input.age()?;
    let height_cm = inches_to_cm(positive(input.height_inches)?);
    let weight_kg = pounds_to_kg(positive(input.weight_pounds)?);
    let sex = input.sex?;

    Some(10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + sex.bmr_offset())
}

/// BMR, multiplier and rounded TDEE, or `None` when data is insufficient
pub fn estimate_energy(input: &BiometricInput) -> Option<EnergyEstimate> {
    let bmr = estimate_bmr(input)?;
    let activity_multiplier = input.activity_level?.multiplier();
    let tdee = (bmr * activity_multiplier).round() as i64;

    tracing::debug!(bmr, activity_multiplier, tdee, "Estimated energy expenditure");

    Some(EnergyEstimate {
        bmr,
        activity_multiplier,
        tdee,
    })
}

/// Total daily energy expenditure (kcal/day), or `None` when any required
/// field is missing
pub fn estimate_tdee(input: &BiometricInput) -> Option<i64> {
    estimate_energy(input).map(|e| e.tdee)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_male() -> BiometricInput {
        BiometricInput {
            age_years: Some(25),
            height_inches: Some(70.0),
            weight_pounds: Some(160.0),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
        }
    }

    #[test]
    fn test_male_moderate() {
        let bmr = estimate_bmr(&sample_male()).unwrap();
        assert!((bmr - 1716.9972).abs() < 0.001);
        assert_eq!(estimate_tdee(&sample_male()), Some(2661));
    }

    #[test]
    fn test_female_light() {
        let input = BiometricInput {
            age_years: Some(30),
            height_inches: Some(65.0),
            weight_pounds: Some(140.0),
            sex: Some(Sex::Female),
            activity_level: Some(ActivityLevel::Light),
        };
        assert_eq!(estimate_tdee(&input), Some(1864));
    }

    #[test]
    fn test_male_athlete() {
        let input = BiometricInput {
            age_years: Some(20),
            height_inches: Some(72.0),
            weight_pounds: Some(200.0),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Athlete),
        };
        assert_eq!(estimate_tdee(&input), Some(3715));
    }

    #[test]
    fn test_unknown_activity_defaults_to_sedentary() {
        let mut input = sample_male();
        input.activity_level = ActivityLevel::from_str("couch potato");
        assert_eq!(input.activity_level, Some(ActivityLevel::Sedentary));
        assert_eq!(estimate_tdee(&input), Some(2060));
    }

    #[test]
    fn test_missing_any_field_returns_none() {
        let mut no_age = sample_male();
        no_age.age_years = None;
        let mut zero_height = sample_male();
        zero_height.height_inches = Some(0.0);
        let mut no_weight = sample_male();
        no_weight.weight_pounds = None;
        let mut no_sex = sample_male();
        no_sex.sex = None;
        let mut no_activity = sample_male();
        no_activity.activity_level = None;

        for (input, field) in [
            (no_age, "age"),
            (zero_height, "height"),
            (no_weight, "weight"),
            (no_sex, "sex"),
            (no_activity, "activity_level"),
        ] {
            assert_eq!(estimate_tdee(&input), None);
            assert_eq!(input.missing_fields(), vec![field]);
        }
    }

    #[test]
    fn test_nan_weight_is_missing() {
        let mut input = sample_male();
        input.weight_pounds = Some(f64::NAN);
        assert_eq!(estimate_tdee(&input), None);
    }

    #[test]
    fn test_realistic_inputs_are_positive() {
        for sex in [Sex::Male, Sex::Female] {
            for level in ActivityLevel::ALL {
                for age in [16, 25, 45, 80] {
                    for (height, weight) in [(58.0, 95.0), (66.0, 150.0), (78.0, 280.0)] {
                        let input = BiometricInput {
                            age_years: Some(age),
                            height_inches: Some(height),
                            weight_pounds: Some(weight),
                            sex: Some(sex),
                            activity_level: Some(level),
                        };
                        assert!(estimate_tdee(&input).unwrap() > 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_parse_sex_and_activity() {
        assert_eq!(Sex::from_str("Female"), Some(Sex::Female));
        assert_eq!(Sex::from_str("m"), Some(Sex::Male));
        assert_eq!(Sex::from_str("other"), None);
        assert_eq!(ActivityLevel::from_str("  "), None);
        assert_eq!(ActivityLevel::from_str("HEAVY"), Some(ActivityLevel::Heavy));
    }
}
