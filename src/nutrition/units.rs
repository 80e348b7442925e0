//! Unit types and conversion constants
//!
//! Body-measurement conversions for energy estimation and the energy density
//! of each macronutrient.

use serde::{Deserialize, Serialize};

// ============================================================================
// Length and Weight Conversion Constants
// ============================================================================

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Pounds per kilogram
pub const LB_PER_KG: f64 = 1.0 / KG_PER_LB;

// ============================================================================
// Energy Density (kcal per gram)
// ============================================================================

/// Calories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Calories per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Calories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Convert inches to centimeters
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Convert pounds to kilograms
pub fn pounds_to_kg(pounds: f64) -> f64 {
    pounds * KG_PER_LB
}

/// Body weight unit accepted when logging weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Pounds,
    Kilograms,
}

impl WeightUnit {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Pounds),
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kilograms),
            _ => None,
        }
    }

    /// Canonical unit string
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Pounds => "lbs",
            WeightUnit::Kilograms => "kg",
        }
    }

    /// Convert a value in this unit to pounds
    pub fn to_pounds(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Pounds => value,
            WeightUnit::Kilograms => value * LB_PER_KG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_cm() {
        assert!((inches_to_cm(70.0) - 177.8).abs() < 1e-9);
    }

    #[test]
    fn test_pounds_to_kg() {
        assert!((pounds_to_kg(160.0) - 72.57472).abs() < 1e-9);
    }

    #[test]
    fn test_weight_unit_parsing() {
        assert_eq!(WeightUnit::from_str("lbs"), Some(WeightUnit::Pounds));
        assert_eq!(WeightUnit::from_str(" LB "), Some(WeightUnit::Pounds));
        assert_eq!(WeightUnit::from_str("kg"), Some(WeightUnit::Kilograms));
        assert_eq!(WeightUnit::from_str("stone"), None);
    }

    #[test]
    fn test_kilograms_to_pounds() {
        let lbs = WeightUnit::Kilograms.to_pounds(72.57472);
        assert!((lbs - 160.0).abs() < 1e-6);
        assert_eq!(WeightUnit::Pounds.to_pounds(150.0), 150.0);
    }
}
