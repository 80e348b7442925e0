//! Shared nutrition data structure
//!
//! Used by meal entries and day totals.

use serde::{Deserialize, Serialize};

/// Energy and macronutrient amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Share of macro calories coming from protein, carbs and fat (0-100 each).
    /// Returns `None` when no macros were logged.
    pub fn macro_percentages(&self) -> Option<(f64, f64, f64)> {
        use crate::nutrition::units::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

        let protein_kcal = self.protein * KCAL_PER_G_PROTEIN;
        let carbs_kcal = self.carbs * KCAL_PER_G_CARBS;
        let fat_kcal = self.fat * KCAL_PER_G_FAT;
        let total = protein_kcal + carbs_kcal + fat_kcal;

        if total <= 0.0 {
            return None;
        }

        Some((
            protein_kcal / total * 100.0,
            carbs_kcal / total * 100.0,
            fat_kcal / total * 100.0,
        ))
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}
