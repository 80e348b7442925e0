//! Macronutrient allocation
//!
//! Keeps a protein/carbs/fat percentage split that always sums to 100. Two
//! adjustment strategies are supported: stepping a single value (fat absorbs
//! the remainder) and dragging a boundary handle on a [0,100] track.
//! Every operation returns a new allocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::units::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Default split for new profiles
pub const DEFAULT_PROTEIN_PCT: i64 = 25;
pub const DEFAULT_CARBS_PCT: i64 = 50;
pub const DEFAULT_FAT_PCT: i64 = 25;

/// Step used by increment/decrement controls
pub const STEP_PCT: i64 = 5;

/// Reasons a raw percentage triple is not a valid allocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("Macro percentages must add up to 100% (currently {sum}%)")]
    BadSum { sum: i64 },

    #[error("{field} percentage must be between 0 and 100 (got {value})")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Which value a discrete adjustment changes. Fat is never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairTarget {
    Protein,
    Carbs,
}

impl PairTarget {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "protein" => Some(PairTarget::Protein),
            "carbs" | "carb" | "carbohydrates" => Some(PairTarget::Carbs),
            _ => None,
        }
    }
}

/// A protein/carbs/fat split summing to exactly 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroAllocation {
    protein_pct: i64,
    carbs_pct: i64,
    fat_pct: i64,
}

impl Default for MacroAllocation {
    fn default() -> Self {
        Self {
            protein_pct: DEFAULT_PROTEIN_PCT,
            carbs_pct: DEFAULT_CARBS_PCT,
            fat_pct: DEFAULT_FAT_PCT,
        }
    }
}

/// Gram targets derived from a calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

impl MacroGrams {
    /// Calories represented by these grams
    pub fn calories(&self) -> i64 {
        (self.protein_g as f64 * KCAL_PER_G_PROTEIN
            + self.carbs_g as f64 * KCAL_PER_G_CARBS
            + self.fat_g as f64 * KCAL_PER_G_FAT)
            .round() as i64
    }
}

impl MacroAllocation {
    /// Build from a triple, rejecting anything that breaks the invariant
    pub fn new(protein_pct: i64, carbs_pct: i64, fat_pct: i64) -> Result<Self, AllocationError> {
        for (field, value) in [("Protein", protein_pct), ("Carbs", carbs_pct), ("Fat", fat_pct)] {
            if !(0..=100).contains(&value) {
                return Err(AllocationError::OutOfRange { field, value });
            }
        }

        let sum = protein_pct + carbs_pct + fat_pct;
        if sum != 100 {
            return Err(AllocationError::BadSum { sum });
        }

        Ok(Self {
            protein_pct,
            carbs_pct,
            fat_pct,
        })
    }

    pub fn protein_pct(&self) -> i64 {
        self.protein_pct
    }

    pub fn carbs_pct(&self) -> i64 {
        self.carbs_pct
    }

    pub fn fat_pct(&self) -> i64 {
        self.fat_pct
    }

    /// Set protein or carbs; carbs are capped to the room left by protein
    /// and fat takes the residual.
    pub fn set_pair(&self, changed: PairTarget, new_value: i64) -> Self {
        let value = new_value.clamp(0, 100);

        match changed {
            PairTarget::Protein => {
                let protein_pct = value;
                let carbs_pct = self.carbs_pct.min(100 - protein_pct);
                Self {
                    protein_pct,
                    carbs_pct,
                    fat_pct: 100 - protein_pct - carbs_pct,
                }
            }
            PairTarget::Carbs => {
                let carbs_pct = value.min(100 - self.protein_pct);
                Self {
                    protein_pct: self.protein_pct,
                    carbs_pct,
                    fat_pct: 100 - self.protein_pct - carbs_pct,
                }
            }
        }
    }

    /// Apply a +/- step to protein or carbs
    pub fn step(&self, changed: PairTarget, steps: i64) -> Self {
        let current = match changed {
            PairTarget::Protein => self.protein_pct,
            PairTarget::Carbs => self.carbs_pct,
        };
        self.set_pair(changed, current.saturating_add(steps.saturating_mul(STEP_PCT)))
    }

    /// Move whichever boundary handle is closest to `pointer_percent`.
    ///
    /// The protein handle sits at `protein` and the carbs handle at
    /// `protein + carbs`; ties go to the protein handle. Moving the protein
    /// handle keeps fat and lets carbs absorb the change, unlike `set_pair`.
    pub fn set_from_position(&self, pointer_percent: f64) -> Self {
        if !pointer_percent.is_finite() {
            return *self;
        }
        let pointer = pointer_percent.clamp(0.0, 100.0);

        let protein_handle = self.protein_pct as f64;
        let carbs_handle = (self.protein_pct + self.carbs_pct) as f64;

        if (pointer - protein_handle).abs() <= (pointer - carbs_handle).abs() {
            let protein_pct = pointer.round() as i64;
            let carbs_pct = (100 - protein_pct - self.fat_pct).max(0);
            Self {
                protein_pct,
                carbs_pct,
                fat_pct: 100 - protein_pct - carbs_pct,
            }
        } else {
            let boundary = pointer.round() as i64;
            let carbs_pct = (boundary - self.protein_pct).max(0);
            Self {
                protein_pct: self.protein_pct,
                carbs_pct,
                fat_pct: 100 - self.protein_pct - carbs_pct,
            }
        }
    }

    /// Gram targets for a calorie goal; negative goals count as zero
    pub fn derive_grams(&self, calorie_goal: i64) -> MacroGrams {
        let goal = calorie_goal.max(0) as f64;
        let grams = |pct: i64, kcal_per_g: f64| (goal * pct as f64 / 100.0 / kcal_per_g).round() as i64;

        MacroGrams {
            protein_g: grams(self.protein_pct, KCAL_PER_G_PROTEIN),
            carbs_g: grams(self.carbs_pct, KCAL_PER_G_CARBS),
            fat_g: grams(self.fat_pct, KCAL_PER_G_FAT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(a: &MacroAllocation) -> i64 {
        a.protein_pct() + a.carbs_pct() + a.fat_pct()
    }

    fn triple(a: &MacroAllocation) -> (i64, i64, i64) {
        (a.protein_pct(), a.carbs_pct(), a.fat_pct())
    }

    #[test]
    fn test_default_split() {
        assert_eq!(triple(&MacroAllocation::default()), (25, 50, 25));
    }

    #[test]
    fn test_new_rejects_bad_sum() {
        assert_eq!(
            MacroAllocation::new(30, 30, 30),
            Err(AllocationError::BadSum { sum: 90 })
        );
        let message = MacroAllocation::new(30, 30, 30).unwrap_err().to_string();
        assert!(message.contains("must add up to 100%"));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            MacroAllocation::new(120, -10, -10),
            Err(AllocationError::OutOfRange { field: "Protein", value: 120 })
        ));
    }

    #[test]
    fn test_set_protein_from_default() {
        let a = MacroAllocation::default().set_pair(PairTarget::Protein, 40);
        assert_eq!(triple(&a), (40, 50, 10));
    }

    #[test]
    fn test_set_protein_caps_carbs() {
        let a = MacroAllocation::default().set_pair(PairTarget::Protein, 70);
        assert_eq!(triple(&a), (70, 30, 0));
    }

    #[test]
    fn test_set_protein_clamps_high() {
        let a = MacroAllocation::default().set_pair(PairTarget::Protein, 150);
        assert_eq!(triple(&a), (100, 0, 0));
    }

    #[test]
    fn test_set_protein_clamps_low() {
        let a = MacroAllocation::default().set_pair(PairTarget::Protein, -20);
        assert_eq!(triple(&a), (0, 50, 50));
    }

    #[test]
    fn test_set_carbs_caps_to_remaining_room() {
        let a = MacroAllocation::default().set_pair(PairTarget::Carbs, 90);
        assert_eq!(triple(&a), (25, 75, 0));

        let b = MacroAllocation::default().set_pair(PairTarget::Carbs, 30);
        assert_eq!(triple(&b), (25, 30, 45));
    }

    #[test]
    fn test_step_adjusts_by_five() {
        let up = MacroAllocation::default().step(PairTarget::Protein, 1);
        assert_eq!(triple(&up), (30, 50, 20));

        let down = MacroAllocation::default().step(PairTarget::Carbs, -2);
        assert_eq!(triple(&down), (25, 40, 35));
    }

    #[test]
    fn test_position_moves_protein_handle() {
        // handles at 25 and 75; 30 is closer to the protein handle
        let a = MacroAllocation::default().set_from_position(30.0);
        assert_eq!(triple(&a), (30, 45, 25));
    }

    #[test]
    fn test_position_drag_sequence() {
        let first = MacroAllocation::default().set_from_position(10.0);
        assert_eq!(triple(&first), (10, 65, 25));

        // handles now at 10 and 75
        let second = first.set_from_position(49.6);
        assert_eq!(triple(&second), (10, 40, 50));
    }

    #[test]
    fn test_position_moves_carbs_handle() {
        let a = MacroAllocation::default().set_from_position(60.4);
        assert_eq!(triple(&a), (25, 35, 40));
    }

    #[test]
    fn test_position_carbs_handle_below_protein() {
        // handles at 50 and 50; tie goes to protein
        let start = MacroAllocation::new(50, 0, 50).unwrap();
        let a = start.set_from_position(20.0);
        assert_eq!(triple(&a), (20, 30, 50));
    }

    #[test]
    fn test_position_protein_handle_eats_fat_when_no_carbs_left() {
        let start = MacroAllocation::new(50, 0, 50).unwrap();
        let a = start.set_from_position(80.0);
        assert_eq!(triple(&a), (80, 0, 20));
    }

    #[test]
    fn test_position_non_finite_is_ignored() {
        let start = MacroAllocation::default();
        assert_eq!(start.set_from_position(f64::NAN), start);
    }

    #[test]
    fn test_position_clamps_pointer() {
        let a = MacroAllocation::default().set_from_position(250.0);
        assert_eq!(triple(&a), (25, 75, 0));
        let b = MacroAllocation::default().set_from_position(-40.0);
        assert_eq!(triple(&b), (0, 75, 25));
    }

    #[test]
    fn test_sum_holds_across_operation_sequences() {
        let mut a = MacroAllocation::default();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..2000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            a = match seed % 4 {
                0 => a.set_pair(PairTarget::Protein, (seed >> 8) as i64 % 160 - 30),
                1 => a.set_pair(PairTarget::Carbs, (seed >> 8) as i64 % 160 - 30),
                2 => a.step(PairTarget::Protein, if seed & 0x100 == 0 { 1 } else { -1 }),
                _ => a.set_from_position(((seed >> 8) % 12000) as f64 / 100.0 - 10.0),
            };
            assert_eq!(sum(&a), 100);
            assert!(a.protein_pct() >= 0 && a.carbs_pct() >= 0 && a.fat_pct() >= 0);
            assert!(MacroAllocation::new(a.protein_pct(), a.carbs_pct(), a.fat_pct()).is_ok());
        }
    }

    #[test]
    fn test_derive_grams_default() {
        let grams = MacroAllocation::default().derive_grams(2000);
        assert_eq!(grams, MacroGrams { protein_g: 125, carbs_g: 250, fat_g: 56 });
    }

    #[test]
    fn test_derive_grams_consistent_with_goal() {
        let allocations = [
            MacroAllocation::default(),
            MacroAllocation::new(40, 50, 10).unwrap(),
            MacroAllocation::new(33, 33, 34).unwrap(),
            MacroAllocation::new(0, 0, 100).unwrap(),
        ];
        for allocation in allocations {
            for goal in [0, 1200, 1850, 2661, 4000] {
                let grams = allocation.derive_grams(goal);
                // each macro rounds to within half a gram
                assert!((grams.calories() - goal).abs() <= 9);
            }
        }
    }

    #[test]
    fn test_derive_grams_negative_goal() {
        let grams = MacroAllocation::default().derive_grams(-500);
        assert_eq!(grams, MacroGrams { protein_g: 0, carbs_g: 0, fat_g: 0 });
    }
}
