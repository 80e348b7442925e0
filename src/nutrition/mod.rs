//! Nutrition calculation module
//!
//! Energy expenditure estimation, macro allocation, and unit conversions.

pub mod allocation;
pub mod tdee;
pub mod units;

pub use allocation::{AllocationError, MacroAllocation, MacroGrams, PairTarget, STEP_PCT};
pub use tdee::{
    estimate_bmr, estimate_energy, estimate_tdee, ActivityLevel, BiometricInput, EnergyEstimate,
    Sex,
};
pub use units::WeightUnit;
