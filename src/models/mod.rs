//! Data models
//!
//! Rust structs representing database entities.

mod day;
mod meal_entry;
mod measurement;
mod nutrition;
mod profile;

pub use day::Day;
pub use meal_entry::{calculate_day_nutrition, MealEntry, MealEntryCreate, MealType};
pub use measurement::{DatedMeasurement, Measurement, MeasurementCreate, MeasurementType};
pub use nutrition::Nutrition;
pub use profile::{MacroSettings, Profile, ProfileFields};
