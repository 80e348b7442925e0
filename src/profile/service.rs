//! Profile computations
//!
//! Joins the pure nutrition module with profile storage: macro saves are
//! validated before anything is persisted, and adjustments are applied to the
//! stored split and written back.

use serde::Serialize;
use thiserror::Error;

use super::ProfileStore;
use crate::db::DbError;
use crate::models::{MacroSettings, Profile, ProfileFields};
use crate::nutrition::{AllocationError, MacroAllocation, MacroGrams, PairTarget};

/// Profile operation errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid macro settings: {0}")]
    InvalidMacros(#[from] AllocationError),

    #[error(transparent)]
    Persistence(#[from] DbError),
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// A macro split together with the grams it implies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroPlan {
    pub allocation: MacroAllocation,
    pub calorie_goal: Option<i64>,
    pub grams: Option<MacroGrams>,
}

impl MacroPlan {
    pub fn new(allocation: MacroAllocation, calorie_goal: Option<i64>) -> Self {
        Self {
            allocation,
            calorie_goal,
            grams: calorie_goal.map(|goal| allocation.derive_grams(goal)),
        }
    }

    /// Plan for a stored profile, or the default split when there is none
    pub fn for_profile(profile: Option<&Profile>) -> Self {
        match profile {
            Some(p) => Self::new(p.macro_allocation(), p.calorie_goal),
            None => Self::new(MacroAllocation::default(), None),
        }
    }
}

/// Validate and persist a raw macro triple. Nothing reaches the store unless
/// the percentages add up to exactly 100.
pub fn save_macro_settings<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
    settings: &MacroSettings,
) -> ProfileResult<Profile> {
    let allocation = settings.validate()?;
    save_macro_allocation(store, user_id, allocation)
}

/// Persist an allocation
pub fn save_macro_allocation<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
    allocation: MacroAllocation,
) -> ProfileResult<Profile> {
    let fields = ProfileFields {
        macro_settings: Some(allocation.into()),
        ..Default::default()
    };
    let profile = store.save_profile(user_id, &fields)?;

    tracing::info!(
        user_id,
        protein_pct = allocation.protein_pct(),
        carbs_pct = allocation.carbs_pct(),
        fat_pct = allocation.fat_pct(),
        "Saved macro settings"
    );

    Ok(profile)
}

/// Current allocation for a user; default when no profile exists
pub fn load_macro_allocation<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> ProfileResult<MacroAllocation> {
    Ok(store
        .load_profile(user_id)?
        .map(|p| p.macro_allocation())
        .unwrap_or_default())
}

/// Set protein or carbs on the stored split and save it
pub fn adjust_pair<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
    changed: PairTarget,
    new_value: i64,
) -> ProfileResult<Profile> {
    let current = load_macro_allocation(store, user_id)?;
    save_macro_allocation(store, user_id, current.set_pair(changed, new_value))
}

/// Step protein or carbs by `steps` increments of 5 and save
pub fn adjust_step<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
    changed: PairTarget,
    steps: i64,
) -> ProfileResult<Profile> {
    let current = load_macro_allocation(store, user_id)?;
    save_macro_allocation(store, user_id, current.step(changed, steps))
}

/// Move the nearest slider handle to `pointer_percent` and save
pub fn adjust_position<S: ProfileStore + ?Sized>(
    store: &S,
    user_id: &str,
    pointer_percent: f64,
) -> ProfileResult<Profile> {
    let current = load_macro_allocation(store, user_id)?;
    save_macro_allocation(store, user_id, current.set_from_position(pointer_percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::profile::MockProfileStore;

    fn stored(settings: MacroSettings) -> Profile {
        Profile {
            user_id: "u1".into(),
            age: None,
            height_inches: None,
            weight_pounds: None,
            sex: None,
            activity_level: None,
            calorie_goal: Some(2000),
            macro_settings: settings,
            created_at: "2025-01-01 00:00:00".into(),
            updated_at: "2025-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn test_bad_sum_is_rejected_without_persisting() {
        let mut store = MockProfileStore::new();
        store.expect_save_profile().times(0);

        let settings = MacroSettings { protein_pct: 30, carbs_pct: 30, fat_pct: 30 };
        let err = save_macro_settings(&store, "u1", &settings).unwrap_err();

        assert!(matches!(err, ProfileError::InvalidMacros(AllocationError::BadSum { sum: 90 })));
        assert!(err.to_string().contains("must add up to 100%"));
    }

    #[test]
    fn test_valid_settings_are_saved() {
        let mut store = MockProfileStore::new();
        let settings = MacroSettings { protein_pct: 40, carbs_pct: 40, fat_pct: 20 };
        store
            .expect_save_profile()
            .withf(move |user_id, fields| {
                user_id == "u1" && fields.macro_settings == Some(settings) && fields.age.is_none()
            })
            .times(1)
            .returning(move |_, _| Ok(stored(settings)));

        let profile = save_macro_settings(&store, "u1", &settings).unwrap();
        assert_eq!(profile.macro_settings, settings);
    }

    #[test]
    fn test_persistence_error_propagates() {
        let mut store = MockProfileStore::new();
        store
            .expect_save_profile()
            .returning(|_, _| Err(DbError::Sqlite(rusqlite::Error::InvalidQuery)));

        let err = save_macro_allocation(&store, "u1", MacroAllocation::default()).unwrap_err();
        assert!(matches!(err, ProfileError::Persistence(_)));
    }

    #[test]
    fn test_adjust_pair_uses_stored_split() {
        let mut store = MockProfileStore::new();
        store
            .expect_load_profile()
            .returning(|_| Ok(Some(stored(MacroSettings { protein_pct: 25, carbs_pct: 50, fat_pct: 25 }))));
        store
            .expect_save_profile()
            .withf(|_, fields| {
                fields.macro_settings
                    == Some(MacroSettings { protein_pct: 40, carbs_pct: 50, fat_pct: 10 })
            })
            .times(1)
            .returning(|_, fields| Ok(stored(fields.macro_settings.unwrap())));

        let profile = adjust_pair(&store, "u1", PairTarget::Protein, 40).unwrap();
        assert_eq!(profile.macro_settings.fat_pct, 10);
    }

    #[test]
    fn test_adjust_without_profile_starts_from_default() {
        let mut store = MockProfileStore::new();
        store.expect_load_profile().returning(|_| Ok(None));
        store
            .expect_save_profile()
            .withf(|_, fields| {
                fields.macro_settings
                    == Some(MacroSettings { protein_pct: 25, carbs_pct: 35, fat_pct: 40 })
            })
            .times(1)
            .returning(|_, fields| Ok(stored(fields.macro_settings.unwrap())));

        adjust_position(&store, "u1", 60.0).unwrap();
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let db = Database::in_memory().unwrap();
        let settings = MacroSettings { protein_pct: 35, carbs_pct: 45, fat_pct: 20 };

        save_macro_settings(&db, "u1", &settings).unwrap();
        let loaded = db.load_profile("u1").unwrap().unwrap();

        assert_eq!(loaded.macro_settings, settings);
        assert_eq!(load_macro_allocation(&db, "u1").unwrap(), settings.validate().unwrap());
    }

    #[test]
    fn test_step_sequence_against_database() {
        let db = Database::in_memory().unwrap();

        adjust_step(&db, "u1", PairTarget::Protein, 2).unwrap();
        let profile = adjust_step(&db, "u1", PairTarget::Carbs, -1).unwrap();

        assert_eq!(
            profile.macro_settings,
            MacroSettings { protein_pct: 35, carbs_pct: 45, fat_pct: 20 }
        );
    }

    #[test]
    fn test_macro_plan_for_profile() {
        let plan = MacroPlan::for_profile(Some(&stored(MacroSettings {
            protein_pct: 25,
            carbs_pct: 50,
            fat_pct: 25,
        })));
        assert_eq!(plan.grams, Some(MacroGrams { protein_g: 125, carbs_g: 250, fat_g: 56 }));

        let empty = MacroPlan::for_profile(None);
        assert_eq!(empty.allocation, MacroAllocation::default());
        assert_eq!(empty.grams, None);
    }
}
