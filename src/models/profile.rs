//! Profile model
//!
//! Per-user biometrics, calorie goal and macro split. Biometric fields are
//! optional and `sex`/`activity_level` are stored as free text, so values are
//! validated when they are read back into typed inputs.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{ActivityLevel, AllocationError, BiometricInput, MacroAllocation, Sex};

/// Stored macro split, as persisted: `{protein_pct, carbs_pct, fat_pct}`.
/// May be inconsistent until validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSettings {
    pub protein_pct: i64,
    pub carbs_pct: i64,
    pub fat_pct: i64,
}

impl MacroSettings {
    /// Check the triple and turn it into an allocation
    pub fn validate(&self) -> Result<MacroAllocation, AllocationError> {
        MacroAllocation::new(self.protein_pct, self.carbs_pct, self.fat_pct)
    }
}

impl From<MacroAllocation> for MacroSettings {
    fn from(allocation: MacroAllocation) -> Self {
        Self {
            protein_pct: allocation.protein_pct(),
            carbs_pct: allocation.carbs_pct(),
            fat_pct: allocation.fat_pct(),
        }
    }
}

/// A user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub age: Option<i64>,
    pub height_inches: Option<f64>,
    pub weight_pounds: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub calorie_goal: Option<i64>,
    pub macro_settings: MacroSettings,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields to change on a profile; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub age: Option<i64>,
    pub height_inches: Option<f64>,
    pub weight_pounds: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub calorie_goal: Option<i64>,
    pub macro_settings: Option<MacroSettings>,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            age: row.get("age")?,
            height_inches: row.get("height_inches")?,
            weight_pounds: row.get("weight_pounds")?,
            sex: row.get("sex")?,
            activity_level: row.get("activity_level")?,
            calorie_goal: row.get("calorie_goal")?,
            macro_settings: MacroSettings {
                protein_pct: row.get("protein_pct")?,
                carbs_pct: row.get("carbs_pct")?,
                fat_pct: row.get("fat_pct")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a profile by user ID
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create the profile if needed, then apply the given fields, in one transaction
    pub fn upsert(conn: &mut Connection, user_id: &str, data: &ProfileFields) -> DbResult<Self> {
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO profiles (user_id) VALUES (?1)",
            params![user_id],
        )?;

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(age) = data.age {
            params_vec.push(Box::new(age));
            updates.push(format!("age = ?{}", params_vec.len()));
        }
        if let Some(height) = data.height_inches {
            params_vec.push(Box::new(height));
            updates.push(format!("height_inches = ?{}", params_vec.len()));
        }
        if let Some(weight) = data.weight_pounds {
            params_vec.push(Box::new(weight));
            updates.push(format!("weight_pounds = ?{}", params_vec.len()));
        }
        if let Some(ref sex) = data.sex {
            params_vec.push(Box::new(sex.clone()));
            updates.push(format!("sex = ?{}", params_vec.len()));
        }
        if let Some(ref level) = data.activity_level {
            params_vec.push(Box::new(level.clone()));
            updates.push(format!("activity_level = ?{}", params_vec.len()));
        }
        if let Some(goal) = data.calorie_goal {
            params_vec.push(Box::new(goal));
            updates.push(format!("calorie_goal = ?{}", params_vec.len()));
        }
        if let Some(settings) = data.macro_settings {
            params_vec.push(Box::new(settings.protein_pct));
            updates.push(format!("protein_pct = ?{}", params_vec.len()));
            params_vec.push(Box::new(settings.carbs_pct));
            updates.push(format!("carbs_pct = ?{}", params_vec.len()));
            params_vec.push(Box::new(settings.fat_pct));
            updates.push(format!("fat_pct = ?{}", params_vec.len()));
        }

        if !updates.is_empty() {
            updates.push("updated_at = datetime('now')".to_string());
            params_vec.push(Box::new(user_id.to_string()));

            let sql = format!(
                "UPDATE profiles SET {} WHERE user_id = ?{}",
                updates.join(", "),
                params_vec.len()
            );

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            tx.execute(&sql, params_refs.as_slice())?;
        }

        let profile = Self::get(&tx, user_id)?
            .ok_or(crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;
        tx.commit()?;
        Ok(profile)
    }

    /// Typed energy-estimate inputs from the stored fields
    pub fn biometrics(&self) -> BiometricInput {
        BiometricInput {
            age_years: self.age,
            height_inches: self.height_inches,
            weight_pounds: self.weight_pounds,
            sex: self.sex.as_deref().and_then(Sex::from_str),
            activity_level: self.activity_level.as_deref().and_then(ActivityLevel::from_str),
        }
    }

    /// The stored split, or the default when the stored triple is invalid
    pub fn macro_allocation(&self) -> MacroAllocation {
        match self.macro_settings.validate() {
            Ok(allocation) => allocation,
            Err(e) => {
                tracing::warn!(
                    "Stored macro settings for '{}' are invalid ({}). Using default split.",
                    self.user_id,
                    e
                );
                MacroAllocation::default()
            }
        }
    }
}
