//! Wellness Status Tool
//!
//! Runtime status information and usage notes for the wellness service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage notes for AI assistants
pub const WELLNESS_INSTRUCTIONS: &str = r#"
# Student Wellness Tracker

## Energy (TDEE)

`estimate_tdee` uses the Mifflin-St Jeor equation:

- male:   BMR = 10 x kg + 6.25 x cm - 5 x age + 5
- female: BMR = 10 x kg + 6.25 x cm - 5 x age - 161
- TDEE = round(BMR x activity multiplier)

| activity_level | multiplier |
|----------------|------------|
| sedentary | 1.2 |
| light | 1.375 |
| moderate | 1.55 |
| heavy | 1.725 |
| athlete | 1.9 |

Inputs are inches and pounds. Anything not passed is read from the profile
(`update_profile`). If a field is still missing the tool says which ones.
Pass `apply_as_goal: true` to store the result as the calorie goal.

## Macros

The split is three whole percentages that always add up to 100. The default
is 25% protein, 50% carbs, 25% fat.

- `save_macros` stores an explicit split and rejects anything that does not
  add up to 100.
- `adjust_macros_pair` sets protein or carbs (or moves it by 5% steps);
  fat is always the remainder.
- `adjust_macros_position` works like dragging a two-handle slider: the
  handle nearest the position (0-100) moves.
- `get_macro_targets` converts the split to grams at 4/4/9 kcal per gram.

## Daily logging

Dates are YYYY-MM-DD. Days are created on first use.

- `log_meal` with calories, protein, carbs and fat
- `log_sleep` in hours, `log_steps`, `log_weight` in lbs or kg
- `get_day`, `list_days` and `get_trends` to review
"#;

/// Runtime status of the wellness service
#[derive(Debug, Clone, Serialize)]
pub struct WellnessStatus {
    pub name: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> WellnessStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        WellnessStatus {
            name: build_info.name,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
