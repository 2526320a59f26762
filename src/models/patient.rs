use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{Goal, RiskFactor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub risk_factors: Vec<RiskFactor>,
    pub goals: Vec<Goal>,
    pub created_at: NaiveDateTime,
}

/// Input for creating a patient profile. `age` is signed because it arrives
/// straight from a form field and is range-checked before any write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: i64,
    pub risk_factors: Vec<RiskFactor>,
    pub goals: Vec<Goal>,
}
