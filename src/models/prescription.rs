use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{Frequency, SessionDuration};
use super::exercise::ExerciseSnapshot;

/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub exercises: Vec<ExerciseSnapshot>,
    pub frequency: Frequency,
    pub duration: SessionDuration,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrescription {
    pub patient_id: i64,
    pub exercises: Vec<ExerciseSnapshot>,
    pub frequency: Frequency,
    pub duration: SessionDuration,
    pub notes: String,
}
