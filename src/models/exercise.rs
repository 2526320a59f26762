use serde::{Deserialize, Serialize};

use super::enums::Difficulty;

/// Reference exercise from the recommendation table. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub target_areas: &'static [&'static str],
    pub contraindications: &'static [&'static str],
    pub media_url: Option<&'static str>,
}

impl ExerciseTemplate {
    /// Copy of the fields a prescription keeps for itself.
    pub fn snapshot(&self) -> ExerciseSnapshot {
        ExerciseSnapshot {
            name: self.name.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Exercise as frozen into a prescription at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSnapshot {
    pub name: String,
    pub description: String,
}
