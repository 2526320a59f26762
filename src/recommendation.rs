//! Static condition → exercise recommendation table.
//!
//! Pure data. Lookups are total: an unknown key yields an empty slice.
//! Adding a condition or exercise means adding an entry here, nothing else.

use crate::models::{Difficulty, ExerciseSnapshot, ExerciseTemplate};

// ═══════════════════════════════════════════
// Table
// ═══════════════════════════════════════════

const FALL_PREVENTION: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        name: "Balance Walking",
        description: "Walk heel to toe, as if on a tightrope. Take 20 steps forward.",
        difficulty: Difficulty::Beginner,
        target_areas: &["Balance", "Core stability"],
        contraindications: &["severe vertigo"],
        media_url: None,
    },
    ExerciseTemplate {
        name: "Single Leg Stand",
        description: "Stand on one leg for 30 seconds, then switch.",
        difficulty: Difficulty::Beginner,
        target_areas: &["Balance", "Lower body strength"],
        contraindications: &["acute ankle injury", "recent hip surgery"],
        media_url: None,
    },
];

const PAIN_MANAGEMENT: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        name: "Gentle Stretching",
        description: "Perform gentle full-body stretches, holding each for 15-30 seconds.",
        difficulty: Difficulty::Beginner,
        target_areas: &["Flexibility", "Pain relief"],
        contraindications: &[],
        media_url: None,
    },
    ExerciseTemplate {
        name: "Water Walking",
        description: "Walk in chest-deep water for 10-15 minutes.",
        difficulty: Difficulty::Beginner,
        target_areas: &["Cardiovascular", "Joint mobility"],
        contraindications: &["open wounds"],
        media_url: None,
    },
];

const DIABETES_MANAGEMENT: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        name: "Brisk Walking",
        description: "Walk at a brisk pace for 15-20 minutes.",
        difficulty: Difficulty::Moderate,
        target_areas: &["Cardiovascular", "Blood sugar control"],
        contraindications: &["foot ulcers"],
        media_url: None,
    },
    ExerciseTemplate {
        name: "Resistance Band Exercises",
        description: "Perform upper and lower body exercises with resistance bands.",
        difficulty: Difficulty::Moderate,
        target_areas: &["Strength", "Metabolic health"],
        contraindications: &["shoulder injury"],
        media_url: None,
    },
];

const WEIGHT_MANAGEMENT: &[ExerciseTemplate] = &[
    ExerciseTemplate {
        name: "Circuit Training",
        description: "Alternate between cardio and strength exercises for 20 minutes.",
        difficulty: Difficulty::Advanced,
        target_areas: &["Full body", "Cardiovascular"],
        contraindications: &["unstable heart disease"],
        media_url: None,
    },
    ExerciseTemplate {
        name: "HIIT Walking",
        description: "Alternate between 1 minute fast walking and 2 minutes normal pace.",
        difficulty: Difficulty::Moderate,
        target_areas: &["Cardiovascular", "Weight loss"],
        contraindications: &[],
        media_url: None,
    },
];

const TABLE: &[(&str, &[ExerciseTemplate])] = &[
    ("fall_prevention", FALL_PREVENTION),
    ("pain_management", PAIN_MANAGEMENT),
    ("diabetes_management", DIABETES_MANAGEMENT),
    ("weight_management", WEIGHT_MANAGEMENT),
];

// ═══════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════

/// Derive the lookup key from a display label: lowercase, each space → `_`.
pub fn condition_key(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Exercise templates for a condition key, in table order.
pub fn recommend(key: &str) -> &'static [ExerciseTemplate] {
    TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, exercises)| *exercises)
        .unwrap_or(&[])
}

pub fn recommend_for_label(label: &str) -> &'static [ExerciseTemplate] {
    recommend(&condition_key(label))
}

/// All condition keys the table knows about.
pub fn condition_keys() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(k, _)| *k)
}

/// Snapshot list for a prescription covering the selected condition labels,
/// in selection order.
pub fn exercises_for_conditions<S: AsRef<str>>(labels: &[S]) -> Vec<ExerciseSnapshot> {
    for label in unrecognized_labels(labels) {
        tracing::warn!(label, "No exercises for condition label");
    }
    labels
        .iter()
        .flat_map(|label| recommend_for_label(label.as_ref()))
        .map(ExerciseTemplate::snapshot)
        .collect()
}

/// Labels in `labels` that map to no table entry, in input order.
pub fn unrecognized_labels<S: AsRef<str>>(labels: &[S]) -> Vec<&str> {
    labels
        .iter()
        .map(|label| label.as_ref())
        .filter(|label| recommend_for_label(label).is_empty())
        .collect()
}
