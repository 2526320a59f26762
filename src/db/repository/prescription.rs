use rusqlite::{params, Connection, OptionalExtension};

use super::patient::patient_exists;
use super::{enum_column, format_timestamp, json_column, now_timestamp, timestamp_column};
use crate::db::DatabaseError;
use crate::models::{ExerciseSnapshot, NewPrescription, Prescription};

const PRESCRIPTION_COLUMNS: &str =
    "id, patient_id, exercises, frequency, duration, notes, created_at";

/// Persist a prescription with its own copy of the exercise list.
pub fn create_prescription(
    conn: &Connection,
    input: &NewPrescription,
) -> Result<Prescription, DatabaseError> {
    let exercises = validate_exercises(&input.exercises)?;

    let tx = conn.unchecked_transaction()?;
    if !patient_exists(&tx, input.patient_id)? {
        tracing::warn!(patient_id = input.patient_id, "Prescription for unknown patient rejected");
        return Err(DatabaseError::missing("patient", input.patient_id));
    }

    let created_at = now_timestamp();
    tx.execute(
        "INSERT INTO prescriptions (patient_id, exercises, frequency, duration, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            input.patient_id,
            serde_json::to_string(&exercises)?,
            input.frequency.as_str(),
            input.duration.as_str(),
            input.notes,
            format_timestamp(&created_at),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    tracing::info!(
        prescription_id = id,
        patient_id = input.patient_id,
        exercises = exercises.len(),
        "Prescription created"
    );

    Ok(Prescription {
        id,
        patient_id: input.patient_id,
        exercises,
        frequency: input.frequency,
        duration: input.duration,
        notes: input.notes.clone(),
        created_at,
    })
}

fn validate_exercises(
    exercises: &[ExerciseSnapshot],
) -> Result<Vec<ExerciseSnapshot>, DatabaseError> {
    if exercises.is_empty() {
        return Err(DatabaseError::validation("exercises", "at least one exercise is required"));
    }
    exercises
        .iter()
        .enumerate()
        .map(|(i, ex)| {
            let name = ex.name.trim();
            if name.is_empty() {
                return Err(DatabaseError::validation(
                    "exercises",
                    format!("exercise {} has no name", i + 1),
                ));
            }
            Ok(ExerciseSnapshot {
                name: name.to_string(),
                description: ex.description.clone(),
            })
        })
        .collect()
}

pub fn get_prescription(conn: &Connection, id: i64) -> Result<Prescription, DatabaseError> {
    conn.query_row(
        &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"),
        params![id],
        row_to_prescription,
    )
    .optional()?
    .ok_or_else(|| DatabaseError::not_found("prescription", id))
}

/// A patient's prescriptions, most recent first. Unknown patients yield an empty list.
pub fn list_prescriptions_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions
         WHERE patient_id = ?1
         ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], row_to_prescription)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Owning patient of a prescription, or `None` if the prescription does not exist.
pub(crate) fn prescription_owner(
    conn: &Connection,
    prescription_id: i64,
) -> Result<Option<i64>, DatabaseError> {
    let owner = conn
        .query_row(
            "SELECT patient_id FROM prescriptions WHERE id = ?1",
            params![prescription_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(owner)
}

fn row_to_prescription(row: &rusqlite::Row) -> Result<Prescription, rusqlite::Error> {
    Ok(Prescription {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        exercises: json_column(row, 2)?,
        frequency: enum_column(row, 3)?,
        duration: enum_column(row, 4)?,
        notes: row.get(5)?,
        created_at: timestamp_column(row, 6)?,
    })
}
