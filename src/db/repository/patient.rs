use rusqlite::{params, Connection, OptionalExtension};

use super::{dedup_in_order, format_timestamp, json_column, now_timestamp, timestamp_column};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str = "id, name, age, risk_factors, goals, created_at";

/// Insert a patient profile and return it with its assigned id.
pub fn create_patient(conn: &Connection, input: &NewPatient) -> Result<Patient, DatabaseError> {
    let name = input.name.trim();
    if name.is_empty() {
        tracing::warn!("Rejected patient with empty name");
        return Err(DatabaseError::validation("name", "must not be empty"));
    }
    let age = u32::try_from(input.age).map_err(|_| {
        tracing::warn!(age = input.age, "Rejected patient with out-of-range age");
        DatabaseError::validation(
            "age",
            format!("must be between 0 and {}, got {}", u32::MAX, input.age),
        )
    })?;

    let risk_factors = dedup_in_order(&input.risk_factors);
    let goals = dedup_in_order(&input.goals);
    let created_at = now_timestamp();

    conn.execute(
        "INSERT INTO patients (name, age, risk_factors, goals, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            age,
            serde_json::to_string(&risk_factors)?,
            serde_json::to_string(&goals)?,
            format_timestamp(&created_at),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(patient_id = id, "Patient created");

    Ok(Patient {
        id,
        name: name.to_string(),
        age,
        risk_factors,
        goals,
        created_at,
    })
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    conn.query_row(
        &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
        params![id],
        row_to_patient,
    )
    .optional()?
    .ok_or_else(|| DatabaseError::not_found("patient", id))
}

/// All patients, most recently created first.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub(crate) fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        params![id],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        risk_factors: json_column(row, 3)?,
        goals: json_column(row, 4)?,
        created_at: timestamp_column(row, 5)?,
    })
}
