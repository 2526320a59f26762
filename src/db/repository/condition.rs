use rusqlite::{params, Connection, OptionalExtension};

use super::patient::patient_exists;
use crate::db::DatabaseError;
use crate::models::Condition;

pub fn list_conditions(conn: &Connection) -> Result<Vec<Condition>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM conditions ORDER BY id")?;
    let rows = stmt.query_map([], row_to_condition)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Link a condition label to a patient, creating the condition row on first
/// use. Linking the same label twice is a no-op.
pub fn attach_condition(
    conn: &Connection,
    patient_id: i64,
    label: &str,
) -> Result<Condition, DatabaseError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(DatabaseError::validation("condition", "must not be empty"));
    }

    let tx = conn.unchecked_transaction()?;
    if !patient_exists(&tx, patient_id)? {
        return Err(DatabaseError::missing("patient", patient_id));
    }

    let condition = match find_condition(&tx, label)? {
        Some(existing) => existing,
        None => {
            tx.execute(
                "INSERT INTO conditions (name, description) VALUES (?1, NULL)",
                params![label],
            )?;
            Condition {
                id: tx.last_insert_rowid(),
                name: label.to_string(),
                description: None,
            }
        }
    };

    tx.execute(
        "INSERT OR IGNORE INTO patient_conditions (patient_id, condition_id) VALUES (?1, ?2)",
        params![patient_id, condition.id],
    )?;
    tx.commit()?;
    tracing::info!(patient_id, condition_id = condition.id, "Condition attached");

    Ok(condition)
}

/// Conditions linked to a patient, alphabetically.
pub fn list_conditions_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Condition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.description
         FROM conditions c
         JOIN patient_conditions pc ON pc.condition_id = c.id
         WHERE pc.patient_id = ?1
         ORDER BY c.name",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_condition)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn find_condition(conn: &Connection, name: &str) -> Result<Option<Condition>, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT id, name, description FROM conditions WHERE name = ?1",
            params![name],
            row_to_condition,
        )
        .optional()?;
    Ok(found)
}

fn row_to_condition(row: &rusqlite::Row) -> Result<Condition, rusqlite::Error> {
    Ok(Condition {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}
