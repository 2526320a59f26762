//! Storage diagnostics: where the database lives, what tables it holds,
//! and how many patients it records. Read-only; an absent file is reported,
//! never created.

use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use super::repository::count_patients;
use super::session::Database;
use super::sqlite::{current_schema_version, table_names};
use super::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    pub schema_version: i64,
    pub tables: Vec<TableInfo>,
    pub patient_count: Option<i64>,
}

pub fn database_status(db: &Database) -> Result<DatabaseStatus, DatabaseError> {
    let path = db.path().to_path_buf();
    let metadata = match std::fs::metadata(&path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(DatabaseStatus {
                path,
                exists: false,
                size_bytes: 0,
                schema_version: 0,
                tables: Vec::new(),
                patient_count: None,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut tables = Vec::new();
    for name in table_names(&conn)? {
        let columns = table_columns(&conn, &name)?;
        tables.push(TableInfo { name, columns });
    }
    let patient_count = if tables.iter().any(|t| t.name == "patients") {
        Some(count_patients(&conn)?)
    } else {
        None
    };

    Ok(DatabaseStatus {
        path,
        exists: true,
        size_bytes: metadata.len(),
        schema_version: current_schema_version(&conn),
        tables,
        patient_count,
    })
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map([table], |row| {
        Ok(ColumnInfo {
            name: row.get(0)?,
            declared_type: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::create_patient;
    use crate::models::NewPatient;

    #[test]
    fn absent_file_reported_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("missing.db"));
        let status = database_status(&db).unwrap();
        assert!(!status.exists);
        assert!(status.tables.is_empty());
        assert_eq!(status.patient_count, None);
        assert!(!db.path().exists());
    }

    #[test]
    fn initialised_database_lists_tables_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("records.db"));
        db.ensure_schema().unwrap();
        db.run(|conn| {
            create_patient(conn, &NewPatient {
                name: "Jane".into(),
                age: 72,
                risk_factors: vec![],
                goals: vec![],
            })
        })
        .unwrap();

        let status = database_status(&db).unwrap();
        assert!(status.exists);
        assert!(status.size_bytes > 0);
        assert_eq!(status.schema_version, 1);
        assert_eq!(status.patient_count, Some(1));

        let progress = status.tables.iter().find(|t| t.name == "progress").unwrap();
        let pain = progress.columns.iter().find(|c| c.name == "pain_level").unwrap();
        assert_eq!(pain.declared_type, "INTEGER");
    }

    #[test]
    fn empty_file_has_no_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.db");
        std::fs::write(&path, b"").unwrap();
        let status = database_status(&Database::new(&path)).unwrap();
        assert!(status.exists);
        assert!(status.tables.is_empty());
        assert_eq!(status.schema_version, 0);
        assert_eq!(status.patient_count, None);
    }
}
