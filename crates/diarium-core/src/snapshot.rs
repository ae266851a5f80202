//! Read-only access to the snapshot database.
//!
//! The snapshot is produced out of band by the collector and regenerated
//! wholesale; this crate never writes it. Connections are opened with
//! `SQLITE_OPEN_READ_ONLY` and the `query_only` pragma as a second guard,
//! and the schema is validated up front so a stale or truncated snapshot
//! fails the build immediately instead of mid-page.

use crate::error::ErrorCode;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The single table the snapshot carries.
pub const DOCUMENTS_TABLE: &str = "documents";

/// Columns every usable snapshot must expose on the documents table.
pub const REQUIRED_COLUMNS: [&str; 16] = [
    "documentId",
    "documentDate",
    "documentOrigin",
    "documentType",
    "caseId",
    "caseName",
    "caseSubject",
    "companyId",
    "companyName",
    "workplaceId",
    "workplaceName",
    "countyId",
    "countyName",
    "municipalityId",
    "municipalityName",
    "created",
];

/// Canonical documents DDL, as written by the collector.
///
/// The query layer never executes this against a snapshot; it exists for
/// schema-mismatch diagnostics and for seeding fixture databases in tests
/// and benches.
pub const DOCUMENTS_TABLE_SQL: &str = "CREATE TABLE documents (
    documentId TEXT PRIMARY KEY,
    documentDate TEXT NOT NULL,
    documentOrigin TEXT NOT NULL,
    documentType TEXT NOT NULL,
    caseId TEXT NOT NULL,
    caseName TEXT NOT NULL,
    caseSubject TEXT NOT NULL,
    companyId TEXT,
    companyName TEXT,
    workplaceId TEXT,
    workplaceName TEXT,
    countyId TEXT,
    countyName TEXT,
    municipalityId TEXT,
    municipalityName TEXT,
    created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Errors raised while opening or validating a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{}: snapshot not found at {}", ErrorCode::SnapshotMissing, .path.display())]
    Missing { path: PathBuf },

    #[error("{}: {} is not a SQLite database", ErrorCode::SnapshotCorrupt, .path.display())]
    Corrupt { path: PathBuf },

    #[error(
        "{}: snapshot {} does not match the documents schema: {}",
        ErrorCode::SnapshotSchemaMismatch,
        .path.display(),
        .detail
    )]
    SchemaMismatch { path: PathBuf, detail: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl SnapshotError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Missing { .. } => ErrorCode::SnapshotMissing,
            Self::Corrupt { .. } => ErrorCode::SnapshotCorrupt,
            Self::SchemaMismatch { .. } => ErrorCode::SnapshotSchemaMismatch,
            Self::Sqlite(_) => ErrorCode::QueryFailed,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// Open the snapshot at `path` read-only and validate its schema.
///
/// # Errors
///
/// Returns [`SnapshotError::Missing`] when the file does not exist,
/// [`SnapshotError::Corrupt`] when it is not a SQLite database, and
/// [`SnapshotError::SchemaMismatch`] when the documents table or one of
/// its required columns is absent.
pub fn open_snapshot(path: &Path) -> Result<Connection, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::Missing {
            path: path.to_path_buf(),
        });
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.pragma_update(None, "query_only", "ON")?;
    validate_schema(&conn, path)?;

    tracing::debug!(path = %path.display(), "opened snapshot read-only");
    Ok(conn)
}

/// Create the documents table on a fixture connection.
///
/// # Errors
///
/// Returns an error if the DDL fails (e.g. the table already exists).
pub fn create_documents_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(DOCUMENTS_TABLE_SQL, [])?;
    Ok(())
}

fn validate_schema(conn: &Connection, path: &Path) -> Result<(), SnapshotError> {
    let table_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [DOCUMENTS_TABLE],
            |row| row.get(0),
        )
        .map_err(|err| classify_sqlite_error(err, path))?;

    if !table_exists {
        return Err(SnapshotError::SchemaMismatch {
            path: path.to_path_buf(),
            detail: format!("missing {DOCUMENTS_TABLE} table"),
        });
    }

    let columns = table_columns(conn)?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|required| !columns.iter().any(|c| c == required))
        .collect();

    if !missing.is_empty() {
        return Err(SnapshotError::SchemaMismatch {
            path: path.to_path_buf(),
            detail: format!("missing columns: {}", missing.join(", ")),
        });
    }

    Ok(())
}

fn table_columns(conn: &Connection) -> Result<Vec<String>, SnapshotError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({DOCUMENTS_TABLE})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn classify_sqlite_error(err: rusqlite::Error, path: &Path) -> SnapshotError {
    if let rusqlite::Error::SqliteFailure(cause, _) = &err
        && cause.code == rusqlite::ErrorCode::NotADatabase
    {
        return SnapshotError::Corrupt {
            path: path.to_path_buf(),
        };
    }
    SnapshotError::Sqlite(err)
}

#[cfg(test)]
mod tests {
    use super::{SnapshotError, create_documents_table, open_snapshot};
    use crate::error::ErrorCode;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn snapshot_path(dir: &TempDir) -> PathBuf {
        dir.path().join("db.sqlite")
    }

    fn write_valid_snapshot(path: &std::path::Path) {
        let conn = Connection::open(path).expect("create snapshot");
        create_documents_table(&conn).expect("create documents table");
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let dir = TempDir::new().expect("tempdir");
        let err = open_snapshot(&snapshot_path(&dir)).expect_err("must fail");
        assert!(matches!(err, SnapshotError::Missing { .. }));
        assert_eq!(err.code(), ErrorCode::SnapshotMissing);
    }

    #[test]
    fn garbage_file_is_reported_corrupt() {
        let dir = TempDir::new().expect("tempdir");
        let path = snapshot_path(&dir);
        std::fs::write(&path, b"this is not a sqlite database, not even close")
            .expect("write garbage");

        let err = open_snapshot(&path).expect_err("must fail");
        assert!(matches!(err, SnapshotError::Corrupt { .. }));
        assert_eq!(err.code(), ErrorCode::SnapshotCorrupt);
    }

    #[test]
    fn database_without_documents_table_is_schema_mismatch() {
        let dir = TempDir::new().expect("tempdir");
        let path = snapshot_path(&dir);
        let conn = Connection::open(&path).expect("create db");
        conn.execute("CREATE TABLE something_else (id TEXT)", [])
            .expect("create table");
        drop(conn);

        let err = open_snapshot(&path).expect_err("must fail");
        assert!(matches!(err, SnapshotError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("missing documents table"));
    }

    #[test]
    fn database_with_missing_column_is_schema_mismatch() {
        let dir = TempDir::new().expect("tempdir");
        let path = snapshot_path(&dir);
        let conn = Connection::open(&path).expect("create db");
        conn.execute(
            "CREATE TABLE documents (documentId TEXT PRIMARY KEY, documentDate TEXT)",
            [],
        )
        .expect("create partial table");
        drop(conn);

        let err = open_snapshot(&path).expect_err("must fail");
        assert!(matches!(err, SnapshotError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("caseName"));
    }

    #[test]
    fn valid_snapshot_opens() {
        let dir = TempDir::new().expect("tempdir");
        let path = snapshot_path(&dir);
        write_valid_snapshot(&path);

        let conn = open_snapshot(&path).expect("open snapshot");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0);
    }

    #[test]
    fn snapshot_connection_rejects_writes() {
        let dir = TempDir::new().expect("tempdir");
        let path = snapshot_path(&dir);
        write_valid_snapshot(&path);

        let conn = open_snapshot(&path).expect("open snapshot");
        let result = conn.execute(
            "INSERT INTO documents (documentId, documentDate, documentOrigin, documentType, \
             caseId, caseName, caseSubject) VALUES ('x', '2024-01-01', 'o', 't', 'c', 'n', 's')",
            [],
        );
        assert!(result.is_err(), "read-only connection accepted a write");
    }

    #[test]
    fn error_messages_carry_machine_codes() {
        let dir = TempDir::new().expect("tempdir");
        let err = open_snapshot(&snapshot_path(&dir)).expect_err("must fail");
        assert!(err.to_string().starts_with("E2001"));
    }
}
