//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

fn schema_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        migrate_schema(conn, 1)?;
    } else if current_version < SCHEMA_VERSION {
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| schema_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| schema_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| schema_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

fn execute_all(conn: &Connection, statements: &[(&str, &str)]) -> StorageResult<()> {
    for (name, sql) in statements {
        conn.execute(sql, [])
            .map_err(|e| schema_error(format!("Failed to create {}: {}", name, e)))?;
    }
    Ok(())
}

/// Base schema: client directory, profiles, service records and notices.
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    execute_all(
        conn,
        &[
            (
                "client_groups table",
                "CREATE TABLE IF NOT EXISTS client_groups (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                )",
            ),
            (
                "clients table",
                "CREATE TABLE IF NOT EXISTS clients (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    biz_reg_no TEXT,
                    phone TEXT,
                    address TEXT,
                    manager TEXT,
                    van_company TEXT,
                    equipment TEXT,
                    group_id TEXT REFERENCES client_groups(id) ON DELETE SET NULL,
                    memo TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
            ),
            (
                "profiles table",
                "CREATE TABLE IF NOT EXISTS profiles (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    username TEXT,
                    display_name TEXT,
                    phone TEXT,
                    team_name TEXT,
                    role TEXT NOT NULL DEFAULT 'field',
                    is_approved INTEGER NOT NULL DEFAULT 0,
                    allowed_groups TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL
                )",
            ),
            (
                "service_records table",
                "CREATE TABLE IF NOT EXISTS service_records (
                    id TEXT PRIMARY KEY,
                    client_id TEXT NOT NULL REFERENCES clients(id),
                    type TEXT NOT NULL,
                    details TEXT,
                    status TEXT NOT NULL DEFAULT 'pending',
                    receiver_id TEXT REFERENCES profiles(id) ON DELETE SET NULL,
                    processor_id TEXT REFERENCES profiles(id) ON DELETE SET NULL,
                    reception_at TEXT NOT NULL,
                    processed_at TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
            ),
            (
                "notices table",
                "CREATE TABLE IF NOT EXISTS notices (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL DEFAULT '',
                    allowed_roles TEXT NOT NULL,
                    author_id TEXT REFERENCES profiles(id) ON DELETE SET NULL,
                    is_pinned INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
            ),
            (
                "client indexes",
                "CREATE INDEX IF NOT EXISTS idx_clients_name ON clients(name)",
            ),
            (
                "client indexes",
                "CREATE INDEX IF NOT EXISTS idx_clients_group ON clients(group_id)",
            ),
            (
                "record indexes",
                "CREATE INDEX IF NOT EXISTS idx_records_client ON service_records(client_id)",
            ),
            (
                "record indexes",
                "CREATE INDEX IF NOT EXISTS idx_records_status ON service_records(status)",
            ),
            (
                "record indexes",
                "CREATE INDEX IF NOT EXISTS idx_records_reception ON service_records(reception_at)",
            ),
        ],
    )
}

fn migrate_schema(conn: &Connection, from_version: i32) -> StorageResult<()> {
    let mut version = from_version;

    while version < SCHEMA_VERSION {
        match version {
            1 => migrate_v1_to_v2(conn)?,
            _ => {
                return Err(schema_error(format!(
                    "Unknown schema version: {}",
                    version
                )));
            }
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

/// Migrate from schema version 1 to version 2.
///
/// Adds the activity log and the administrator-maintained catalogs
/// (service types, VAN companies, equipment types).
fn migrate_v1_to_v2(conn: &Connection) -> StorageResult<()> {
    let mut statements = vec![
        (
            "activity_logs table",
            "CREATE TABLE IF NOT EXISTS activity_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                user_email TEXT,
                user_display_name TEXT,
                action TEXT NOT NULL,
                target_type TEXT NOT NULL,
                target_id TEXT,
                details TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL
            )"
            .to_string(),
        ),
        (
            "activity indexes",
            "CREATE INDEX IF NOT EXISTS idx_activity_created ON activity_logs(created_at)"
                .to_string(),
        ),
        (
            "activity indexes",
            "CREATE INDEX IF NOT EXISTS idx_activity_target ON activity_logs(target_type)"
                .to_string(),
        ),
    ];

    for table in ["service_types", "van_companies", "equipment_types"] {
        statements.push((
            "catalog table",
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                )"
            ),
        ));
    }

    let borrowed: Vec<(&str, &str)> = statements
        .iter()
        .map(|(name, sql)| (*name, sql.as_str()))
        .collect();
    execute_all(conn, &borrowed)
}

/// Drop all tables (for testing).
pub fn drop_all_tables(conn: &Connection) -> StorageResult<()> {
    for table in [
        "activity_logs",
        "service_types",
        "van_companies",
        "equipment_types",
        "notices",
        "service_records",
        "clients",
        "client_groups",
        "profiles",
        "schema_version",
    ] {
        conn.execute(&format!("DROP TABLE IF EXISTS {table}"), [])
            .map_err(|e| schema_error(format!("Failed to drop {}: {}", table, e)))?;
    }
    Ok(())
}
