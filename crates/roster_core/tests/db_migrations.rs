use roster_core::db::migrations::latest_version;
use roster_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    let tables = schema_objects(&conn, "table");
    assert!(tables.contains(&"teams".to_string()));
    assert!(tables.contains(&"members".to_string()));
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");

    let first = open_db(&path).unwrap();
    assert_eq!(user_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(user_version(&second), latest_version());
    assert!(schema_objects(&second, "table").contains(&"members".to_string()));
}

#[test]
fn reopening_an_older_database_applies_pending_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upgrade.db");

    // Rewind a fully migrated file to version 1 by undoing the index
    // migration, then reopen.
    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "DROP INDEX idx_members_username;
         DROP INDEX idx_members_team_uuid;
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path).unwrap();
    assert_eq!(user_version(&upgraded), latest_version());
    assert!(schema_objects(&upgraded, "index").contains(&"idx_members_username".to_string()));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn member_lookup_indexes_are_created() {
    let conn = open_db_in_memory().unwrap();

    let indexes = schema_objects(&conn, "index");
    for expected in ["idx_members_username", "idx_members_team_uuid"] {
        assert!(
            indexes.contains(&expected.to_string()),
            "index {expected} does not exist"
        );
    }
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn schema_objects(conn: &Connection, kind: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name;")
        .unwrap();
    stmt.query_map([kind], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}
