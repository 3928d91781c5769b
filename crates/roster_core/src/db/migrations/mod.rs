//! Schema migration registry and executor.
//!
//! # Responsibility
//! - Hold the ordered list of schema migrations compiled into this build.
//! - Bring a connection from its installed version up to the latest one.
//!
//! # Invariants
//! - Registry `version` values are strictly increasing.
//! - All pending migrations apply inside one transaction; the installed
//!   version is mirrored to `PRAGMA user_version` as each one lands.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "member_lookup_indexes",
        sql: include_str!("0002_member_lookup_indexes.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Brings the connection's schema up to `latest_version`.
///
/// A database ahead of this build is rejected rather than touched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let installed = schema_version(conn)?;
    let latest = latest_version();

    if installed > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            found: installed,
            supported: latest,
        });
    }
    if installed == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > installed) {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version)))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

pub(crate) fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
