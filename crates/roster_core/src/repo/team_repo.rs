//! Team repository contract and SQLite implementation.
//!
//! # Invariants
//! - The member collection on a loaded team is reconstructed from member
//!   rows (the inverse side); only `uuid` and `name` are written.
//! - Write paths call `Team::validate()` before SQL mutations.

use crate::model::member::MemberId;
use crate::model::team::{Team, TeamId};
use crate::repo::{
    ensure_connection_ready, parse_uuid, table_exists, table_has_column, RepoError, RepoResult,
};
use rusqlite::{params, Connection};

const TEAM_COLUMNS: &[&str] = &["uuid", "name", "created_at", "updated_at"];

/// Repository contract for team persistence.
pub trait TeamRepository {
    /// Inserts the team, or updates the existing row with the same key.
    fn save(&self, team: &Team) -> RepoResult<TeamId>;
    fn find_by_id(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn find_all(&self) -> RepoResult<Vec<Team>>;
    fn count(&self) -> RepoResult<u64>;
    /// Deletes by the team's key. Fails with `NotFound` when no row exists.
    fn delete(&self, team: &Team) -> RepoResult<()>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "teams", TEAM_COLUMNS)?;
        // Loading a team reads its members back from the owning side.
        if !table_exists(conn, "members")? {
            return Err(RepoError::MissingRequiredTable("members"));
        }
        if !table_has_column(conn, "members", "team_uuid")? {
            return Err(RepoError::MissingRequiredColumn {
                table: "members",
                column: "team_uuid",
            });
        }
        Ok(Self { conn })
    }

    fn load_member_ids(&self, team_uuid: &str) -> RepoResult<Vec<MemberId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM members
             WHERE team_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([team_uuid])?;
        let mut member_ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            member_ids.push(parse_uuid(&value, "members.uuid")?);
        }
        Ok(member_ids)
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn save(&self, team: &Team) -> RepoResult<TeamId> {
        team.validate()?;

        self.conn.execute(
            "INSERT INTO teams (uuid, name)
             VALUES (?1, ?2)
             ON CONFLICT (uuid) DO UPDATE SET
                name = excluded.name,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![team.id.to_string(), team.name.as_str()],
        )?;

        Ok(team.id)
    }

    fn find_by_id(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name FROM teams WHERE uuid = ?1;")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let team_id = parse_uuid(&uuid_text, "teams.uuid")?;
            let member_ids = self.load_member_ids(&uuid_text)?;
            return Ok(Some(Team {
                id: team_id,
                name: row.get("name")?,
                member_ids,
            }));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name FROM teams ORDER BY created_at ASC, uuid ASC;")?;

        let mut rows = stmt.query([])?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let team_id = parse_uuid(&uuid_text, "teams.uuid")?;
            let member_ids = self.load_member_ids(&uuid_text)?;
            teams.push(Team {
                id: team_id,
                name: row.get("name")?,
                member_ids,
            });
        }
        Ok(teams)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM teams;", [], |row| row.get::<_, u64>(0))?;
        Ok(count)
    }

    fn delete(&self, team: &Team) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM teams WHERE uuid = ?1;", [team.id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(team.id));
        }

        Ok(())
    }
}
