//! Member repository contract and SQLite implementation.
//!
//! Each query method is a named, explicit function with its SQL kept inside
//! this persistence boundary; there is no name-based derivation layer.
//!
//! # Invariants
//! - Write paths call `Member::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List queries order by `created_at ASC, uuid ASC`, except `find_top3`,
//!   which intentionally leaves ordering to the store.

use crate::model::member::{Member, MemberId};
use crate::model::team::TeamId;
use crate::repo::member_repo_custom::MemberRepositoryCustom;
use crate::repo::named_queries::{named_query, MEMBER_BY_USERNAME};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{named_params, params, params_from_iter, Connection, Row, Rows};
use serde::{Deserialize, Serialize};

const MEMBER_SELECT_SQL: &str = "SELECT
    uuid,
    username,
    age,
    team_uuid
FROM members";

const MEMBER_COLUMNS: &[&str] = &[
    "uuid",
    "username",
    "age",
    "team_uuid",
    "created_at",
    "updated_at",
];

/// Flattened read-only view joining a member to its team name.
///
/// Built fresh per result row; never tracked or written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: MemberId,
    pub username: String,
    /// `None` when the member has no team association.
    pub team_name: Option<String>,
}

/// Repository contract for member persistence and queries.
///
/// `MemberRepositoryCustom` is a supertrait, so callers see one unified
/// repository surface regardless of which half answers a given method.
pub trait MemberRepository: MemberRepositoryCustom {
    /// Inserts the member, or updates the existing row with the same key.
    fn save(&self, member: &Member) -> RepoResult<MemberId>;
    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;
    fn find_all(&self) -> RepoResult<Vec<Member>>;
    fn count(&self) -> RepoResult<u64>;
    /// Deletes by the member's key. Fails with `NotFound` when no row exists.
    fn delete(&self, member: &Member) -> RepoResult<()>;
    /// Members whose username equals `username` and whose age is strictly
    /// greater than `min_age`.
    fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        min_age: u32,
    ) -> RepoResult<Vec<Member>>;
    /// Members with exactly this username, via the registered named query.
    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;
    /// First 3 members in store order.
    fn find_top3(&self) -> RepoResult<Vec<Member>>;
    /// Scalar projection of all usernames.
    fn find_username_list(&self) -> RepoResult<Vec<String>>;
    /// Member/team join projected into `MemberDto` rows.
    fn find_member_dto(&self) -> RepoResult<Vec<MemberDto>>;
    /// Members whose username is contained in `names`.
    fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Member>>;
    /// Members assigned to the given team.
    fn find_by_team_id(&self, team_id: TeamId) -> RepoResult<Vec<Member>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    pub(crate) conn: &'conn Connection,
    by_username_sql: &'static str,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Resolves the named queries this repository depends on, so an
    /// unregistered name fails here instead of on the first lookup.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "members", MEMBER_COLUMNS)?;
        let by_username_sql = named_query(MEMBER_BY_USERNAME)
            .ok_or(RepoError::UnknownNamedQuery(MEMBER_BY_USERNAME))?;
        Ok(Self {
            conn,
            by_username_sql,
        })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn save(&self, member: &Member) -> RepoResult<MemberId> {
        member.validate()?;

        self.conn.execute(
            "INSERT INTO members (uuid, username, age, team_uuid)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (uuid) DO UPDATE SET
                username = excluded.username,
                age = excluded.age,
                team_uuid = excluded.team_uuid,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                member.id.to_string(),
                member.username.as_str(),
                member.age,
                member.team_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(member.id)
    }

    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let rows = stmt.query([])?;
        collect_members(rows)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM members;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(count)
    }

    fn delete(&self, member: &Member) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM members WHERE uuid = ?1;",
            [member.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(member.id));
        }

        Ok(())
    }

    fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        min_age: u32,
    ) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE username = ?1
               AND age > ?2
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let rows = stmt.query(params![username, min_age])?;
        collect_members(rows)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(self.by_username_sql)?;
        let rows = stmt.query(named_params! { ":username": username })?;
        collect_members(rows)
    }

    fn find_top3(&self) -> RepoResult<Vec<Member>> {
        // No ORDER BY: the result-limiting clause is the whole contract.
        let mut stmt = self.conn.prepare(&format!("{MEMBER_SELECT_SQL} LIMIT 3;"))?;
        let rows = stmt.query([])?;
        collect_members(rows)
    }

    fn find_username_list(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT username FROM members ORDER BY created_at ASC, uuid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut usernames = Vec::new();
        while let Some(row) = rows.next()? {
            usernames.push(row.get(0)?);
        }
        Ok(usernames)
    }

    fn find_member_dto(&self) -> RepoResult<Vec<MemberDto>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                m.uuid,
                m.username,
                t.name AS team_name
             FROM members m
             LEFT JOIN teams t ON t.uuid = m.team_uuid
             ORDER BY m.created_at ASC, m.uuid ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut dtos = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            dtos.push(MemberDto {
                id: parse_uuid(&uuid_text, "members.uuid")?,
                username: row.get("username")?,
                team_name: row.get("team_name")?,
            });
        }
        Ok(dtos)
    }

    fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Member>> {
        if names.is_empty() {
            // SQLite rejects an empty IN list; the result is known anyway.
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE username IN ({placeholders})
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let rows = stmt.query(params_from_iter(names.iter()))?;
        collect_members(rows)
    }

    fn find_by_team_id(&self, team_id: TeamId) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE team_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let rows = stmt.query([team_id.to_string()])?;
        collect_members(rows)
    }
}

pub(crate) fn collect_members(mut rows: Rows<'_>) -> RepoResult<Vec<Member>> {
    let mut members = Vec::new();
    while let Some(row) = rows.next()? {
        members.push(parse_member_row(row)?);
    }
    Ok(members)
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "members.uuid")?;

    let team_id = match row.get::<_, Option<String>>("team_uuid")? {
        Some(value) => Some(parse_uuid(&value, "members.team_uuid")?),
        None => None,
    };

    Ok(Member {
        id,
        username: row.get("username")?,
        age: row.get("age")?,
        team_id,
    })
}
