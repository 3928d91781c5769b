//! Hand-issued member queries outside the declarative contract.
//!
//! This is the escape hatch for query shapes the explicit contract does not
//! cover: the implementation issues its SQL directly against the connection.
//! `MemberRepository` lists this trait as a supertrait, so both halves are
//! reachable through one repository value.

use crate::model::member::Member;
use crate::repo::member_repo::{collect_members, SqliteMemberRepository};
use crate::repo::RepoResult;

/// Custom member queries wired in alongside the main contract.
pub trait MemberRepositoryCustom {
    /// All members, fetched through a directly issued query.
    fn find_member_custom(&self) -> RepoResult<Vec<Member>>;
}

impl MemberRepositoryCustom for SqliteMemberRepository<'_> {
    fn find_member_custom(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, username, age, team_uuid FROM members;")?;
        let rows = stmt.query([])?;
        collect_members(rows)
    }
}
