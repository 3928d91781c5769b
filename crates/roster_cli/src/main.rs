//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roster_core` linkage.
//! - Walk one save/query round against an in-memory database.

use roster_core::db::open_db_in_memory;
use roster_core::{
    Member, MemberRepository, SqliteMemberRepository, SqliteTeamRepository, Team, TeamRepository,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("roster_core version={}", roster_core::core_version());

    let conn = open_db_in_memory()?;
    let member_repo = SqliteMemberRepository::try_new(&conn)?;
    let team_repo = SqliteTeamRepository::try_new(&conn)?;

    let mut team = Team::new("blue");
    let member = Member::with_team("casey", 28, &mut team);
    team_repo.save(&team)?;
    member_repo.save(&member)?;

    for dto in member_repo.find_member_dto()? {
        println!(
            "member username={} team={}",
            dto.username,
            dto.team_name.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
