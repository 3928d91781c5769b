use roster_core::db::open_db_in_memory;
use roster_core::{
    Member, MemberRepository, RepoError, SqliteMemberRepository, SqliteTeamRepository, Team,
    TeamRepository,
};
use std::collections::HashSet;

#[test]
fn team_save_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTeamRepository::try_new(&conn).unwrap();

    let team = Team::new("teamA");
    let id = repo.save(&team).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, team);
}

#[test]
fn team_crud_count_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTeamRepository::try_new(&conn).unwrap();

    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    repo.save(&team_a).unwrap();
    repo.save(&team_b).unwrap();

    assert_eq!(repo.find_all().unwrap().len(), 2);
    assert_eq!(repo.count().unwrap(), 2);

    repo.delete(&team_a).unwrap();
    assert_eq!(repo.count().unwrap(), 1);

    let ghost = Team::new("ghost");
    let err = repo.delete(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn loaded_team_reconstructs_its_member_collection() {
    let conn = open_db_in_memory().unwrap();
    let member_repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let team_repo = SqliteTeamRepository::try_new(&conn).unwrap();

    let mut team = Team::new("teamA");
    team_repo.save(&team).unwrap();

    let member1 = Member::with_team("member1", 20, &mut team);
    let member2 = Member::with_team("member2", 21, &mut team);
    member_repo.save(&member1).unwrap();
    member_repo.save(&member2).unwrap();

    let loaded = team_repo.find_by_id(team.id).unwrap().unwrap();
    let loaded_ids: HashSet<_> = loaded.member_ids.iter().copied().collect();
    assert_eq!(loaded_ids, HashSet::from([member1.id, member2.id]));
}

#[test]
fn member_with_unsaved_team_violates_the_foreign_key() {
    let conn = open_db_in_memory().unwrap();
    let member_repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut team = Team::new("never saved");
    let member = Member::with_team("member1", 20, &mut team);

    let err = member_repo.save(&member).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}
