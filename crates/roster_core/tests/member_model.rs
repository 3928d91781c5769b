use roster_core::{Member, Team, ValidationError};
use serde_json::json;

#[test]
fn new_member_has_no_team_and_zero_age() {
    let member = Member::new("memberA");
    assert_eq!(member.username, "memberA");
    assert_eq!(member.age, 0);
    assert!(member.team_id.is_none());
}

#[test]
fn assign_to_team_updates_both_sides() {
    let mut team = Team::new("teamA");
    let mut member = Member::with_age("memberA", 20);

    member.assign_to_team(&mut team);

    assert_eq!(member.team_id, Some(team.id));
    assert_eq!(team.member_ids, vec![member.id]);
}

#[test]
fn assigning_twice_keeps_one_collection_entry() {
    let mut team = Team::new("teamA");
    let mut member = Member::new("memberA");

    member.assign_to_team(&mut team);
    member.assign_to_team(&mut team);

    assert_eq!(team.member_ids, vec![member.id]);
}

#[test]
fn with_team_constructor_wires_the_association() {
    let mut team = Team::new("teamA");
    let member = Member::with_team("memberA", 20, &mut team);

    assert_eq!(member.team_id, Some(team.id));
    assert!(team.member_ids.contains(&member.id));
}

#[test]
fn reassignment_points_at_the_new_team() {
    let mut team_a = Team::new("teamA");
    let mut team_b = Team::new("teamB");
    let mut member = Member::new("memberA");

    member.assign_to_team(&mut team_a);
    member.assign_to_team(&mut team_b);

    assert_eq!(member.team_id, Some(team_b.id));
    assert!(team_b.member_ids.contains(&member.id));
}

#[test]
fn blank_names_fail_validation() {
    let member = Member::new(" ");
    assert_eq!(member.validate(), Err(ValidationError::BlankUsername));

    let team = Team::new("");
    assert_eq!(team.validate(), Err(ValidationError::BlankTeamName));

    assert!(Member::new("ok").validate().is_ok());
    assert!(Team::new("ok").validate().is_ok());
}

#[test]
fn member_serializes_with_stable_field_names() {
    let member = Member::with_age("memberA", 20);
    let value = serde_json::to_value(&member).unwrap();

    assert_eq!(value["username"], json!("memberA"));
    assert_eq!(value["age"], json!(20));
    assert_eq!(value["team_id"], json!(null));
    assert!(value["id"].is_string());
}
