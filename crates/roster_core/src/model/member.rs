//! Member entity.
//!
//! # Responsibility
//! - Hold member identity, attributes and the owning side of the team
//!   association.
//! - Provide the explicit bidirectional-update helper that keeps the team's
//!   member collection consistent with `team_id`.

use crate::model::team::{Team, TeamId};
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable surrogate key for members.
pub type MemberId = Uuid;

/// A person on the roster, optionally belonging to one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable surrogate key, generated at construction.
    pub id: MemberId,
    pub username: String,
    pub age: u32,
    /// Owning side of the team association.
    pub team_id: Option<TeamId>,
}

impl Member {
    /// Creates a member with age 0 and no team.
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_age(username, 0)
    }

    /// Creates a member with an explicit age and no team.
    pub fn with_age(username: impl Into<String>, age: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            age,
            team_id: None,
        }
    }

    /// Creates a member already assigned to `team`.
    ///
    /// The team's member collection is updated as part of construction.
    pub fn with_team(username: impl Into<String>, age: u32, team: &mut Team) -> Self {
        let mut member = Self::with_age(username, age);
        member.assign_to_team(team);
        member
    }

    /// Assigns this member to `team`, updating both association sides.
    ///
    /// # Invariants
    /// - `self.team_id` always points at `team.id` afterwards.
    /// - `team.member_ids` contains `self.id` exactly once afterwards.
    /// - A previous team's collection is not touched; reassignment away from
    ///   a team is expressed by reloading that team from storage.
    pub fn assign_to_team(&mut self, team: &mut Team) {
        self.team_id = Some(team.id);
        team.attach_member(self.id);
    }

    /// Checks entity invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::BlankUsername);
        }
        Ok(())
    }
}
