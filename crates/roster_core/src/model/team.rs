//! Team entity.
//!
//! # Invariants
//! - `member_ids` is the inverse side of the member association. It is kept
//!   in sync by `Member::assign_to_team` and reconstructed from member rows
//!   when a team is loaded; it is never written to storage as a column.

use crate::model::member::MemberId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable surrogate key for teams.
pub type TeamId = Uuid;

/// A named group that members can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable surrogate key, generated at construction.
    pub id: TeamId,
    pub name: String,
    /// Inverse side of the member association. In-memory view only.
    pub member_ids: Vec<MemberId>,
}

impl Team {
    /// Creates a team with a generated key and no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            member_ids: Vec::new(),
        }
    }

    /// Checks entity invariants prior to persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankTeamName);
        }
        Ok(())
    }

    /// Records a member on the inverse side. Idempotent per member id.
    pub(crate) fn attach_member(&mut self, member_id: MemberId) {
        if !self.member_ids.contains(&member_id) {
            self.member_ids.push(member_id);
        }
    }
}
