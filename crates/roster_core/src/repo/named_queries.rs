//! Named-query registry.
//!
//! # Responsibility
//! - Bind reusable SQL to logical query names, mirroring an external
//!   mapping-source convention.
//!
//! # Invariants
//! - Repositories resolve the names they need in `try_new`, so a missing
//!   registry entry is a wiring failure rather than a per-call one.

/// Logical name of the member-by-username lookup.
pub const MEMBER_BY_USERNAME: &str = "Member.findByUsername";

const REGISTRY: &[(&str, &str)] = &[(
    MEMBER_BY_USERNAME,
    "SELECT
        uuid,
        username,
        age,
        team_uuid
    FROM members
    WHERE username = :username
    ORDER BY created_at ASC, uuid ASC;",
)];

/// Resolves the SQL registered under `name`.
pub fn named_query(name: &str) -> Option<&'static str> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, sql)| *sql)
}

#[cfg(test)]
mod tests {
    use super::{named_query, MEMBER_BY_USERNAME};

    #[test]
    fn resolves_registered_name() {
        let sql = named_query(MEMBER_BY_USERNAME).expect("registered query should resolve");
        assert!(sql.contains(":username"));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(named_query("Member.findByNickname").is_none());
    }
}
