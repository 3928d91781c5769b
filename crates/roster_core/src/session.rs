//! Transaction-scoped unit of work with an identity map.
//!
//! # Responsibility
//! - Scope repository calls to one IMMEDIATE transaction.
//! - Hand out one shared handle per entity identity within that scope.
//!
//! # Invariants
//! - Looking up the same id twice in one session returns the same `Rc`
//!   (`Rc::ptr_eq` holds).
//! - Dropping a session without `commit` rolls the transaction back.
//! - The identity maps never outlive their transaction.

use crate::model::member::{Member, MemberId};
use crate::model::team::{Team, TeamId};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::team_repo::{SqliteTeamRepository, TeamRepository};
use crate::repo::RepoResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One unit of work over a borrowed connection.
///
/// Entities read or written through the session are cached by identity, so
/// repeated lookups observe the same in-memory object. The cache is a read
/// cache only; handles are immutable snapshots, not tracked entities.
pub struct Session<'conn> {
    tx: Transaction<'conn>,
    members: RefCell<HashMap<MemberId, Rc<Member>>>,
    teams: RefCell<HashMap<TeamId, Rc<Team>>>,
}

impl<'conn> Session<'conn> {
    /// Opens a transaction and validates repository wiring up front.
    pub fn begin(conn: &'conn mut Connection) -> RepoResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteMemberRepository::try_new(&tx)?;
        SqliteTeamRepository::try_new(&tx)?;
        Ok(Self {
            tx,
            members: RefCell::new(HashMap::new()),
            teams: RefCell::new(HashMap::new()),
        })
    }

    /// Persists the member and caches its handle under its identity.
    pub fn save_member(&self, member: &Member) -> RepoResult<MemberId> {
        let id = self.member_repo()?.save(member)?;
        self.members
            .borrow_mut()
            .insert(id, Rc::new(member.clone()));
        Ok(id)
    }

    /// Finds one member, serving repeated lookups from the identity map.
    pub fn find_member(&self, id: MemberId) -> RepoResult<Option<Rc<Member>>> {
        if let Some(cached) = self.members.borrow().get(&id) {
            return Ok(Some(Rc::clone(cached)));
        }

        match self.member_repo()?.find_by_id(id)? {
            Some(member) => {
                let handle = Rc::new(member);
                self.members.borrow_mut().insert(id, Rc::clone(&handle));
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Deletes the member row and evicts its cached handle.
    pub fn delete_member(&self, member: &Member) -> RepoResult<()> {
        self.member_repo()?.delete(member)?;
        self.members.borrow_mut().remove(&member.id);
        Ok(())
    }

    /// Persists the team and caches its handle under its identity.
    pub fn save_team(&self, team: &Team) -> RepoResult<TeamId> {
        let id = self.team_repo()?.save(team)?;
        self.teams.borrow_mut().insert(id, Rc::new(team.clone()));
        Ok(id)
    }

    /// Finds one team, serving repeated lookups from the identity map.
    pub fn find_team(&self, id: TeamId) -> RepoResult<Option<Rc<Team>>> {
        if let Some(cached) = self.teams.borrow().get(&id) {
            return Ok(Some(Rc::clone(cached)));
        }

        match self.team_repo()?.find_by_id(id)? {
            Some(team) => {
                let handle = Rc::new(team);
                self.teams.borrow_mut().insert(id, Rc::clone(&handle));
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Commits the transaction, consuming the session.
    pub fn commit(self) -> RepoResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn member_repo(&self) -> RepoResult<SqliteMemberRepository<'_>> {
        SqliteMemberRepository::try_new(&self.tx)
    }

    fn team_repo(&self) -> RepoResult<SqliteTeamRepository<'_>> {
        SqliteTeamRepository::try_new(&self.tx)
    }
}
