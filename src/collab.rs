//! Collaborator seams: group membership, war relations, anchor structures,
//! and resource inventories live outside this crate and are consumed through
//! these traits.
//!
//! Each trait ships with a small in-memory implementation. Hosts either mirror
//! their own state into these or implement the traits directly.

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::model::{AnchorId, GroupId, OccupantId};

pub trait GroupDirectory {
    fn exists(&self, group: GroupId) -> bool;
    fn member_count(&self, group: GroupId) -> u32;
    fn has_leader(&self, group: GroupId, occupant: OccupantId) -> bool;
    fn group_of(&self, occupant: OccupantId) -> Option<GroupId>;
}

pub trait WarRelations {
    fn are_at_war(&self, a: GroupId, b: GroupId) -> bool;
}

pub trait AnchorStatus {
    fn is_destroyed(&self, anchor: AnchorId) -> bool;
}

/// Who holds a pile of resources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holder {
    Occupant(OccupantId),
    /// The inventory of an anchor structure.
    Anchor(AnchorId),
}

pub trait ResourceVault {
    /// Remove `amount` units from `holder`. Either the whole amount is taken
    /// or nothing is.
    fn withdraw(&mut self, holder: Holder, amount: u32) -> bool;
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub members: BTreeSet<OccupantId>,
    pub leaders: BTreeSet<OccupantId>,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct GroupRoster {
    groups: BTreeMap<GroupId, GroupEntry>,
}

impl GroupRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group with its founding leader.
    pub fn create(&mut self, group: GroupId, name: impl Into<String>, leader: OccupantId) {
        let entry = self.groups.entry(group).or_default();
        entry.name = name.into();
        entry.members.insert(leader);
        entry.leaders.insert(leader);
    }

    pub fn add_member(&mut self, group: GroupId, occupant: OccupantId) -> bool {
        match self.groups.get_mut(&group) {
            Some(entry) => entry.members.insert(occupant),
            None => false,
        }
    }

    pub fn remove_member(&mut self, group: GroupId, occupant: OccupantId) -> bool {
        match self.groups.get_mut(&group) {
            Some(entry) => {
                entry.leaders.remove(&occupant);
                entry.members.remove(&occupant)
            }
            None => false,
        }
    }

    pub fn dissolve(&mut self, group: GroupId) -> Option<GroupEntry> {
        self.groups.remove(&group)
    }

    pub fn get(&self, group: GroupId) -> Option<&GroupEntry> {
        self.groups.get(&group)
    }

    pub fn name_of(&self, group: GroupId) -> Option<&str> {
        self.groups.get(&group).map(|g| g.name.as_str())
    }
}

impl GroupDirectory for GroupRoster {
    fn exists(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    fn member_count(&self, group: GroupId) -> u32 {
        self.groups
            .get(&group)
            .map_or(0, |g| g.members.len() as u32)
    }

    fn has_leader(&self, group: GroupId, occupant: OccupantId) -> bool {
        self.groups
            .get(&group)
            .is_some_and(|g| g.leaders.contains(&occupant))
    }

    fn group_of(&self, occupant: OccupantId) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, g)| g.members.contains(&occupant))
            .map(|(id, _)| *id)
    }
}

// ---------------------------------------------------------------------------
// Wars
// ---------------------------------------------------------------------------

/// Symmetric set of warring group pairs.
#[derive(Resource, Clone, Debug, Default)]
pub struct WarTable {
    pairs: BTreeSet<(GroupId, GroupId)>,
}

fn ordered(a: GroupId, b: GroupId) -> (GroupId, GroupId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl WarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group cannot be at war with itself; such declarations are ignored.
    pub fn declare_war(&mut self, a: GroupId, b: GroupId) -> bool {
        a != b && self.pairs.insert(ordered(a, b))
    }

    pub fn make_peace(&mut self, a: GroupId, b: GroupId) -> bool {
        self.pairs.remove(&ordered(a, b))
    }

    /// End every war involving `group`.
    pub fn forget_group(&mut self, group: GroupId) {
        self.pairs.retain(|(a, b)| *a != group && *b != group);
    }
}

impl WarRelations for WarTable {
    fn are_at_war(&self, a: GroupId, b: GroupId) -> bool {
        self.pairs.contains(&ordered(a, b))
    }
}

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

#[derive(Resource, Clone, Debug, Default)]
pub struct AnchorRegistry {
    destroyed: BTreeSet<AnchorId>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_destroyed(&mut self, anchor: AnchorId) {
        self.destroyed.insert(anchor);
    }
}

impl AnchorStatus for AnchorRegistry {
    fn is_destroyed(&self, anchor: AnchorId) -> bool {
        self.destroyed.contains(&anchor)
    }
}

// ---------------------------------------------------------------------------
// Resource stacks
// ---------------------------------------------------------------------------

/// Resource stacks per holder. Withdrawal drains stacks in order, and only
/// after confirming the holder's total covers the amount.
#[derive(Resource, Clone, Debug, Default)]
pub struct StackVault {
    stacks: BTreeMap<Holder, Vec<u32>>,
}

impl StackVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one stack of `amount` units.
    pub fn deposit(&mut self, holder: Holder, amount: u32) {
        if amount > 0 {
            self.stacks.entry(holder).or_default().push(amount);
        }
    }

    pub fn balance(&self, holder: Holder) -> u64 {
        self.stacks
            .get(&holder)
            .map_or(0, |s| s.iter().map(|&n| u64::from(n)).sum())
    }

    pub fn stacks(&self, holder: Holder) -> &[u32] {
        self.stacks.get(&holder).map(Vec::as_slice).unwrap_or_default()
    }
}

impl ResourceVault for StackVault {
    fn withdraw(&mut self, holder: Holder, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        if self.balance(holder) < u64::from(amount) {
            return false;
        }
        let Some(stacks) = self.stacks.get_mut(&holder) else {
            return false;
        };
        let mut remaining = amount;
        for stack in stacks.iter_mut() {
            let take = remaining.min(*stack);
            *stack -= take;
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }
        stacks.retain(|&n| n > 0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_tracks_leaders_and_members() {
        let mut roster = GroupRoster::new();
        roster.create(GroupId(1), "FOO", OccupantId(10));
        roster.add_member(GroupId(1), OccupantId(11));
        assert!(roster.exists(GroupId(1)));
        assert_eq!(roster.member_count(GroupId(1)), 2);
        assert!(roster.has_leader(GroupId(1), OccupantId(10)));
        assert!(!roster.has_leader(GroupId(1), OccupantId(11)));
        assert_eq!(roster.group_of(OccupantId(11)), Some(GroupId(1)));
        assert_eq!(roster.member_count(GroupId(2)), 0);
        assert!(roster.dissolve(GroupId(1)).is_some());
        assert!(!roster.exists(GroupId(1)));
    }

    #[test]
    fn wars_are_symmetric() {
        let mut wars = WarTable::new();
        assert!(wars.declare_war(GroupId(2), GroupId(1)));
        assert!(wars.are_at_war(GroupId(1), GroupId(2)));
        assert!(wars.are_at_war(GroupId(2), GroupId(1)));
        assert!(!wars.declare_war(GroupId(3), GroupId(3)));
        assert!(wars.make_peace(GroupId(1), GroupId(2)));
        assert!(!wars.are_at_war(GroupId(1), GroupId(2)));
    }

    #[test]
    fn forget_group_ends_its_wars() {
        let mut wars = WarTable::new();
        wars.declare_war(GroupId(1), GroupId(2));
        wars.declare_war(GroupId(3), GroupId(2));
        wars.declare_war(GroupId(3), GroupId(4));
        wars.forget_group(GroupId(2));
        assert!(!wars.are_at_war(GroupId(1), GroupId(2)));
        assert!(!wars.are_at_war(GroupId(2), GroupId(3)));
        assert!(wars.are_at_war(GroupId(3), GroupId(4)));
    }

    #[test]
    fn withdrawal_spans_stacks() {
        let holder = Holder::Occupant(OccupantId(1));
        let mut vault = StackVault::new();
        vault.deposit(holder, 60);
        vault.deposit(holder, 60);
        assert!(vault.withdraw(holder, 100));
        assert_eq!(vault.stacks(holder), &[20]);
    }

    #[test]
    fn short_withdrawal_takes_nothing() {
        let holder = Holder::Anchor(AnchorId(5));
        let mut vault = StackVault::new();
        vault.deposit(holder, 30);
        vault.deposit(holder, 30);
        assert!(!vault.withdraw(holder, 61));
        assert_eq!(vault.stacks(holder), &[30, 30]);
        assert_eq!(vault.balance(holder), 60);
    }

    #[test]
    fn zero_withdrawal_always_succeeds() {
        let mut vault = StackVault::new();
        assert!(vault.withdraw(Holder::Occupant(OccupantId(9)), 0));
        assert!(!vault.withdraw(Holder::Occupant(OccupantId(9)), 1));
    }
}
