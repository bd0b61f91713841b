//! # Structural Equality and Hashing
//!
//! Two entities are value-equal iff every property matches, references
//! included, regardless of which database or row the values live in. Rows
//! get relocated by clone and serialization round-trips, so handle
//! identity is never the equality notion.
//!
//! Both walks carry cycle guards. Equality records every (left, right)
//! pair it starts comparing and treats a revisited pair as equal — a
//! manager cycle compares equal to an isomorphic manager cycle instead of
//! recursing forever. Hashing tracks the rows on the current recursion
//! stack only, so a shared (but acyclic) reference hashes identically
//! whether or not the rows are aliased; a true cycle contributes nothing
//! on the back edge.
//!
//! Hash composition matches the generated-code convention: start at 17,
//! fold each non-default property as `h = h * 31 + property`. Skipping
//! default-valued properties keeps default-heavy rows cheap and makes
//! them collide with the canonical empty row deliberately.

use hashbrown::HashSet;

use crate::company::{Company, Employee, SecurityPolicy, Team};

const HASH_SEED: u64 = 17;
const HASH_STEP: u64 = 31;

pub(crate) fn combine(hash: u64, value: u64) -> u64 {
    hash.wrapping_mul(HASH_STEP).wrapping_add(value)
}

/// FNV-1a. Stable across runs and platforms, which `DefaultHasher` does
/// not promise for persisted comparisons.
pub(crate) fn hash_str(value: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in value.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[derive(Default)]
pub(crate) struct EqContext {
    companies: HashSet<(usize, usize)>,
    teams: HashSet<(usize, usize)>,
    employees: HashSet<(usize, usize)>,
}

impl EqContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn company(&mut self, a: &Company, b: &Company) -> bool {
        if a.database().same_database(b.database()) && a.index() == b.index() {
            return true;
        }
        if !self.companies.insert((a.index(), b.index())) {
            return true;
        }
        if a.id() != b.id() || a.name() != b.name() || a.join_policy() != b.join_policy() {
            return false;
        }
        let (left, right) = (a.teams(), b.teams());
        left.len() == right.len()
            && (0..left.len()).all(|i| self.team(&left.get(i), &right.get(i)))
    }

    pub(crate) fn team(&mut self, a: &Team, b: &Team) -> bool {
        if a.database().same_database(b.database()) && a.index() == b.index() {
            return true;
        }
        if !self.teams.insert((a.index(), b.index())) {
            return true;
        }
        if a.id() != b.id() || a.join_policy() != b.join_policy() {
            return false;
        }
        let owners_match = match (a.owner(), b.owner()) {
            (None, None) => true,
            (Some(x), Some(y)) => self.employee(&x, &y),
            _ => false,
        };
        if !owners_match {
            return false;
        }
        let (left, right) = (a.members(), b.members());
        left.len() == right.len()
            && (0..left.len()).all(|i| self.employee(&left.get(i), &right.get(i)))
    }

    pub(crate) fn employee(&mut self, a: &Employee, b: &Employee) -> bool {
        if a.database().same_database(b.database()) && a.index() == b.index() {
            return true;
        }
        if !self.employees.insert((a.index(), b.index())) {
            return true;
        }
        if a.id() != b.id() || a.name() != b.name() {
            return false;
        }
        match (a.manager(), b.manager()) {
            (None, None) => true,
            (Some(x), Some(y)) => self.employee(&x, &y),
            _ => false,
        }
    }
}

#[derive(Default)]
pub(crate) struct HashContext {
    companies: HashSet<usize>,
    teams: HashSet<usize>,
    employees: HashSet<usize>,
}

impl HashContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn company(&mut self, value: &Company) -> u64 {
        if !self.companies.insert(value.index()) {
            return 0;
        }
        let mut hash = HASH_SEED;
        if value.id() != 0 {
            hash = combine(hash, value.id() as u64);
        }
        let name = value.name();
        if !name.is_empty() {
            hash = combine(hash, hash_str(&name));
        }
        if value.join_policy() != SecurityPolicy::default() {
            hash = combine(hash, value.join_policy() as u64);
        }
        let teams = value.teams();
        for team in teams.iter() {
            hash = combine(hash, self.team(&team));
        }
        self.companies.remove(&value.index());
        hash
    }

    pub(crate) fn team(&mut self, value: &Team) -> u64 {
        if !self.teams.insert(value.index()) {
            return 0;
        }
        let mut hash = HASH_SEED;
        if value.id() != 0 {
            hash = combine(hash, value.id() as u64);
        }
        if value.join_policy() != SecurityPolicy::default() {
            hash = combine(hash, value.join_policy() as u64);
        }
        if let Some(owner) = value.owner() {
            hash = combine(hash, self.employee(&owner));
        }
        let members = value.members();
        for member in members.iter() {
            hash = combine(hash, self.employee(&member));
        }
        self.teams.remove(&value.index());
        hash
    }

    pub(crate) fn employee(&mut self, value: &Employee) -> u64 {
        if !self.employees.insert(value.index()) {
            return 0;
        }
        let mut hash = HASH_SEED;
        if value.id() != 0 {
            hash = combine(hash, value.id() as u64);
        }
        let name = value.name();
        if !name.is_empty() {
            hash = combine(hash, hash_str(&name));
        }
        if let Some(manager) = value.manager() {
            hash = combine(hash, self.employee(&manager));
        }
        self.employees.remove(&value.index());
        hash
    }
}
