//! # Team Entity
//!
//! Teams carry the schema's whole reference repertoire: a single optional
//! reference (owner) and an ordered reference list (members), both into
//! the employee table.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::company::clone::CloneContext;
use crate::company::database::CompanyDatabase;
use crate::company::employee::Employee;
use crate::company::eq::{EqContext, HashContext};
use crate::company::SecurityPolicy;
use crate::model::table::Table;

/// Row handle for one team.
#[derive(Clone)]
pub struct Team {
    db: CompanyDatabase,
    index: usize,
}

impl Team {
    /// Appends a new team row to `db`.
    pub fn new(db: &CompanyDatabase) -> Team {
        let index = db.teams_mut().add();
        Team {
            db: db.clone(),
            index,
        }
    }

    pub(crate) fn at(db: CompanyDatabase, index: usize) -> Team {
        Team { db, index }
    }

    pub fn database(&self) -> &CompanyDatabase {
        &self.db
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> i64 {
        self.db.teams().id.get(self.index)
    }

    pub fn set_id(&self, value: i64) {
        self.db.teams_mut().id.set(self.index, value);
    }

    pub fn join_policy(&self) -> SecurityPolicy {
        SecurityPolicy::from_byte(self.db.teams().join_policy.get(self.index))
    }

    pub fn set_join_policy(&self, value: SecurityPolicy) {
        self.db
            .teams_mut()
            .join_policy
            .set(self.index, value.as_byte());
    }

    pub fn owner(&self) -> Option<Employee> {
        let target = self.db.teams().owner.get(self.index);
        target.map(|row| Employee::at(self.db.clone(), row))
    }

    /// Assigns the owner, copying the employee into this database first if
    /// it lives elsewhere.
    pub fn set_owner(&self, value: Option<&Employee>) {
        let local = value.map(|employee| self.db.local_employee_index(employee));
        self.db.teams_mut().owner.set(self.index, local);
    }

    /// Live view over this team's members; mutations write through to
    /// storage immediately.
    pub fn members(&self) -> EmployeeList {
        EmployeeList {
            db: self.db.clone(),
            row: self.index,
        }
    }

    pub fn with_id(self, value: i64) -> Self {
        self.set_id(value);
        self
    }

    pub fn with_join_policy(self, value: SecurityPolicy) -> Self {
        self.set_join_policy(value);
        self
    }

    pub fn with_owner(self, value: &Employee) -> Self {
        self.set_owner(Some(value));
        self
    }

    /// Assigns every property from `other`, resolving references into this
    /// row's database.
    pub fn copy_from(&self, other: &Team) {
        self.set_id(other.id());
        self.set_join_policy(other.join_policy());
        self.set_owner(other.owner().as_ref());
        self.members().set_to(other.members().iter());
    }

    /// Recursively copies this team and its subgraph into a fresh
    /// database. Shared references stay shared in the copy.
    pub fn deep_clone(&self) -> Team {
        self.deep_clone_into(&CompanyDatabase::new())
    }

    /// As [`deep_clone`](Self::deep_clone), into an existing database.
    pub fn deep_clone_into(&self, dest: &CompanyDatabase) -> Team {
        let index = CloneContext::new().team(self, dest);
        Team::at(dest.clone(), index)
    }

    /// Deep structural equality, independent of storage location.
    pub fn value_eq(&self, other: &Team) -> bool {
        EqContext::new().team(self, other)
    }

    /// Structural hash consistent with [`value_eq`](Self::value_eq).
    pub fn value_hash(&self) -> u64 {
        HashContext::new().team(self)
    }

    /// True when both handles view the same row of the same database.
    pub fn same_row(&self, other: &Team) -> bool {
        self.db.same_database(&other.db) && self.index == other.index
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Team) -> bool {
        self.value_eq(other)
    }
}

impl Eq for Team {}

impl Hash for Team {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value_hash());
    }
}

impl fmt::Debug for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Team")
            .field("row", &self.index)
            .field("id", &self.id())
            .finish()
    }
}

/// Live, ordered view of a team's members, backed directly by the
/// reference-list column.
pub struct EmployeeList {
    db: CompanyDatabase,
    row: usize,
}

impl EmployeeList {
    pub fn len(&self) -> usize {
        self.db.teams().members.row_len(self.row)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member at `slot`. Panics if `slot >= len`.
    pub fn get(&self, slot: usize) -> Employee {
        let target = self.db.teams().members.get(self.row, slot);
        Employee::at(self.db.clone(), target)
    }

    /// Appends `value`, copying it into this database first if it lives
    /// elsewhere.
    pub fn add(&self, value: &Employee) {
        let local = self.db.local_employee_index(value);
        self.db.teams_mut().members.push(self.row, local);
    }

    pub fn set(&self, slot: usize, value: &Employee) {
        let local = self.db.local_employee_index(value);
        self.db.teams_mut().members.set(self.row, slot, local);
    }

    pub fn insert(&self, slot: usize, value: &Employee) {
        let local = self.db.local_employee_index(value);
        self.db.teams_mut().members.insert(self.row, slot, local);
    }

    /// Removes the reference at `slot`, returning the (still stored)
    /// employee.
    pub fn remove(&self, slot: usize) -> Employee {
        let target = self.db.teams_mut().members.remove(self.row, slot);
        Employee::at(self.db.clone(), target)
    }

    pub fn clear(&self) {
        self.db.teams_mut().members.clear_row(self.row);
    }

    /// Replaces the whole list, preserving iteration order.
    pub fn set_to(&self, items: impl IntoIterator<Item = Employee>) {
        let locals: Vec<usize> = items
            .into_iter()
            .map(|employee| self.db.local_employee_index(&employee))
            .collect();
        self.db.teams_mut().members.set_row(self.row, locals);
    }

    pub fn iter(&self) -> impl Iterator<Item = Employee> + '_ {
        (0..self.len()).map(move |slot| self.get(slot))
    }

    pub fn to_vec(&self) -> Vec<Employee> {
        self.iter().collect()
    }
}
