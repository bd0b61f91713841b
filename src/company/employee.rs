//! # Employee Entity
//!
//! The leaf entity type, with a self-referential `manager` link so entity
//! graphs can loop back on themselves.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::company::clone::CloneContext;
use crate::company::database::CompanyDatabase;
use crate::company::eq::{EqContext, HashContext};
use crate::model::table::Table;

/// Row handle for one employee.
#[derive(Clone)]
pub struct Employee {
    db: CompanyDatabase,
    index: usize,
}

impl Employee {
    /// Appends a new employee row to `db`.
    pub fn new(db: &CompanyDatabase) -> Employee {
        let index = db.employees_mut().add();
        Employee {
            db: db.clone(),
            index,
        }
    }

    pub(crate) fn at(db: CompanyDatabase, index: usize) -> Employee {
        Employee { db, index }
    }

    pub fn database(&self) -> &CompanyDatabase {
        &self.db
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> i64 {
        self.db.employees().id.get(self.index)
    }

    pub fn set_id(&self, value: i64) {
        self.db.employees_mut().id.set(self.index, value);
    }

    pub fn name(&self) -> String {
        self.db.employees().name.get(self.index).to_owned()
    }

    pub fn set_name(&self, value: impl Into<String>) {
        self.db.employees_mut().name.set(self.index, value);
    }

    pub fn manager(&self) -> Option<Employee> {
        let target = self.db.employees().manager.get(self.index);
        target.map(|row| Employee::at(self.db.clone(), row))
    }

    /// Assigns the manager, copying the employee into this database first
    /// if it lives elsewhere.
    pub fn set_manager(&self, value: Option<&Employee>) {
        let local = value.map(|employee| self.db.local_employee_index(employee));
        self.db.employees_mut().manager.set(self.index, local);
    }

    pub fn with_id(self, value: i64) -> Self {
        self.set_id(value);
        self
    }

    pub fn with_name(self, value: impl Into<String>) -> Self {
        self.set_name(value);
        self
    }

    pub fn with_manager(self, value: &Employee) -> Self {
        self.set_manager(Some(value));
        self
    }

    /// Assigns every property from `other`, resolving references into this
    /// row's database.
    pub fn copy_from(&self, other: &Employee) {
        self.set_id(other.id());
        self.set_name(other.name());
        self.set_manager(other.manager().as_ref());
    }

    /// Recursively copies this employee (and any manager chain) into a
    /// fresh database.
    pub fn deep_clone(&self) -> Employee {
        self.deep_clone_into(&CompanyDatabase::new())
    }

    /// As [`deep_clone`](Self::deep_clone), into an existing database.
    pub fn deep_clone_into(&self, dest: &CompanyDatabase) -> Employee {
        let index = CloneContext::new().employee(self, dest);
        Employee::at(dest.clone(), index)
    }

    /// Deep structural equality, independent of storage location.
    pub fn value_eq(&self, other: &Employee) -> bool {
        EqContext::new().employee(self, other)
    }

    /// Structural hash consistent with [`value_eq`](Self::value_eq).
    pub fn value_hash(&self) -> u64 {
        HashContext::new().employee(self)
    }

    /// True when both handles view the same row of the same database.
    pub fn same_row(&self, other: &Employee) -> bool {
        self.db.same_database(&other.db) && self.index == other.index
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Employee) -> bool {
        self.value_eq(other)
    }
}

impl Eq for Employee {}

impl Hash for Employee {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value_hash());
    }
}

impl fmt::Debug for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Employee")
            .field("row", &self.index)
            .field("id", &self.id())
            .finish()
    }
}
