//! # Company Database
//!
//! Owns the three tables of the company schema and resolves every
//! cross-table reference. There is exactly one database per loaded
//! document, so the row indices stored in reference columns are
//! unambiguous.
//!
//! The storage core is single-threaded by contract: tables live behind
//! `RefCell` inside a shared `Rc`, entity handles clone the `Rc`, and no
//! locking exists anywhere. Concurrent mutation is a caller-level
//! responsibility, exactly as in any single-writer embedded store.

use std::cell::{Ref, RefCell, RefMut};
use std::io::{Read, Write};
use std::rc::Rc;

use eyre::Result;

use crate::company::clone::CloneContext;
use crate::company::tables::{CompanyTable, EmployeeTable, TeamTable};
use crate::company::{Company, Employee, Team};
use crate::model::{read_database, write_database, Table};
use crate::tree::reader::TreeReader;
use crate::tree::writer::TreeWriter;
use crate::tree_ensure;

/// Root section name of a serialized company database.
pub(crate) const ROOT_SECTION: &str = "CompanyDatabase";

#[derive(Default)]
struct Tables {
    company: RefCell<CompanyTable>,
    team: RefCell<TeamTable>,
    employee: RefCell<EmployeeTable>,
}

/// Handle to one company database. Cloning the handle shares the
/// underlying tables; [`Company::deep_clone`] is the operation that copies
/// data.
#[derive(Clone, Default)]
pub struct CompanyDatabase {
    tables: Rc<Tables>,
}

impl CompanyDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both handles share the same underlying tables.
    pub fn same_database(&self, other: &CompanyDatabase) -> bool {
        Rc::ptr_eq(&self.tables, &other.tables)
    }

    pub(crate) fn companies(&self) -> Ref<'_, CompanyTable> {
        self.tables.company.borrow()
    }

    pub(crate) fn companies_mut(&self) -> RefMut<'_, CompanyTable> {
        self.tables.company.borrow_mut()
    }

    pub(crate) fn teams(&self) -> Ref<'_, TeamTable> {
        self.tables.team.borrow()
    }

    pub(crate) fn teams_mut(&self) -> RefMut<'_, TeamTable> {
        self.tables.team.borrow_mut()
    }

    pub(crate) fn employees(&self) -> Ref<'_, EmployeeTable> {
        self.tables.employee.borrow()
    }

    pub(crate) fn employees_mut(&self) -> RefMut<'_, EmployeeTable> {
        self.tables.employee.borrow_mut()
    }

    pub fn company_count(&self) -> usize {
        self.companies().count()
    }

    pub fn team_count(&self) -> usize {
        self.teams().count()
    }

    pub fn employee_count(&self) -> usize {
        self.employees().count()
    }

    /// Row counts per table, in schema order. Backs statistics output in
    /// demo tooling.
    pub fn table_counts(&self) -> [(&'static str, usize); 3] {
        [
            ("Company", self.company_count()),
            ("Team", self.team_count()),
            ("Employee", self.employee_count()),
        ]
    }

    /// The root entity. A default root row is appended if the company
    /// table is empty, so the handle is always valid.
    pub fn root(&self) -> Company {
        if self.company_count() == 0 {
            self.companies_mut().add();
        }
        Company::at(self.clone(), 0)
    }

    /// Row index of `value` in this database's company table, copying the
    /// entity's subgraph in when the handle belongs to another database.
    pub fn local_company_index(&self, value: &Company) -> usize {
        if self.same_database(value.database()) {
            value.index()
        } else {
            CloneContext::new().company(value, self)
        }
    }

    /// See [`local_company_index`](Self::local_company_index).
    pub fn local_team_index(&self, value: &Team) -> usize {
        if self.same_database(value.database()) {
            value.index()
        } else {
            CloneContext::new().team(value, self)
        }
    }

    /// See [`local_company_index`](Self::local_company_index).
    pub fn local_employee_index(&self, value: &Employee) -> usize {
        if self.same_database(value.database()) {
            value.index()
        } else {
            CloneContext::new().employee(value, self)
        }
    }

    /// Serializes every table as one binary tree into `out`. The stream is
    /// caller-owned; it is flushed but not closed.
    pub fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        let mut writer = TreeWriter::new(out);
        {
            let company = self.companies();
            let team = self.teams();
            let employee = self.employees();
            let tables: [&dyn Table; 3] = [&*company, &*team, &*employee];
            write_database(&mut writer, ROOT_SECTION, &tables)?;
        }
        writer.close()
    }

    /// Reads a database tree from `input` into a fresh database. On any
    /// error the partially read database is discarded — a failed read
    /// never escapes.
    pub fn read_from(input: &mut dyn Read) -> Result<CompanyDatabase> {
        let db = CompanyDatabase::new();
        {
            let mut reader = TreeReader::new(input);
            let mut company = db.companies_mut();
            let mut team = db.teams_mut();
            let mut employee = db.employees_mut();
            let mut tables: [&mut dyn Table; 3] = [&mut *company, &mut *team, &mut *employee];
            read_database(&mut reader, ROOT_SECTION, &mut tables)?;
            reader.close()?;
        }
        db.validate_references()?;
        Ok(db)
    }

    /// Every reference in every table must land inside its target table.
    /// A well-formed tree can still carry dangling indices (a truncated or
    /// tampered file); catching them here keeps later row access panic-free.
    fn validate_references(&self) -> Result<()> {
        let companies = self.companies();
        let teams = self.teams();
        let employees = self.employees();

        for row in 0..companies.count() {
            for &team_row in companies.teams.indices(row) {
                tree_ensure!(
                    (team_row as usize) < teams.count(),
                    "company row {row} references missing team row {team_row}"
                );
            }
        }
        for row in 0..teams.count() {
            if let Some(owner) = teams.owner.get(row) {
                tree_ensure!(
                    owner < employees.count(),
                    "team row {row} references missing owner row {owner}"
                );
            }
            for &member in teams.members.indices(row) {
                tree_ensure!(
                    (member as usize) < employees.count(),
                    "team row {row} references missing member row {member}"
                );
            }
        }
        for row in 0..employees.count() {
            if let Some(manager) = employees.manager.get(row) {
                tree_ensure!(
                    manager < employees.count(),
                    "employee row {row} references missing manager row {manager}"
                );
            }
        }
        Ok(())
    }
}
