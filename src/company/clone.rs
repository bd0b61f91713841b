//! # Deep Clone Context
//!
//! Memoized recursive copy of an entity subgraph into a destination
//! database. The memo maps source row index to destination row index per
//! table, and the mapping is recorded *before* the fields are copied:
//! that is what makes shared references come out shared (an employee
//! referenced by three teams lands as one destination row, not three) and
//! what terminates manager cycles.
//!
//! One context spans one logical clone operation. `local_*_index` on the
//! database creates a fresh context per call, so aliasing is preserved
//! within each assigned subgraph.

use hashbrown::HashMap;

use crate::company::database::CompanyDatabase;
use crate::company::{Company, Employee, Team};
use crate::model::table::Table;

#[derive(Default)]
pub(crate) struct CloneContext {
    companies: HashMap<usize, usize>,
    teams: HashMap<usize, usize>,
    employees: HashMap<usize, usize>,
}

impl CloneContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn company(&mut self, src: &Company, dest: &CompanyDatabase) -> usize {
        if let Some(&row) = self.companies.get(&src.index()) {
            return row;
        }
        let row = dest.companies_mut().add();
        self.companies.insert(src.index(), row);

        let (id, name, policy, team_rows) = {
            let table = src.database().companies();
            (
                table.id.get(src.index()),
                table.name.get(src.index()).to_owned(),
                table.join_policy.get(src.index()),
                collect(table.teams.indices(src.index())),
            )
        };
        {
            let mut table = dest.companies_mut();
            table.id.set(row, id);
            table.name.set(row, name);
            table.join_policy.set(row, policy);
        }
        for team_row in team_rows {
            let cloned = self.team(&Team::at(src.database().clone(), team_row), dest);
            dest.companies_mut().teams.push(row, cloned);
        }
        row
    }

    pub(crate) fn team(&mut self, src: &Team, dest: &CompanyDatabase) -> usize {
        if let Some(&row) = self.teams.get(&src.index()) {
            return row;
        }
        let row = dest.teams_mut().add();
        self.teams.insert(src.index(), row);

        let (id, policy, owner_row, member_rows) = {
            let table = src.database().teams();
            (
                table.id.get(src.index()),
                table.join_policy.get(src.index()),
                table.owner.get(src.index()),
                collect(table.members.indices(src.index())),
            )
        };
        {
            let mut table = dest.teams_mut();
            table.id.set(row, id);
            table.join_policy.set(row, policy);
        }
        if let Some(owner_row) = owner_row {
            let cloned = self.employee(&Employee::at(src.database().clone(), owner_row), dest);
            dest.teams_mut().owner.set(row, Some(cloned));
        }
        for member_row in member_rows {
            let cloned = self.employee(&Employee::at(src.database().clone(), member_row), dest);
            dest.teams_mut().members.push(row, cloned);
        }
        row
    }

    pub(crate) fn employee(&mut self, src: &Employee, dest: &CompanyDatabase) -> usize {
        if let Some(&row) = self.employees.get(&src.index()) {
            return row;
        }
        let row = dest.employees_mut().add();
        self.employees.insert(src.index(), row);

        let (id, name, manager_row) = {
            let table = src.database().employees();
            (
                table.id.get(src.index()),
                table.name.get(src.index()).to_owned(),
                table.manager.get(src.index()),
            )
        };
        {
            let mut table = dest.employees_mut();
            table.id.set(row, id);
            table.name.set(row, name);
        }
        if let Some(manager_row) = manager_row {
            let cloned = self.employee(&Employee::at(src.database().clone(), manager_row), dest);
            dest.employees_mut().manager.set(row, Some(cloned));
        }
        row
    }
}

fn collect(indices: &[u32]) -> Vec<usize> {
    indices.iter().map(|&i| i as usize).collect()
}
