//! Table definitions for the company schema. One struct per entity type,
//! each wiring its concrete columns into the generic [`Table`] trait in
//! the fixed order the schema generator decided.

use crate::column::{Column, NumberColumn, RefColumn, RefListColumn, StringColumn};
use crate::model::Table;

#[derive(Default)]
pub(crate) struct CompanyTable {
    count: usize,
    pub(crate) id: NumberColumn<i64>,
    pub(crate) name: StringColumn,
    pub(crate) join_policy: NumberColumn<u8>,
    pub(crate) teams: RefListColumn,
}

impl Table for CompanyTable {
    fn name(&self) -> &'static str {
        "Company"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn add(&mut self) -> usize {
        self.id.grow();
        self.name.grow();
        self.join_policy.grow();
        self.teams.grow();
        self.count += 1;
        self.count - 1
    }

    fn clear(&mut self) {
        self.id.clear();
        self.name.clear();
        self.join_policy.clear();
        self.teams.clear();
        self.count = 0;
    }

    fn columns(&self) -> Vec<(&'static str, &dyn Column)> {
        vec![
            ("id", &self.id),
            ("name", &self.name),
            ("join_policy", &self.join_policy),
            ("teams", &self.teams),
        ]
    }

    fn columns_mut(&mut self) -> Vec<(&'static str, &mut dyn Column)> {
        vec![
            ("id", &mut self.id),
            ("name", &mut self.name),
            ("join_policy", &mut self.join_policy),
            ("teams", &mut self.teams),
        ]
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}

#[derive(Default)]
pub(crate) struct TeamTable {
    count: usize,
    pub(crate) id: NumberColumn<i64>,
    pub(crate) join_policy: NumberColumn<u8>,
    pub(crate) owner: RefColumn,
    pub(crate) members: RefListColumn,
}

impl Table for TeamTable {
    fn name(&self) -> &'static str {
        "Team"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn add(&mut self) -> usize {
        self.id.grow();
        self.join_policy.grow();
        self.owner.grow();
        self.members.grow();
        self.count += 1;
        self.count - 1
    }

    fn clear(&mut self) {
        self.id.clear();
        self.join_policy.clear();
        self.owner.clear();
        self.members.clear();
        self.count = 0;
    }

    fn columns(&self) -> Vec<(&'static str, &dyn Column)> {
        vec![
            ("id", &self.id),
            ("join_policy", &self.join_policy),
            ("owner", &self.owner),
            ("members", &self.members),
        ]
    }

    fn columns_mut(&mut self) -> Vec<(&'static str, &mut dyn Column)> {
        vec![
            ("id", &mut self.id),
            ("join_policy", &mut self.join_policy),
            ("owner", &mut self.owner),
            ("members", &mut self.members),
        ]
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}

#[derive(Default)]
pub(crate) struct EmployeeTable {
    count: usize,
    pub(crate) id: NumberColumn<i64>,
    pub(crate) name: StringColumn,
    pub(crate) manager: RefColumn,
}

impl Table for EmployeeTable {
    fn name(&self) -> &'static str {
        "Employee"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn add(&mut self) -> usize {
        self.id.grow();
        self.name.grow();
        self.manager.grow();
        self.count += 1;
        self.count - 1
    }

    fn clear(&mut self) {
        self.id.clear();
        self.name.clear();
        self.manager.clear();
        self.count = 0;
    }

    fn columns(&self) -> Vec<(&'static str, &dyn Column)> {
        vec![
            ("id", &self.id),
            ("name", &self.name),
            ("manager", &self.manager),
        ]
    }

    fn columns_mut(&mut self) -> Vec<(&'static str, &mut dyn Column)> {
        vec![
            ("id", &mut self.id),
            ("name", &mut self.name),
            ("manager", &mut self.manager),
        ]
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}
