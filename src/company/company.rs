//! # Company Entity
//!
//! Root entity of the schema and the crate's serialization entry point:
//! `write_bsoa`/`read_bsoa`/`diagnostics` on a `Company` operate on the
//! whole database behind it.

use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use eyre::{Result, WrapErr};

use crate::company::clone::CloneContext;
use crate::company::database::CompanyDatabase;
use crate::company::eq::{EqContext, HashContext};
use crate::company::team::Team;
use crate::company::SecurityPolicy;
use crate::model::table::Table;
use crate::tree::TreeDiagnostics;

/// Row handle for one company. Copying the handle shares the row; value
/// semantics come from [`value_eq`](Company::value_eq) and
/// [`deep_clone`](Company::deep_clone).
#[derive(Clone)]
pub struct Company {
    db: CompanyDatabase,
    index: usize,
}

impl Company {
    /// Appends a new company row to `db`.
    pub fn new(db: &CompanyDatabase) -> Company {
        let index = db.companies_mut().add();
        Company {
            db: db.clone(),
            index,
        }
    }

    pub(crate) fn at(db: CompanyDatabase, index: usize) -> Company {
        Company { db, index }
    }

    pub fn database(&self) -> &CompanyDatabase {
        &self.db
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> i64 {
        self.db.companies().id.get(self.index)
    }

    pub fn set_id(&self, value: i64) {
        self.db.companies_mut().id.set(self.index, value);
    }

    pub fn name(&self) -> String {
        self.db.companies().name.get(self.index).to_owned()
    }

    pub fn set_name(&self, value: impl Into<String>) {
        self.db.companies_mut().name.set(self.index, value);
    }

    pub fn join_policy(&self) -> SecurityPolicy {
        SecurityPolicy::from_byte(self.db.companies().join_policy.get(self.index))
    }

    pub fn set_join_policy(&self, value: SecurityPolicy) {
        self.db
            .companies_mut()
            .join_policy
            .set(self.index, value.as_byte());
    }

    /// Live view over this company's teams; mutations write through to
    /// storage immediately.
    pub fn teams(&self) -> TeamList {
        TeamList {
            db: self.db.clone(),
            row: self.index,
        }
    }

    pub fn with_id(self, value: i64) -> Self {
        self.set_id(value);
        self
    }

    pub fn with_name(self, value: impl Into<String>) -> Self {
        self.set_name(value);
        self
    }

    pub fn with_join_policy(self, value: SecurityPolicy) -> Self {
        self.set_join_policy(value);
        self
    }

    /// Assigns every property from `other`, resolving references into this
    /// row's database.
    pub fn copy_from(&self, other: &Company) {
        self.set_id(other.id());
        self.set_name(other.name());
        self.set_join_policy(other.join_policy());
        self.teams().set_to(other.teams().iter());
    }

    /// Recursively copies this company and its whole subgraph into a fresh
    /// database. Shared references stay shared in the copy.
    pub fn deep_clone(&self) -> Company {
        self.deep_clone_into(&CompanyDatabase::new())
    }

    /// As [`deep_clone`](Self::deep_clone), into an existing database.
    pub fn deep_clone_into(&self, dest: &CompanyDatabase) -> Company {
        let index = CloneContext::new().company(self, dest);
        Company::at(dest.clone(), index)
    }

    /// Deep structural equality, independent of storage location.
    pub fn value_eq(&self, other: &Company) -> bool {
        EqContext::new().company(self, other)
    }

    /// Structural hash consistent with [`value_eq`](Self::value_eq).
    pub fn value_hash(&self) -> u64 {
        HashContext::new().company(self)
    }

    /// Serializes the whole database behind this company into `out`.
    pub fn write_bsoa_to(&self, out: &mut dyn Write) -> Result<()> {
        self.db.write_to(out)
    }

    /// Serializes the whole database behind this company to a file.
    pub fn write_bsoa(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_bsoa_to(&mut out)
    }

    /// Reads a serialized database and returns its root company.
    pub fn read_bsoa_from(input: &mut dyn Read) -> Result<Company> {
        let db = CompanyDatabase::read_from(input)?;
        Ok(db.root())
    }

    /// Reads a serialized database from a file.
    pub fn read_bsoa(path: impl AsRef<Path>) -> Result<Company> {
        let path = path.as_ref();
        let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
        let mut input = BufReader::new(file);
        Self::read_bsoa_from(&mut input)
    }

    /// Structural statistics for a serialized stream, without
    /// materializing any entities.
    pub fn diagnostics_from(input: &mut dyn Read) -> Result<TreeDiagnostics> {
        TreeDiagnostics::read_from(input)
    }

    /// As [`diagnostics_from`](Self::diagnostics_from), for a file.
    pub fn diagnostics(path: impl AsRef<Path>) -> Result<TreeDiagnostics> {
        let path = path.as_ref();
        let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
        let mut input = BufReader::new(file);
        Self::diagnostics_from(&mut input)
    }
}

impl PartialEq for Company {
    fn eq(&self, other: &Company) -> bool {
        self.value_eq(other)
    }
}

impl Eq for Company {}

impl Hash for Company {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value_hash());
    }
}

impl fmt::Debug for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Company")
            .field("row", &self.index)
            .field("id", &self.id())
            .finish()
    }
}

/// Live, ordered view of a company's teams, backed directly by the
/// reference-list column.
pub struct TeamList {
    db: CompanyDatabase,
    row: usize,
}

impl TeamList {
    pub fn len(&self) -> usize {
        self.db.companies().teams.row_len(self.row)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Team at `slot`. Panics if `slot >= len`.
    pub fn get(&self, slot: usize) -> Team {
        let target = self.db.companies().teams.get(self.row, slot);
        Team::at(self.db.clone(), target)
    }

    /// Appends `value`, copying it into this database first if it lives
    /// elsewhere.
    pub fn add(&self, value: &Team) {
        let local = self.db.local_team_index(value);
        self.db.companies_mut().teams.push(self.row, local);
    }

    pub fn set(&self, slot: usize, value: &Team) {
        let local = self.db.local_team_index(value);
        self.db.companies_mut().teams.set(self.row, slot, local);
    }

    pub fn insert(&self, slot: usize, value: &Team) {
        let local = self.db.local_team_index(value);
        self.db.companies_mut().teams.insert(self.row, slot, local);
    }

    /// Removes the reference at `slot`, returning the (still stored) team.
    pub fn remove(&self, slot: usize) -> Team {
        let target = self.db.companies_mut().teams.remove(self.row, slot);
        Team::at(self.db.clone(), target)
    }

    pub fn clear(&self) {
        self.db.companies_mut().teams.clear_row(self.row);
    }

    /// Replaces the whole list, preserving iteration order.
    pub fn set_to(&self, items: impl IntoIterator<Item = Team>) {
        let locals: Vec<usize> = items
            .into_iter()
            .map(|team| self.db.local_team_index(&team))
            .collect();
        self.db.companies_mut().teams.set_row(self.row, locals);
    }

    pub fn iter(&self) -> impl Iterator<Item = Team> + '_ {
        (0..self.len()).map(move |slot| self.get(slot))
    }

    pub fn to_vec(&self) -> Vec<Team> {
        self.iter().collect()
    }
}
