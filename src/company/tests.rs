use super::*;

fn sample_database() -> (CompanyDatabase, Company) {
    let db = CompanyDatabase::new();
    let company = Company::new(&db)
        .with_id(1)
        .with_name("Contoso")
        .with_join_policy(SecurityPolicy::ByRequest);

    let owner = Employee::new(&db).with_id(100).with_name("Avery");
    let member_a = Employee::new(&db).with_id(101).with_name("Blake");
    let member_b = Employee::new(&db).with_id(102).with_name("Casey");
    member_a.set_manager(Some(&owner));
    member_b.set_manager(Some(&owner));

    let team = Team::new(&db).with_id(10).with_owner(&owner);
    team.members().add(&member_a);
    team.members().add(&member_b);
    company.teams().add(&team);

    (db, company)
}

#[test]
fn properties_pass_through_to_columns() {
    let db = CompanyDatabase::new();
    let company = Company::new(&db);

    company.set_id(7);
    company.set_name("Initech");
    company.set_join_policy(SecurityPolicy::InviteOnly);

    assert_eq!(company.id(), 7);
    assert_eq!(company.name(), "Initech");
    assert_eq!(company.join_policy(), SecurityPolicy::InviteOnly);
}

#[test]
fn two_handles_view_the_same_row() {
    let (db, company) = sample_database();
    let again = db.root();
    again.set_name("Renamed");
    assert_eq!(company.name(), "Renamed");
}

#[test]
fn add_grows_every_table_independently() {
    let (db, _company) = sample_database();
    assert_eq!(db.company_count(), 1);
    assert_eq!(db.team_count(), 1);
    assert_eq!(db.employee_count(), 3);
    assert_eq!(
        db.table_counts(),
        [("Company", 1), ("Team", 1), ("Employee", 3)]
    );
}

#[test]
fn member_list_is_a_live_view() {
    let (db, company) = sample_database();
    let team = company.teams().get(0);

    let extra = Employee::new(&db).with_id(103);
    team.members().insert(0, &extra);
    assert_eq!(team.members().get(0).id(), 103);
    assert_eq!(team.members().len(), 3);

    let removed = team.members().remove(0);
    assert_eq!(removed.id(), 103);
    assert_eq!(team.members().len(), 2);

    team.members().clear();
    assert!(team.members().is_empty());
}

#[test]
fn adding_the_same_employee_twice_shares_the_row() {
    let (db, company) = sample_database();
    let team = company.teams().get(0);
    let member = team.members().get(0);

    team.members().add(&member);
    assert_eq!(team.members().len(), 3);
    assert!(team.members().get(2).same_row(&member));
    assert_eq!(db.employee_count(), 3);
}

#[test]
fn cross_database_assignment_copies_the_subgraph() {
    let (_, company) = sample_database();
    let source_owner = company.teams().get(0).owner().unwrap();

    let other = CompanyDatabase::new();
    let team = Team::new(&other);
    team.set_owner(Some(&source_owner));

    assert_eq!(other.employee_count(), 1);
    let copied = team.owner().unwrap();
    assert!(!copied.same_row(&source_owner));
    assert_eq!(copied.id(), 100);
    assert_eq!(copied.name(), "Avery");
}

#[test]
fn value_equality_ignores_storage_location() {
    let (_, a) = sample_database();
    let (_, b) = sample_database();
    assert_eq!(a, b);
    assert_eq!(a.value_hash(), b.value_hash());

    b.teams().get(0).set_id(99);
    assert_ne!(a, b);
}

#[test]
fn default_rows_hash_to_the_seed_and_collide() {
    let db = CompanyDatabase::new();
    let a = Company::new(&db);
    let b = Company::new(&db);
    assert_eq!(a.value_hash(), b.value_hash());
    assert_eq!(a, b);
}

#[test]
fn manager_cycles_compare_and_hash_without_recursing_forever() {
    let build = || {
        let db = CompanyDatabase::new();
        let a = Employee::new(&db).with_id(1);
        let b = Employee::new(&db).with_id(2);
        a.set_manager(Some(&b));
        b.set_manager(Some(&a));
        a
    };
    let x = build();
    let y = build();
    assert_eq!(x, y);
    assert_eq!(x.value_hash(), y.value_hash());

    y.manager().unwrap().set_id(3);
    assert_ne!(x, y);
}

#[test]
fn deep_clone_preserves_shared_references() {
    let (_, company) = sample_database();
    let clone = company.deep_clone();

    // Owner manages both members in the source; the clone must keep one
    // owner row, not three copies.
    assert_eq!(clone.database().employee_count(), 3);
    let team = clone.teams().get(0);
    let owner = team.owner().unwrap();
    assert!(team.members().get(0).manager().unwrap().same_row(&owner));
    assert!(team.members().get(1).manager().unwrap().same_row(&owner));
}

#[test]
fn deep_clone_does_not_alias_the_source() {
    let (_, company) = sample_database();
    let clone = company.deep_clone();
    assert_eq!(clone, company);

    clone.teams().get(0).members().get(0).set_name("Changed");
    assert_eq!(company.teams().get(0).members().get(0).name(), "Blake");
    assert_ne!(clone, company);
}

#[test]
fn deep_clone_of_a_manager_cycle_terminates() {
    let db = CompanyDatabase::new();
    let a = Employee::new(&db).with_id(1);
    let b = Employee::new(&db).with_id(2);
    a.set_manager(Some(&b));
    b.set_manager(Some(&a));

    let clone = a.deep_clone();
    assert_eq!(clone.database().employee_count(), 2);
    assert!(clone
        .manager()
        .unwrap()
        .manager()
        .unwrap()
        .same_row(&clone));
}

#[test]
fn copy_from_resolves_references_locally() {
    let (_, source) = sample_database();
    let db = CompanyDatabase::new();
    let target = Company::new(&db);
    target.copy_from(&source);

    assert_eq!(target, source);
    assert_eq!(db.team_count(), 1);
    assert_eq!(db.employee_count(), 3);
}

#[test]
fn entities_work_as_hash_map_keys() {
    use hashbrown::HashMap;

    let (_, a) = sample_database();
    let (_, b) = sample_database();

    let mut seen: HashMap<Company, u32> = HashMap::new();
    seen.insert(a, 1);
    *seen.entry(b).or_insert(0) += 10;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen.values().sum::<u32>(), 11);
}

#[test]
fn unknown_policy_bytes_fall_back_to_open() {
    assert_eq!(SecurityPolicy::from_byte(0), SecurityPolicy::Open);
    assert_eq!(SecurityPolicy::from_byte(1), SecurityPolicy::ByRequest);
    assert_eq!(SecurityPolicy::from_byte(2), SecurityPolicy::InviteOnly);
    assert_eq!(SecurityPolicy::from_byte(200), SecurityPolicy::Open);
}

#[test]
fn root_appends_a_default_row_when_empty() {
    let db = CompanyDatabase::new();
    assert_eq!(db.company_count(), 0);
    let root = db.root();
    assert_eq!(db.company_count(), 1);
    assert_eq!(root.id(), 0);

    let again = db.root();
    assert_eq!(db.company_count(), 1);
    assert!(again.value_eq(&root));
}
