//! End-to-end scenarios over the company schema: serialization round
//! trips, cross-database equality, deep-clone aliasing rules, and failure
//! behavior on corrupt streams.

use bsoa::column::{Column, RefColumn};
use bsoa::encoding::push_varint;
use bsoa::{Company, CompanyDatabase, Employee, SecurityPolicy, Team, TreeError, TreeWriter};

/// The canonical scenario graph: one company (id 1) with one team (id 10)
/// owned by employee 100, with an empty member list.
fn minimal_company() -> Company {
    let db = CompanyDatabase::new();
    let company = Company::new(&db).with_id(1);
    let owner = Employee::new(&db).with_id(100);
    let team = Team::new(&db).with_id(10).with_owner(&owner);
    company.teams().add(&team);
    company
}

/// A richer graph exercising every column kind, shared references, and a
/// manager chain.
fn full_company() -> Company {
    let db = CompanyDatabase::new();
    let company = Company::new(&db)
        .with_id(1)
        .with_name("Contoso")
        .with_join_policy(SecurityPolicy::InviteOnly);

    let lead = Employee::new(&db).with_id(100).with_name("Avery");
    let dev_a = Employee::new(&db).with_id(101).with_name("Blake");
    let dev_b = Employee::new(&db).with_id(102).with_name("Casey");
    dev_a.set_manager(Some(&lead));
    dev_b.set_manager(Some(&lead));

    let team = Team::new(&db)
        .with_id(10)
        .with_join_policy(SecurityPolicy::ByRequest)
        .with_owner(&lead);
    team.members().add(&dev_a);
    team.members().add(&dev_b);
    // The lead works on the team they own.
    team.members().add(&lead);
    company.teams().add(&team);

    company
}

fn roundtrip(company: &Company) -> Company {
    let mut buf = Vec::new();
    company.write_bsoa_to(&mut buf).unwrap();
    Company::read_bsoa_from(&mut &buf[..]).unwrap()
}

#[test]
fn empty_database_roundtrips() {
    let db = CompanyDatabase::new();
    let company = db.root();
    let restored = roundtrip(&company);
    assert!(restored.value_eq(&company));
    assert_eq!(restored.database().table_counts(), db.table_counts());
}

#[test]
fn minimal_scenario_roundtrips() {
    let restored = roundtrip(&minimal_company());

    assert_eq!(restored.id(), 1);
    assert_eq!(restored.teams().len(), 1);
    let team = restored.teams().get(0);
    assert_eq!(team.id(), 10);
    assert_eq!(team.owner().unwrap().id(), 100);
    assert!(team.members().is_empty());
}

#[test]
fn full_graph_roundtrips_value_equal() {
    let company = full_company();
    let restored = roundtrip(&company);

    assert!(restored.value_eq(&company));
    assert_eq!(restored.value_hash(), company.value_hash());

    // Shared references must come back shared, not duplicated.
    let team = restored.teams().get(0);
    let owner = team.owner().unwrap();
    assert!(team.members().get(2).same_row(&owner));
    assert!(team.members().get(0).manager().unwrap().same_row(&owner));
    assert_eq!(restored.database().employee_count(), 3);
}

#[test]
fn list_order_survives_roundtrip() {
    let db = CompanyDatabase::new();
    let company = Company::new(&db);
    let team = Team::new(&db);
    for id in [5i64, 3, 9, 1] {
        let e = Employee::new(&db).with_id(id);
        team.members().add(&e);
    }
    company.teams().add(&team);

    let restored = roundtrip(&company);
    let ids: Vec<i64> = restored
        .teams()
        .get(0)
        .members()
        .iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(ids, [5, 3, 9, 1]);
}

#[test]
fn append_only_growth_keeps_every_slot_addressable() {
    let db = CompanyDatabase::new();
    for i in 0..250 {
        let employee = Employee::new(&db).with_id(i);
        assert_eq!(db.employee_count(), i as usize + 1);
        assert_eq!(employee.id(), i);
    }

    let company = db.root();
    let restored = roundtrip(&company);
    assert_eq!(restored.database().employee_count(), 250);
}

#[test]
fn equality_is_independent_of_row_positions() {
    let a = minimal_company();

    // Same values, different row indices: pad the second database first.
    let db = CompanyDatabase::new();
    for _ in 0..5 {
        Employee::new(&db);
    }
    let b = Company::new(&db).with_id(1);
    let owner = Employee::new(&db).with_id(100);
    let team = Team::new(&db).with_id(10).with_owner(&owner);
    b.teams().add(&team);

    // b's owner sits at employee row 5, a's at row 0; the graphs are
    // still value-equal.
    assert!(a.value_eq(&b));
    assert_eq!(a.value_hash(), b.value_hash());
    assert!(a.teams().get(0).value_eq(&b.teams().get(0)));
}

#[test]
fn deep_clone_scenario_from_two_member_team() {
    let db = CompanyDatabase::new();
    let team = Team::new(&db);
    let e1 = Employee::new(&db).with_id(1);
    let e2 = Employee::new(&db).with_id(2);
    team.members().add(&e1);
    team.members().add(&e2);

    let clone = team.deep_clone();

    assert_eq!(clone.members().get(0).id(), 1);
    assert_eq!(clone.members().get(1).id(), 2);
    assert!(!clone.members().get(0).same_row(&team.members().get(0)));
    assert!(clone.value_eq(&team));

    clone.members().get(0).set_id(77);
    assert_eq!(team.members().get(0).id(), 1);
}

#[test]
fn truncated_stream_is_a_structural_error() {
    let company = full_company();
    let mut buf = Vec::new();
    company.write_bsoa_to(&mut buf).unwrap();
    buf.truncate(buf.len() - 4);

    let err = Company::read_bsoa_from(&mut &buf[..]).unwrap_err();
    let tree_err = err.downcast_ref::<TreeError>().expect("structural, not I/O");
    assert!(tree_err.is_structural());
}

#[test]
fn wrong_root_schema_is_rejected() {
    let mut buf = Vec::new();
    let mut writer = TreeWriter::new(&mut buf);
    writer.begin_node("SomeOtherDatabase", 0).unwrap();
    writer.end_node().unwrap();
    writer.close().unwrap();

    let err = Company::read_bsoa_from(&mut &buf[..]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TreeError>().unwrap(),
        TreeError::UnexpectedRoot { .. }
    ));
}

#[test]
fn dangling_reference_is_a_structural_error() {
    // A well-formed tree whose Team.owner points at employee row 5 while
    // the employee table is empty.
    let mut owner_col = RefColumn::new();
    owner_col.grow();
    owner_col.set(0, Some(5));
    let mut owner_leaf = Vec::new();
    owner_col.encode(&mut owner_leaf);

    let mut count_leaf = Vec::new();
    push_varint(&mut count_leaf, 1);

    let mut buf = Vec::new();
    let mut writer = TreeWriter::new(&mut buf);
    writer.begin_node("CompanyDatabase", 1).unwrap();
    writer.begin_node("Team", 2).unwrap();
    writer.leaf("count", &count_leaf).unwrap();
    writer.leaf("owner", &owner_leaf).unwrap();
    writer.end_node().unwrap();
    writer.end_node().unwrap();
    writer.close().unwrap();

    let err = Company::read_bsoa_from(&mut &buf[..]).unwrap_err();
    assert!(err.downcast_ref::<TreeError>().unwrap().is_structural());
}

#[test]
fn unknown_table_sections_are_skipped() {
    let company = minimal_company();

    // Rebuild the stream with an extra table a future schema might add.
    let mut buf = Vec::new();
    let mut writer = TreeWriter::new(&mut buf);
    writer.begin_node("CompanyDatabase", 4).unwrap();
    writer.begin_node("Widget", 1).unwrap();
    writer.leaf("count", &[0]).unwrap();
    writer.end_node().unwrap();

    // Splice in the three real tables by re-reading the original stream.
    let db = company.database();
    splice_tables(db, &mut writer);
    writer.end_node().unwrap();
    writer.close().unwrap();

    let restored = Company::read_bsoa_from(&mut &buf[..]).unwrap();
    assert!(restored.value_eq(&company));
}

/// Re-emits the three schema tables into `writer` the same way a full
/// database write would.
fn splice_tables(db: &CompanyDatabase, writer: &mut TreeWriter) {
    let scratch = {
        let mut buf = Vec::new();
        db.write_to(&mut buf).unwrap();
        buf
    };
    // Walk the freshly written stream and copy each table subtree.
    let mut cursor = &scratch[..];
    let mut reader = bsoa::TreeReader::new(&mut cursor);
    let tables = reader.expect_root("CompanyDatabase").unwrap();
    for _ in 0..tables {
        copy_section(&mut reader, writer);
    }
}

fn copy_section(reader: &mut bsoa::TreeReader, writer: &mut TreeWriter) {
    match reader.read_header().unwrap() {
        bsoa::tree::SectionHeader::Leaf { name, len } => {
            let bytes = reader.read_leaf(len).unwrap();
            writer.leaf(&name, &bytes).unwrap();
        }
        bsoa::tree::SectionHeader::Node { name, children } => {
            writer.begin_node(&name, children).unwrap();
            for _ in 0..children {
                copy_section(reader, writer);
            }
            writer.end_node().unwrap();
        }
    }
}

#[test]
fn file_roundtrip_through_the_path_api() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("company.bsoa");

    let company = full_company();
    company.write_bsoa(&path).unwrap();

    let restored = Company::read_bsoa(&path).unwrap();
    assert!(restored.value_eq(&company));

    let missing = Company::read_bsoa(dir.path().join("absent.bsoa"));
    let err = missing.unwrap_err();
    assert!(err.downcast_ref::<TreeError>().is_none()); // I/O, not structural
}
