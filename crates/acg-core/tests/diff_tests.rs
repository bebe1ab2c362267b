use std::collections::BTreeSet;

use acg_core::diff::{ChangedField, diff};
use acg_core::parse;
use acg_core::reporter::SilentReporter;
use acg_core::transform::{extract, index_by_operation_id};

const USERS_V1: &str = include_str!("fixtures/users-v1.json");
const USERS_V2: &str = include_str!("fixtures/users-v2.json");

#[test]
fn diff_between_spec_versions() {
    let old = extract(&parse::from_json(USERS_V1).unwrap(), &SilentReporter);
    let new = extract(&parse::from_json(USERS_V2).unwrap(), &SilentReporter);
    let d = diff(&index_by_operation_id(&old), &index_by_operation_id(&new));

    assert_eq!(d.added, vec!["setUserAvatar"]);
    assert_eq!(d.removed, vec!["deleteUser"]);
    // listUsers only gained a description, which is not a change.
    assert_eq!(d.modified_ids().collect::<Vec<_>>(), vec!["createUser"]);
    assert_eq!(d.modified[0].changes, vec![ChangedField::HasRequestBody]);
}

#[test]
fn diff_partitions_every_id() {
    let old = index_by_operation_id(&extract(&parse::from_json(USERS_V1).unwrap(), &SilentReporter));
    let new = index_by_operation_id(&extract(&parse::from_json(USERS_V2).unwrap(), &SilentReporter));
    let d = diff(&old, &new);

    let a: BTreeSet<&str> = old.keys().map(String::as_str).collect();
    let b: BTreeSet<&str> = new.keys().map(String::as_str).collect();

    let added: BTreeSet<&str> = d.added.iter().map(String::as_str).collect();
    let removed: BTreeSet<&str> = d.removed.iter().map(String::as_str).collect();
    assert_eq!(added, b.difference(&a).copied().collect());
    assert_eq!(removed, a.difference(&b).copied().collect());

    let modified: Vec<&str> = d.modified_ids().collect();
    let modified_set: BTreeSet<&str> = modified.iter().copied().collect();
    assert_eq!(modified.len(), modified_set.len(), "classified once");
    assert!(modified_set.is_subset(&a.intersection(&b).copied().collect()));
}

#[test]
fn identical_specs_have_empty_diff() {
    let ops = index_by_operation_id(&extract(&parse::from_json(USERS_V2).unwrap(), &SilentReporter));
    assert!(diff(&ops, &ops).is_empty());
}
