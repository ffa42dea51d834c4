use gatherbook_core::db::open_store;
use gatherbook_core::{EntityKind, GatheringManager, ManagerError};
use rusqlite::Connection;

#[test]
fn new_manager_starts_with_an_empty_data_set() {
    let manager = GatheringManager::new().unwrap();

    assert!(manager.find_member_names("").unwrap().is_empty());
    assert!(manager.find_gathering_names("").unwrap().is_empty());
    assert!(manager.find_organization_names("").unwrap().is_empty());
}

#[test]
fn managers_do_not_share_state() {
    let first = GatheringManager::new().unwrap();
    let second = GatheringManager::new().unwrap();

    first.add_member("Alice", "a@x.com").unwrap();

    assert_eq!(first.find_member_names("").unwrap().len(), 1);
    assert!(second.find_member_names("").unwrap().is_empty());
}

#[test]
fn with_connection_wraps_a_migrated_store_and_rejects_raw_ones() {
    let manager = GatheringManager::with_connection(open_store().unwrap()).unwrap();
    manager.add_member("Alice", "a@x.com").unwrap();
    assert_eq!(manager.find_member_names("").unwrap(), vec!["Alice"]);

    let raw = Connection::open_in_memory().unwrap();
    let err = GatheringManager::with_connection(raw).unwrap_err();
    assert!(matches!(err, ManagerError::Repo(_)));
}

#[test]
fn created_entities_appear_in_empty_query_finds() {
    let manager = GatheringManager::new().unwrap();

    manager.add_member("Alice", "a@x.com").unwrap();
    manager
        .add_gathering("Standup", "10001", "Jan 1 2025 09:00")
        .unwrap();
    manager.add_organization("ACM").unwrap();

    assert_eq!(manager.find_member_names("").unwrap(), vec!["Alice"]);
    assert_eq!(manager.find_gathering_names("").unwrap(), vec!["Standup"]);
    assert_eq!(manager.find_organization_names("").unwrap(), vec!["ACM"]);
}

#[test]
fn duplicate_member_names_are_legal_at_creation() {
    let manager = GatheringManager::new().unwrap();

    manager.add_member("Alex", "first@x.com").unwrap();
    manager.add_member("Alex", "second@x.com").unwrap();

    assert_eq!(manager.find_member_names("alex").unwrap().len(), 2);
}

#[test]
fn linking_twice_leaves_the_member_listed_once() {
    let manager = GatheringManager::new().unwrap();
    manager.add_member("Alice", "a@x.com").unwrap();
    manager
        .add_gathering("Book Club", "10001", "weekly")
        .unwrap();

    manager.add_member_to_gathering("Alice", "Book Club").unwrap();
    manager.add_member_to_gathering("Alice", "Book Club").unwrap();

    assert_eq!(
        manager.get_members("Book Club").unwrap(),
        vec!["Alice (a@x.com)"]
    );
}

#[test]
fn ambiguous_member_name_is_reported_not_resolved() {
    let manager = GatheringManager::new().unwrap();
    manager.add_member("Alex", "first@x.com").unwrap();
    manager.add_member("Alex", "second@x.com").unwrap();
    manager
        .add_gathering("Standup", "10001", "daily")
        .unwrap();

    let err = manager
        .add_member_to_gathering("Alex", "Standup")
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::AmbiguousReference {
            kind: EntityKind::Member,
            matches: 2,
            ..
        }
    ));

    // Nothing was linked on the failed call.
    assert!(manager.get_members("Standup").unwrap().is_empty());
}

#[test]
fn ambiguous_gathering_title_is_reported_on_listing() {
    let manager = GatheringManager::new().unwrap();
    manager.add_gathering("Standup", "10001", "daily").unwrap();
    manager.add_gathering("Standup", "20002", "daily").unwrap();

    let err = manager.get_members("Standup").unwrap_err();
    assert!(matches!(
        err,
        ManagerError::AmbiguousReference {
            kind: EntityKind::Gathering,
            matches: 2,
            ..
        }
    ));
}

#[test]
fn unknown_references_are_not_found() {
    let manager = GatheringManager::new().unwrap();
    manager.add_member("Alice", "a@x.com").unwrap();

    let gathering_err = manager
        .add_member_to_gathering("Alice", "Standup")
        .unwrap_err();
    assert!(matches!(
        gathering_err,
        ManagerError::NotFound {
            kind: EntityKind::Gathering,
            ..
        }
    ));

    let member_err = manager
        .add_member_to_gathering("Bob", "Standup")
        .unwrap_err();
    assert!(matches!(
        member_err,
        ManagerError::NotFound {
            kind: EntityKind::Member,
            ..
        }
    ));

    let listing_err = manager.get_members("Standup").unwrap_err();
    assert!(matches!(
        listing_err,
        ManagerError::NotFound {
            kind: EntityKind::Gathering,
            ..
        }
    ));
}

#[test]
fn get_members_on_a_gathering_without_links_is_empty() {
    let manager = GatheringManager::new().unwrap();
    manager.add_gathering("Standup", "10001", "daily").unwrap();

    assert!(manager.get_members("Standup").unwrap().is_empty());
}

#[test]
fn affiliation_uses_the_same_resolution_rules() {
    let manager = GatheringManager::new().unwrap();
    manager.add_gathering("Standup", "10001", "daily").unwrap();
    manager.add_organization("ACM").unwrap();

    manager
        .add_gathering_to_organization("Standup", "ACM")
        .unwrap();
    // Idempotent, like attendance.
    manager
        .add_gathering_to_organization("Standup", "ACM")
        .unwrap();

    let err = manager
        .add_gathering_to_organization("Standup", "IEEE")
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotFound {
            kind: EntityKind::Organization,
            ..
        }
    ));
}

#[test]
fn rename_preserves_membership_and_moves_search_hits() {
    let manager = GatheringManager::new().unwrap();
    manager.add_member("Alice", "a@x.com").unwrap();
    manager
        .add_gathering("Book Club", "10001", "weekly")
        .unwrap();
    manager.add_member_to_gathering("Alice", "Book Club").unwrap();

    manager
        .modify_gathering("Book Club", Some("Reading Circle"), None)
        .unwrap();

    assert_eq!(
        manager.get_members("Reading Circle").unwrap(),
        vec!["Alice (a@x.com)"]
    );
    assert!(manager.find_gathering_names("Book Club").unwrap().is_empty());
    assert_eq!(
        manager.find_gathering_names("Reading Circle").unwrap(),
        vec!["Reading Circle"]
    );
}

#[test]
fn modify_without_changes_is_a_legal_noop() {
    let manager = GatheringManager::new().unwrap();
    manager.add_gathering("Standup", "10001", "daily").unwrap();

    manager.modify_gathering("Standup", None, None).unwrap();

    assert_eq!(manager.find_gathering_names("").unwrap(), vec!["Standup"]);
}

#[test]
fn modify_still_resolves_the_title_when_no_changes_are_supplied() {
    let manager = GatheringManager::new().unwrap();

    let err = manager.modify_gathering("Standup", None, None).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotFound {
            kind: EntityKind::Gathering,
            ..
        }
    ));
}

#[test]
fn blank_display_fields_are_rejected() {
    let manager = GatheringManager::new().unwrap();

    let member_err = manager.add_member("   ", "a@x.com").unwrap_err();
    assert!(matches!(
        member_err,
        ManagerError::InvalidArgument {
            kind: EntityKind::Member,
            field: "name",
        }
    ));

    let organization_err = manager.add_organization("").unwrap_err();
    assert!(matches!(
        organization_err,
        ManagerError::InvalidArgument {
            kind: EntityKind::Organization,
            field: "title",
        }
    ));

    manager.add_gathering("Standup", "10001", "daily").unwrap();
    let rename_err = manager
        .modify_gathering("Standup", Some("  "), None)
        .unwrap_err();
    assert!(matches!(
        rename_err,
        ManagerError::InvalidArgument {
            kind: EntityKind::Gathering,
            field: "title",
        }
    ));
}

#[test]
fn facade_search_is_case_insensitive() {
    let manager = GatheringManager::new().unwrap();
    manager
        .add_gathering("Book Club", "10001", "weekly")
        .unwrap();

    assert_eq!(
        manager.find_gathering_names("book").unwrap(),
        vec!["Book Club"]
    );
}

#[test]
fn end_to_end_rename_scenario_keeps_members_and_updates_search() {
    let manager = GatheringManager::new().unwrap();

    manager.add_member("Alice", "a@x.com").unwrap();
    manager
        .add_gathering("Standup", "10001", "Jan 1 2025 09:00")
        .unwrap();
    manager.add_member_to_gathering("Alice", "Standup").unwrap();

    assert_eq!(
        manager.get_members("Standup").unwrap(),
        vec!["Alice (a@x.com)"]
    );

    manager
        .modify_gathering("Standup", Some("Daily Sync"), None)
        .unwrap();

    assert_eq!(
        manager.get_members("Daily Sync").unwrap(),
        vec!["Alice (a@x.com)"]
    );
    assert!(manager.find_gathering_names("standup").unwrap().is_empty());
    assert_eq!(
        manager.find_gathering_names("daily").unwrap(),
        vec!["Daily Sync"]
    );
}
