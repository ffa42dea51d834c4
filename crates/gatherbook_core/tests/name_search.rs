use gatherbook_core::db::open_store;
use gatherbook_core::{
    search_names, EntityKind, EntityRepository, Gathering, Member, Organization,
    SqliteEntityRepository,
};

#[test]
fn empty_query_lists_all_names_in_creation_order() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_member(&Member::new("Alice", "a@x.com")).unwrap();
    repo.create_member(&Member::new("Bob", "b@x.com")).unwrap();
    repo.create_member(&Member::new("Carol", "c@x.com")).unwrap();

    let names = search_names(&repo, EntityKind::Member, "").unwrap();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn search_is_case_insensitive() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_gathering(&Gathering::new("Book Club", "10001", "weekly"))
        .unwrap();

    let lower = search_names(&repo, EntityKind::Gathering, "book").unwrap();
    assert_eq!(lower, vec!["Book Club"]);

    let upper = search_names(&repo, EntityKind::Gathering, "BOOK").unwrap();
    assert_eq!(upper, vec!["Book Club"]);
}

#[test]
fn query_matches_substring_anywhere_in_the_name() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_gathering(&Gathering::new("Reading Circle", "10001", "weekly"))
        .unwrap();

    let hits = search_names(&repo, EntityKind::Gathering, "ing ci").unwrap();
    assert_eq!(hits, vec!["Reading Circle"]);
}

#[test]
fn no_match_returns_an_empty_list() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_organization(&Organization::new("ACM")).unwrap();

    let hits = search_names(&repo, EntityKind::Organization, "ieee").unwrap();
    assert!(hits.is_empty());
}

#[test]
fn search_is_scoped_to_one_kind() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_member(&Member::new("Club Treasurer", "t@x.com"))
        .unwrap();
    repo.create_gathering(&Gathering::new("Book Club", "10001", "weekly"))
        .unwrap();
    repo.create_organization(&Organization::new("Chess Club"))
        .unwrap();

    let gatherings = search_names(&repo, EntityKind::Gathering, "club").unwrap();
    assert_eq!(gatherings, vec!["Book Club"]);

    let members = search_names(&repo, EntityKind::Member, "club").unwrap();
    assert_eq!(members, vec!["Club Treasurer"]);
}

#[test]
fn matching_preserves_creation_order_among_hits() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    repo.create_gathering(&Gathering::new("Chess Night", "10001", "weekly"))
        .unwrap();
    repo.create_gathering(&Gathering::new("Book Club", "10002", "weekly"))
        .unwrap();
    repo.create_gathering(&Gathering::new("Chess Blitz", "10003", "monthly"))
        .unwrap();

    let hits = search_names(&repo, EntityKind::Gathering, "chess").unwrap();
    assert_eq!(hits, vec!["Chess Night", "Chess Blitz"]);
}

#[test]
fn search_reflects_gathering_rename() {
    let conn = open_store().unwrap();
    let repo = SqliteEntityRepository::try_new(&conn).unwrap();

    let gathering = Gathering::new("Book Club", "10001", "weekly");
    repo.create_gathering(&gathering).unwrap();
    repo.update_gathering(gathering.uuid, Some("Reading Circle"), None)
        .unwrap();

    let old_hits = search_names(&repo, EntityKind::Gathering, "book").unwrap();
    assert!(old_hits.is_empty());

    let new_hits = search_names(&repo, EntityKind::Gathering, "reading").unwrap();
    assert_eq!(new_hits, vec!["Reading Circle"]);
}
