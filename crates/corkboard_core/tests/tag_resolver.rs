use corkboard_core::db::{open_db, open_db_in_memory};
use corkboard_core::{
    ErrorKind, NewNote, NewUser, NoteRepository, RepoError, ServiceError, SqliteNoteRepository,
    SqliteTagResolver, SqliteUserRepository, TagResolver, UserRepository, ValidationError,
};
use rusqlite::Connection;
use std::thread;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn tag_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn resolving_duplicate_names_yields_one_tag() {
    let conn = open_db_in_memory().unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();

    let tags = resolver.resolve(&names(&["x", "x", " x "])).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "x");
    assert_eq!(tag_rows(&conn), 1);
}

#[test]
fn resolving_again_returns_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();

    let first = resolver.resolve(&names(&["work", "home"])).unwrap();
    let second = resolver.resolve(&names(&["home", "work", "new"])).unwrap();

    assert_eq!(second[0], first[1]);
    assert_eq!(second[1], first[0]);
    assert_eq!(second[2].name, "new");
    assert_eq!(tag_rows(&conn), 3);
}

#[test]
fn tag_names_are_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();

    let tags = resolver.resolve(&names(&["Work", "work"])).unwrap();
    assert_eq!(tags.len(), 2);
    assert_ne!(tags[0].id, tags[1].id);
    assert!(resolver.get_by_name("WORK").unwrap().is_none());
    assert_eq!(resolver.get_by_name(" Work ").unwrap().unwrap(), tags[0]);
}

#[test]
fn resolve_rejects_blank_names_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();

    let err = resolver.resolve(&names(&["fine", ""])).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyTagName)
    ));
    assert_eq!(tag_rows(&conn), 0);
}

#[test]
fn list_tags_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();
    resolver.resolve(&names(&["zeta", "alpha", "mid"])).unwrap();

    let listed: Vec<_> = resolver
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(listed, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn concurrent_writers_share_one_new_tag_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");

    let owner = {
        let conn = open_db(&path).unwrap();
        SqliteUserRepository::try_new(&conn)
            .unwrap()
            .create(&NewUser {
                username: "racer".to_string(),
                email: "racer@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .unwrap()
            .id
    };

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let mut conn = open_db(&path).unwrap();
            thread::spawn(move || {
                let mut repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
                for idx in 0..10 {
                    let note = NewNote::with_content(format!("w{worker}-{idx}"))
                        .tagged(["shared", "also-shared"]);
                    repo.create(owner, &note).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(tag_rows(&conn), 2);
    let links: i64 = conn
        .query_row("SELECT COUNT(*) FROM note_tag;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(links, 80);
}

#[test]
fn unresolvable_unique_violation_surfaces_tag_conflict() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("CREATE UNIQUE INDEX idx_tags_name_folded ON tags(lower(name));")
        .unwrap();
    let resolver = SqliteTagResolver::try_new(&conn).unwrap();

    let work = resolver.resolve(&names(&["work"])).unwrap();
    assert_eq!(work[0].name, "work");

    let err = resolver.resolve(&names(&["Work"])).unwrap_err();
    assert!(matches!(&err, RepoError::TagConflict(name) if name == "Work"));
    assert_eq!(tag_rows(&conn), 1);

    let err = ServiceError::from(err);
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.kind().status_code(), 409);
}
