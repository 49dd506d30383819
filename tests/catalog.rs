use std::fs;
use std::path::{Path, PathBuf};

use book_catalog::{BookField, BookRecord, CatalogError, CatalogStore, Selection, SelectionError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::{tempdir, TempDir};

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library_data.json");
    (dir, path)
}

fn dune(time_borrowed: &str) -> BookRecord {
    BookRecord::new("Dune", "Herbert", "SciFi", "1965", "3", time_borrowed)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn missing_file_loads_as_empty_catalog() {
    let (_dir, path) = scratch();
    let store = CatalogStore::load(&path).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.books(), &[] as &[BookRecord]);
}

#[test]
fn add_with_blank_time_borrowed_is_rejected() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();

    let err = store.add(dune("")).unwrap_err();

    match err {
        CatalogError::Validation { missing } => {
            assert_eq!(missing, vec![BookField::TimeBorrowed])
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.len(), 0);
    assert!(!path.exists());
}

#[test]
fn added_book_survives_restart_unchanged() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();

    store.add(dune("0")).unwrap();
    assert_eq!(store.len(), 1);
    assert!(read(&path).contains("\"time_borrowed\": \"0\""));
    drop(store);

    let reloaded = CatalogStore::load(&path).unwrap();
    assert_eq!(reloaded.books(), &[dune("0")]);
}

#[test]
fn removing_first_of_two_keeps_the_second() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();
    let first = BookRecord::new("Emma", "Austen", "Novel", "1815", "1", "2 weeks");
    let second = dune("0");

    store.add(first.clone()).unwrap();
    store.add(second.clone()).unwrap();
    let removed = store.remove(&Selection::single(0)).unwrap();

    assert_eq!(removed, vec![first.clone()]);
    assert_eq!(store.books(), &[second.clone()]);
    let persisted = read(&path);
    assert!(!persisted.contains("Emma"));
    assert_eq!(CatalogStore::load(&path).unwrap().books(), &[second]);
}

#[test]
fn remove_without_selection_leaves_file_alone() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();
    store.add(dune("0")).unwrap();
    let before = read(&path);

    let err = store.remove(&Selection::none()).unwrap_err();

    assert!(matches!(err, CatalogError::Selection(SelectionError::Empty)));
    assert_eq!(store.len(), 1);
    assert_eq!(read(&path), before);
}

#[test]
fn round_trip_preserves_order_and_values() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();
    let books: Vec<BookRecord> = (1..=12)
        .map(|n| {
            BookRecord::new(
                format!("Volume {n}"),
                format!("Author {}", n % 3),
                "Reference",
                format!("19{n:02}"),
                n.to_string(),
                "never",
            )
        })
        .collect();
    for book in &books {
        store.add(book.clone()).unwrap();
    }
    // A duplicate is stored as its own row.
    store.add(books[0].clone()).unwrap();

    let reloaded = CatalogStore::load(&path).unwrap();
    let mut expected = books.clone();
    expected.push(books[0].clone());
    assert_eq!(reloaded.books(), expected.as_slice());
}

#[test]
fn partial_entries_get_empty_fields() {
    let (_dir, path) = scratch();
    fs::write(
        &path,
        r#"[
    {"title": "Old Entry", "author": "Someone", "genre": "Poetry"},
    {"title": "Older Entry", "release_date": 1999, "copies": 2, "shelf": "B3"}
]"#,
    )
    .unwrap();

    let store = CatalogStore::load(&path).unwrap();

    assert_eq!(
        store.books(),
        &[
            BookRecord::new("Old Entry", "Someone", "Poetry", "", "", ""),
            BookRecord::new("Older Entry", "", "", "1999", "2", ""),
        ]
    );
}

#[test]
fn saving_after_load_writes_every_key() {
    let (_dir, path) = scratch();
    fs::write(&path, r#"[{"title": "Sparse"}]"#).unwrap();

    let mut store = CatalogStore::load(&path).unwrap();
    store.persist().unwrap();

    let text = read(&path);
    for field in BookField::ALL {
        assert!(text.contains(&format!("\"{}\": ", field.key())), "{text}");
    }
}

#[test]
fn malformed_file_fails_to_load() {
    let (_dir, path) = scratch();
    fs::write(&path, "not json at all").unwrap();
    assert!(matches!(
        CatalogStore::load(&path),
        Err(CatalogError::Parse { .. })
    ));
}

#[test]
fn removed_books_are_absent_from_output() {
    let (_dir, path) = scratch();
    let mut store = CatalogStore::load(&path).unwrap();
    for title in ["Keep A", "Drop B", "Keep C", "Drop D"] {
        store
            .add(BookRecord::new(title, "x", "x", "x", "x", "x"))
            .unwrap();
    }

    let selection: Selection = [1, 3].into_iter().collect();
    let removed = store.remove(&selection).unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(store.len(), 2);
    let text = read(&path);
    assert!(!text.contains("Drop"));
    assert!(text.contains("Keep A") && text.contains("Keep C"));
}

/// Text with no surrounding whitespace, so trimming on add is a no-op.
fn field_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9éü][A-Za-z0-9éü .,'-]{0,12}[A-Za-z0-9éü]|[A-Za-z0-9éü]"
}

fn book_strategy() -> impl Strategy<Value = BookRecord> {
    (
        field_text(),
        field_text(),
        field_text(),
        field_text(),
        field_text(),
        field_text(),
    )
        .prop_map(|(title, author, genre, release_date, copies, time_borrowed)| {
            BookRecord::new(title, author, genre, release_date, copies, time_borrowed)
        })
}

/// A non-empty list of books plus a non-empty set of rows inside it.
fn books_with_selection() -> impl Strategy<Value = (Vec<BookRecord>, Vec<usize>)> {
    (1usize..12).prop_flat_map(|len| {
        (
            prop::collection::vec(book_strategy(), len),
            prop::sample::subsequence((0..len).collect::<Vec<_>>(), 1..=len),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reload_after_adds_returns_same_books(books in prop::collection::vec(book_strategy(), 0..16)) {
        let (_dir, path) = scratch();
        let mut store = CatalogStore::load(&path).unwrap();
        for book in &books {
            store.add(book.clone()).unwrap();
        }

        let reloaded = CatalogStore::load(&path).unwrap();
        prop_assert_eq!(reloaded.books(), books.as_slice());
        prop_assert_eq!(store.books(), books.as_slice());
    }

    #[test]
    fn remove_shrinks_by_selected_count((books, rows) in books_with_selection()) {
        let (_dir, path) = scratch();
        let mut store = CatalogStore::load(&path).unwrap();
        for book in &books {
            store.add(book.clone()).unwrap();
        }

        let selection: Selection = rows.iter().copied().collect();
        let removed = store.remove(&selection).unwrap();

        let expected_kept: Vec<BookRecord> = books
            .iter()
            .enumerate()
            .filter(|(row, _)| !rows.contains(row))
            .map(|(_, book)| book.clone())
            .collect();
        let expected_removed: Vec<BookRecord> = rows.iter().map(|row| books[*row].clone()).collect();

        prop_assert_eq!(store.len(), books.len() - rows.len());
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(store.books(), expected_kept.as_slice());

        let persisted = CatalogStore::load(&path).unwrap();
        prop_assert_eq!(persisted.books(), expected_kept.as_slice());
    }
}
