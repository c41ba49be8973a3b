use std::sync::Arc;

use bookshare::domain::{AddressType, DomainError, LocalStorage, NewAddress};
use bookshare::infrastructure::storage::FileLocalStorage;
use bookshare::services::address_book::{ADDRESSES_KEY, AddressBook};

fn home(first_name: &str, pincode: &str) -> NewAddress {
    NewAddress {
        kind: AddressType::Home,
        first_name: first_name.to_string(),
        last_name: "Sharma".to_string(),
        address: "221 Park Street".to_string(),
        address2: None,
        city: "Kolkata".to_string(),
        state: "West Bengal".to_string(),
        pincode: pincode.to_string(),
        phone: "9830012345".to_string(),
    }
}

#[test]
fn added_addresses_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = AddressBook::load(Arc::new(FileLocalStorage::new(dir.path()))).unwrap();

    let a = book.add(home("Anil", "700016")).unwrap();
    let b = book.add(home("Anil", "700016")).unwrap();

    assert_ne!(a.id, b.id);
    assert_ne!(a.id, "sample-home");
    assert_eq!(book.list().len(), 3);
    assert_eq!(book.get(&b.id), Some(&b));
}

#[test]
fn updating_unknown_id_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileLocalStorage::new(dir.path()));
    let mut book = AddressBook::load(storage.clone()).unwrap();
    let added = book.add(home("Anil", "700016")).unwrap();
    let before = book.list().to_vec();
    let stored_before = storage.get_item(ADDRESSES_KEY).unwrap();

    let mut ghost = added.clone();
    ghost.id = "does-not-exist".to_string();
    ghost.city = "Howrah".to_string();

    assert!(!book.update(ghost).unwrap());
    assert_eq!(book.list(), before.as_slice());
    assert_eq!(storage.get_item(ADDRESSES_KEY).unwrap(), stored_before);
}

#[test]
fn update_replaces_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = AddressBook::load(Arc::new(FileLocalStorage::new(dir.path()))).unwrap();
    let added = book.add(home("Anil", "700016")).unwrap();

    let mut moved = added.clone();
    moved.kind = AddressType::Work;
    moved.city = "Howrah".to_string();
    assert!(book.update(moved.clone()).unwrap());

    assert_eq!(book.list()[1], moved);
    assert_eq!(book.list().len(), 2);

    let mut invalid = moved;
    invalid.phone = "12345".to_string();
    assert!(matches!(
        book.update(invalid),
        Err(DomainError::Validation(_))
    ));
    assert_eq!(book.list()[1].phone, "9830012345");
}

#[test]
fn reload_reproduces_the_ordered_list() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileLocalStorage::new(dir.path()));

    let mut book = AddressBook::load(storage.clone()).unwrap();
    book.add(home("Anil", "700016")).unwrap();
    book.add(home("Bina", "700017")).unwrap();
    book.add(home("Chitra", "700018")).unwrap();
    book.remove("sample-home").unwrap();
    let written = book.list().to_vec();

    let reloaded = AddressBook::load(storage).unwrap();
    assert_eq!(reloaded.list(), written.as_slice());
    let names: Vec<&str> = reloaded
        .list()
        .iter()
        .map(|a| a.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["Anil", "Bina", "Chitra"]);
}

#[test]
fn emptied_list_stays_empty_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileLocalStorage::new(dir.path()));

    let mut book = AddressBook::load(storage.clone()).unwrap();
    assert!(book.remove("sample-home").unwrap());

    let reloaded = AddressBook::load(storage).unwrap();
    assert!(reloaded.list().is_empty());
}
