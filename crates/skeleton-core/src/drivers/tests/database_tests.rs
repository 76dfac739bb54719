use serde_json::json;

use crate::drivers::{Database, MemoryDatabase};

#[test]
fn test_insert_assigns_increasing_ids_per_table() {
    let db = MemoryDatabase::new();
    assert_eq!(db.insert("users", json!({"name": "a"})).unwrap(), 1);
    assert_eq!(db.insert("users", json!({"name": "b"})).unwrap(), 2);
    assert_eq!(db.insert("posts", json!({"title": "x"})).unwrap(), 1);
    assert_eq!(db.count("users").unwrap(), 2);
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let db = MemoryDatabase::new();
    let first = db.insert("users", json!({})).unwrap();
    assert!(db.delete("users", first).unwrap());
    assert_eq!(db.insert("users", json!({})).unwrap(), first + 1);
}

#[test]
fn test_get_update_delete() {
    let db = MemoryDatabase::new();
    let id = db.insert("users", json!({"name": "old"})).unwrap();

    assert_eq!(db.get("users", id).unwrap(), Some(json!({"name": "old"})));
    assert!(db.update("users", id, json!({"name": "new"})).unwrap());
    assert_eq!(db.get("users", id).unwrap(), Some(json!({"name": "new"})));

    assert!(db.delete("users", id).unwrap());
    assert!(db.get("users", id).unwrap().is_none());
    assert!(!db.delete("users", id).unwrap());
    assert!(!db.update("users", id, json!({})).unwrap());
}

#[test]
fn test_missing_table_reads_empty() {
    let db = MemoryDatabase::new();
    assert!(db.get("nope", 1).unwrap().is_none());
    assert!(db.list("nope", 0, 10).unwrap().is_empty());
    assert_eq!(db.count("nope").unwrap(), 0);
}

#[test]
fn test_list_pages_in_id_order() {
    let db = MemoryDatabase::new();
    for n in 1..=5 {
        db.insert("users", json!({ "n": n })).unwrap();
    }

    let page: Vec<u64> = db
        .list("users", 2, 2)
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(page, vec![3, 4]);

    assert_eq!(db.list("users", 4, 10).unwrap().len(), 1);
    assert!(db.list("users", 10, 10).unwrap().is_empty());
}
