use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::drivers::cache::MAX_TTL;
use crate::drivers::{CacheExt, CacheStore, MemoryCache};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Profile {
    id: u64,
    name: String,
}

#[test]
fn test_put_get_forget() {
    let cache = MemoryCache::new();
    assert_eq!(cache.driver(), "memory");
    assert!(cache.get("missing").is_none());

    cache.put("greeting", json!("hello"), None);
    assert_eq!(cache.get("greeting"), Some(json!("hello")));
    assert!(cache.has("greeting"));
    assert_eq!(cache.len(), 1);

    assert!(cache.forget("greeting"));
    assert!(!cache.forget("greeting"));
    assert!(cache.is_empty());
}

#[test]
fn test_flush_clears_everything() {
    let cache = MemoryCache::new();
    cache.put("a", json!(1), None);
    cache.put("b", json!(2), None);
    cache.flush();
    assert!(cache.is_empty());
    assert!(!cache.has("a"));
}

#[test]
fn test_entries_expire_after_ttl() {
    let cache = MemoryCache::new();
    cache.put("short", json!("soon gone"), Some(Duration::from_millis(50)));
    cache.put("forever", json!("stays"), None);
    assert!(cache.has("short"));

    thread::sleep(Duration::from_millis(120));
    assert!(cache.get("short").is_none());
    assert!(cache.has("forever"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_default_ttl_applies_when_none_given() {
    let cache = MemoryCache::new().with_default_ttl(Duration::from_millis(50));
    cache.put("k", json!(true), None);
    cache.put("pinned", json!(true), Some(Duration::from_secs(60)));

    thread::sleep(Duration::from_millis(120));
    assert!(!cache.has("k"));
    assert!(cache.has("pinned"), "An explicit TTL outlives the default");
}

#[test]
fn test_overwrite_restarts_ttl() {
    let cache = MemoryCache::new();
    cache.put("k", json!(1), Some(Duration::from_millis(50)));
    cache.put("k", json!(2), Some(Duration::from_secs(60)));

    thread::sleep(Duration::from_millis(120));
    assert_eq!(cache.get("k"), Some(json!(2)));
}

#[test]
fn test_huge_ttls_are_clamped_instead_of_overflowing() {
    let cache = MemoryCache::new().with_default_ttl(Duration::from_secs(i64::MAX as u64));
    assert_eq!(cache.default_ttl(), Some(MAX_TTL));

    cache.put("default", json!("a"), None);
    cache.put("explicit", json!("b"), Some(Duration::MAX));
    assert_eq!(cache.get("default"), Some(json!("a")));
    assert_eq!(cache.get("explicit"), Some(json!("b")));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_clones_share_entries() {
    let cache = MemoryCache::new();
    let other = cache.clone();
    other.put("shared", json!(1), None);
    assert!(cache.has("shared"));
}

#[test]
fn test_typed_access() {
    let cache = MemoryCache::new();
    let profile = Profile {
        id: 7,
        name: "Ada".to_string(),
    };
    cache.put_as("profile:7", &profile, None).unwrap();

    assert_eq!(cache.get_as::<Profile>("profile:7"), Some(profile));
}

#[test]
fn test_typed_access_mismatch_is_a_miss() {
    let cache = MemoryCache::new();
    cache.put("profile:1", json!("not a profile"), None);
    assert!(cache.get_as::<Profile>("profile:1").is_none());
}
