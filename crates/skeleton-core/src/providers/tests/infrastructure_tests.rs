use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use crate::config::Settings;
use crate::container::Container;
use crate::kernel::error::Error;
use crate::kernel::keys;
use crate::provider::{ProviderRegistry, ServiceProvider};
use crate::providers::{
    CacheServiceProvider, DatabaseServiceProvider, FilesystemServiceProvider, QueueServiceProvider,
    SchedulerServiceProvider,
};

fn infrastructure(settings: &Settings) -> ProviderRegistry {
    let mut providers = ProviderRegistry::providers();
    providers
        .register(Box::new(CacheServiceProvider::from_settings(settings)))
        .register(Box::new(QueueServiceProvider::from_settings(settings)))
        .register(Box::new(SchedulerServiceProvider::new()))
        .register(Box::new(DatabaseServiceProvider::from_settings(settings)))
        .register(Box::new(FilesystemServiceProvider::from_settings(settings)));
    providers
}

#[tokio::test]
async fn test_register_binds_without_constructing() {
    let settings = Settings::named("skeleton");
    let container = Container::new();
    let providers = infrastructure(&settings);

    providers.register_providers(&container).unwrap();
    providers.boot_providers(&container).await.unwrap();

    for key in ["cache", "database", "filesystem", "queue", "scheduler"] {
        assert!(container.keys().contains(&key), "missing binding {key}");
    }
    assert!(container.resolved(&keys::DATABASE).is_none());
    assert!(container.resolved(&keys::CACHE).is_none());
    assert!(container.resolved(&keys::FILESYSTEM).is_none());
    assert_eq!(container.service_names(), vec!["queue", "scheduler"]);
}

#[tokio::test]
async fn test_unsupported_driver_fails_registration() {
    let mut settings = Settings::named("skeleton");
    settings.cache.driver = "redis".to_string();

    let container = Container::new();
    let err = infrastructure(&settings)
        .register_providers(&container)
        .unwrap_err();
    match err {
        Error::ProviderRegistration { provider, source } => {
            assert_eq!(provider, "cache");
            assert!(matches!(
                *source,
                Error::UnsupportedDriver { service: "cache", ref driver } if driver == "redis"
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cache_shutdown_flushes_only_when_resolved() {
    let settings = Settings::named("skeleton");
    let container = Container::new();
    let provider = CacheServiceProvider::from_settings(&settings);
    provider.register(&container).unwrap();

    provider.shutdown(&container).await.unwrap();
    assert!(container.resolved(&keys::CACHE).is_none());

    let cache = container.make(&keys::CACHE).unwrap();
    cache.put("k", json!(1), None);
    provider.shutdown(&container).await.unwrap();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_database_is_a_singleton() {
    let settings = Settings::named("skeleton");
    let container = Container::new();
    DatabaseServiceProvider::from_settings(&settings)
        .register(&container)
        .unwrap();

    let first = container.make(&keys::DATABASE).unwrap();
    let second = container.make(&keys::DATABASE).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.driver(), "memory");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queue_and_scheduler_start_and_stop_as_services() {
    let settings = Settings::named("skeleton");
    let container = Container::new();
    infrastructure(&settings)
        .register_providers(&container)
        .unwrap();

    container.start_services().await.unwrap();
    let queue = container.resolved(&keys::QUEUE).expect("queue started");
    assert!(queue.dispatch("noop", json!(null)).is_ok());
    assert!(container.resolved(&keys::SCHEDULER).is_some());

    container.stop_services().await.unwrap();
    assert!(queue.dispatch("late", json!(null)).is_err());
}

#[tokio::test]
async fn test_cache_with_unbounded_ttl_setting_does_not_panic() {
    let mut settings = Settings::named("skeleton");
    settings.cache.default_ttl_secs = i64::MAX as u64;
    let container = Container::new();
    CacheServiceProvider::from_settings(&settings)
        .register(&container)
        .unwrap();

    let cache = container.make(&keys::CACHE).unwrap();
    cache.put("k", json!("v"), None);
    assert_eq!(cache.get("k"), Some(json!("v")));
}

#[tokio::test]
async fn test_filesystem_is_lazy_and_rooted_in_config() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("storage");
    let mut settings = Settings::named("skeleton");
    settings.filesystem.root = root.clone();

    let container = Container::new();
    FilesystemServiceProvider::from_settings(&settings)
        .register(&container)
        .unwrap();
    assert!(container.resolved(&keys::FILESYSTEM).is_none());
    assert!(!root.exists());

    let disk = container.make(&keys::FILESYSTEM).unwrap();
    assert_eq!(disk.driver(), "local");
    disk.put(Path::new("avatars/1.png"), b"png").unwrap();
    assert!(root.join("avatars/1.png").is_file());

    let again = container.make(&keys::FILESYSTEM).unwrap();
    assert!(Arc::ptr_eq(&disk, &again));
}

#[tokio::test]
async fn test_unsupported_filesystem_driver_fails_registration() {
    let mut settings = Settings::named("skeleton");
    settings.filesystem.driver = "s3".to_string();

    let err = FilesystemServiceProvider::from_settings(&settings)
        .register(&Container::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedDriver { service: "filesystem", ref driver } if driver == "s3"
    ));
}
