use skeleton_core::config::Settings;
use skeleton_core::kernel::AppMode;
use skeleton_core::registry::Named;

use crate::bootstrap::providers;

fn names(mode: AppMode) -> Vec<String> {
    providers(&Settings::named("skeleton"), mode)
        .iter()
        .map(|provider| provider.name().to_string())
        .collect()
}

#[test]
fn test_infrastructure_precedes_application_providers() {
    assert_eq!(
        names(AppMode::Scheduler),
        vec!["cache", "queue", "scheduler", "database", "filesystem", "repository", "service"]
    );
}

#[test]
fn test_routes_only_in_web_mode() {
    let web = names(AppMode::Web);
    assert_eq!(web.last().map(String::as_str), Some("route"));
    assert!(!names(AppMode::Scheduler).contains(&"route".to_string()));
}
