//! The provider list and application assembly.
use std::path::PathBuf;

use skeleton_core::config::Settings;
use skeleton_core::kernel::{AppMode, Application};
use skeleton_core::logging::LogHandle;
use skeleton_core::provider::ServiceProvider;
use skeleton_core::providers::{
    CacheServiceProvider, DatabaseServiceProvider, FilesystemServiceProvider, QueueServiceProvider,
    SchedulerServiceProvider,
};

use crate::jobs;
use crate::providers::{RepositoryServiceProvider, RouteServiceProvider, ServiceLayerProvider};

/// Providers in dependency order: infrastructure, then repositories, then
/// services. Routes are only contributed in web mode.
pub fn providers(settings: &Settings, mode: AppMode) -> Vec<Box<dyn ServiceProvider>> {
    let mut providers: Vec<Box<dyn ServiceProvider>> = vec![
        Box::new(CacheServiceProvider::from_settings(settings)),
        Box::new(QueueServiceProvider::from_settings(settings)),
        Box::new(SchedulerServiceProvider::new()),
        Box::new(DatabaseServiceProvider::from_settings(settings)),
        Box::new(FilesystemServiceProvider::from_settings(settings)),
        Box::new(RepositoryServiceProvider::new()),
        Box::new(ServiceLayerProvider::new()),
    ];
    if mode == AppMode::Web {
        providers.push(Box::new(RouteServiceProvider::new()));
    }
    providers
}

/// An unbooted application reading its settings from `config_path`.
pub fn application(
    mode: AppMode,
    config_path: impl Into<PathBuf>,
    log: LogHandle,
) -> Application {
    Application::new(mode)
        .with_config_path(config_path)
        .with_log_handle(log)
        .with_providers(move |settings| providers(settings, mode))
        .with_jobs(jobs::load_all)
}
