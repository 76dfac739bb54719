use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::container::{Container, Key};
use crate::http::{HttpServer, Readiness, RouteTable};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::keys;
use crate::kernel::lifecycle::LifecycleState;
use crate::kernel::shutdown::{ShutdownHooks, ShutdownReport};
use crate::kernel::signal;
use crate::logging::LogHandle;
use crate::provider::{ProviderRegistry, ServiceProvider};
use crate::scheduler::JobRegistry;

/// What the application does once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Serve HTTP until terminated.
    Web,
    /// Run cron jobs until terminated.
    Scheduler,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Web => f.write_str("web"),
            AppMode::Scheduler => f.write_str("scheduler"),
        }
    }
}

type ProviderFactory = Box<dyn FnOnce(&Settings) -> Vec<Box<dyn ServiceProvider>> + Send>;
type JobLoader = Box<dyn FnOnce(&Container, &Settings) -> Result<JobRegistry> + Send>;

enum ConfigSource {
    File(PathBuf),
    Inline(Box<Settings>),
}

/// Main application struct sequencing configuration, providers, services,
/// the run loop and shutdown.
///
/// ```text
/// Created -> Configured -> Registered -> Booted -> Started -> ShuttingDown -> Stopped
/// ```
///
/// [`boot`](Self::boot) covers the first three transitions,
/// [`start`](Self::start) the rest.
pub struct Application {
    mode: AppMode,
    state: LifecycleState,
    config_source: Option<ConfigSource>,
    settings: Option<Arc<Settings>>,
    container: Arc<Container>,
    providers: Arc<ProviderRegistry>,
    provider_factory: Option<ProviderFactory>,
    job_loader: Option<JobLoader>,
    jobs: Option<JobRegistry>,
    log: LogHandle,
    routes: Arc<RouteTable>,
    readiness: Arc<Readiness>,
    server: Option<Arc<HttpServer>>,
    hooks: ShutdownHooks,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("providers", &self.providers.names())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Application {
    pub fn new(mode: AppMode) -> Self {
        log::info!(
            "Creating {} v{} ({} mode)",
            constants::APP_NAME,
            constants::APP_VERSION,
            mode
        );
        Self {
            mode,
            state: LifecycleState::Created,
            config_source: None,
            settings: None,
            container: Arc::new(Container::new()),
            providers: Arc::new(ProviderRegistry::providers()),
            provider_factory: None,
            job_loader: None,
            jobs: None,
            log: LogHandle::detached(constants::DEFAULT_LOG_DIRECTIVE),
            routes: Arc::new(RouteTable::new()),
            readiness: Arc::new(Readiness::new()),
            server: None,
            hooks: ShutdownHooks::new(),
        }
    }

    /// Load settings from `path` during boot.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_source = Some(ConfigSource::File(path.into()));
        self
    }

    /// Use `settings` as-is (still validated during boot).
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.config_source = Some(ConfigSource::Inline(Box::new(settings)));
        self
    }

    pub fn with_log_handle(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    /// Builds the ordered provider list once settings are known.
    pub fn with_providers<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Settings) -> Vec<Box<dyn ServiceProvider>> + Send + 'static,
    {
        self.provider_factory = Some(Box::new(factory));
        self
    }

    /// Builds the job registry for scheduler mode.
    pub fn with_jobs<F>(mut self, loader: F) -> Self
    where
        F: FnOnce(&Container, &Settings) -> Result<JobRegistry> + Send + 'static,
    {
        self.job_loader = Some(Box::new(loader));
        self
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_deref()
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Address the HTTP server is bound to, once started in web mode.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().and_then(|server| server.local_addr())
    }

    /// Resolve a binding from the application container.
    pub fn make<T>(&self, key: &Key<T>) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.make(key)
    }

    /// Add a shutdown hook. Hooks run in the order they were added; boot
    /// adds the HTTP server, lifecycle services and provider hooks.
    pub fn on_shutdown<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.hooks.register(name, hook);
    }

    pub fn shutdown_hook_names(&self) -> Vec<&str> {
        self.hooks.names()
    }

    fn ensure_next(&self, to: LifecycleState) -> Result<()> {
        self.state.advance(to).map(|_| ())
    }

    fn enter(&mut self, to: LifecycleState) {
        self.state = to;
        log::info!("Application {}", to);
    }

    /// Configure, register and boot: `Created -> Booted`.
    ///
    /// Any error here is fatal; nothing is cleaned up.
    pub async fn boot(&mut self) -> Result<()> {
        self.configure()?;
        self.register()?;
        self.boot_providers().await
    }

    fn configure(&mut self) -> Result<()> {
        self.ensure_next(LifecycleState::Configured)?;

        let settings = match self.config_source.take() {
            Some(ConfigSource::File(path)) => Settings::load(&path)?,
            Some(ConfigSource::Inline(settings)) => {
                settings.validate_all()?;
                *settings
            }
            None => {
                return Err(Error::Config {
                    path: None,
                    message: "no configuration source given".to_string(),
                });
            }
        };

        if settings.app.debug {
            self.log.set_directive(constants::DEBUG_LOG_DIRECTIVE)?;
            if settings.is_production() {
                log::warn!("Debug logging is enabled in production");
            }
        } else if let Some(level) = &settings.logging.level {
            self.log.set_directive(level)?;
        }
        log::info!(
            "Configured '{}' (env={}, debug={})",
            settings.app.name,
            settings.app.env,
            settings.app.debug
        );

        let settings = Arc::new(settings);
        self.container.instance(keys::CONFIG, settings.clone())?;
        self.container
            .instance(keys::LOGGER, Arc::new(self.log.clone()))?;
        self.container.instance(keys::ROUTES, self.routes.clone())?;
        self.container
            .instance(keys::READINESS, self.readiness.clone())?;
        self.settings = Some(settings);

        self.enter(LifecycleState::Configured);
        Ok(())
    }

    fn register(&mut self) -> Result<()> {
        self.ensure_next(LifecycleState::Registered)?;
        let settings = self.require_settings(KernelLifecyclePhase::Register)?;

        let mut providers = ProviderRegistry::providers();
        if let Some(factory) = self.provider_factory.take() {
            for provider in factory(&settings) {
                providers.register(provider);
            }
        }
        providers.register_providers(&self.container)?;
        self.providers = Arc::new(providers);

        self.enter(LifecycleState::Registered);
        Ok(())
    }

    async fn boot_providers(&mut self) -> Result<()> {
        self.ensure_next(LifecycleState::Booted)?;
        let settings = self.require_settings(KernelLifecyclePhase::Boot)?;

        self.providers.boot_providers(&self.container).await?;

        if self.mode == AppMode::Web {
            if self.routes.is_empty() {
                log::warn!("No route groups registered; the HTTP server will only answer 404");
            }
            let server = Arc::new(HttpServer::new(
                settings.server.addr.clone(),
                self.routes.router(),
            ));
            let timeout = settings.server.shutdown_timeout();
            let hook_server = server.clone();
            self.hooks.register(constants::HTTP_SERVER_HOOK, move || async move {
                hook_server.shutdown(timeout).await
            });
            self.server = Some(server);
        }

        let container = self.container.clone();
        self.hooks.register(constants::SERVICES_HOOK, move || async move {
            container.stop_services().await
        });
        let container = self.container.clone();
        let providers = self.providers.clone();
        self.hooks.register(constants::PROVIDERS_HOOK, move || async move {
            providers.shutdown_providers(&container).await
        });

        self.enter(LifecycleState::Booted);
        Ok(())
    }

    fn require_settings(&self, phase: KernelLifecyclePhase) -> Result<Arc<Settings>> {
        self.settings
            .clone()
            .ok_or_else(|| Error::KernelLifecycleError {
                phase,
                component_name: None,
                message: "Settings missing after configuration".to_string(),
                source: None,
            })
    }

    /// Build the job registry without scheduling it. Runs the job loader at
    /// most once.
    pub fn load_jobs(&mut self) -> Result<&JobRegistry> {
        let settings = self.require_settings(KernelLifecyclePhase::Start)?;
        if self.jobs.is_none() {
            let jobs = match self.job_loader.take() {
                Some(loader) => loader(&self.container, &settings)?,
                None => JobRegistry::jobs(),
            };
            self.jobs = Some(jobs);
        }
        match &self.jobs {
            Some(jobs) => Ok(jobs),
            None => Err(Error::from("job registry unavailable")),
        }
    }

    /// Run until Ctrl-C or SIGTERM, then shut down.
    pub async fn start(&mut self) -> Result<ShutdownReport> {
        self.start_until(signal::wait_for_termination()).await
    }

    /// Start, wait for `shutdown_signal`, then run the shutdown hooks.
    pub async fn start_until<F>(&mut self, shutdown_signal: F) -> Result<ShutdownReport>
    where
        F: Future<Output = ()>,
    {
        self.launch().await?;
        shutdown_signal.await;
        log::info!("Shutdown requested");
        self.shutdown().await
    }

    /// `Booted -> Started`: start lifecycle services, then either spawn the
    /// HTTP server or schedule jobs.
    ///
    /// On failure, services already started are stopped (best effort) and
    /// the application stays `Booted`.
    pub async fn launch(&mut self) -> Result<()> {
        self.ensure_next(LifecycleState::Started)?;

        if let Err(e) = self.launch_mode().await {
            log::error!("Startup failed: {}", e);
            if let Err(stop_err) = self.container.stop_services().await {
                log::error!("Error stopping services after failed start: {}", stop_err);
            }
            return Err(e);
        }

        self.readiness.mark_ready();
        self.enter(LifecycleState::Started);
        Ok(())
    }

    async fn launch_mode(&mut self) -> Result<()> {
        self.container.start_services().await?;

        match self.mode {
            AppMode::Web => {
                let server = self.server.clone().ok_or_else(|| Error::KernelLifecycleError {
                    phase: KernelLifecyclePhase::Start,
                    component_name: Some(constants::HTTP_SERVER_HOOK.to_string()),
                    message: "HTTP server was not built during boot".to_string(),
                    source: None,
                })?;
                server.spawn().await?;
            }
            AppMode::Scheduler => {
                let scheduler = self.container.make(&keys::SCHEDULER)?;
                let jobs = self.load_jobs()?;
                jobs.schedule_all(scheduler.as_ref()).await?;
            }
        }
        Ok(())
    }

    /// `Started -> ShuttingDown -> Stopped`: run every shutdown hook.
    pub async fn shutdown(&mut self) -> Result<ShutdownReport> {
        self.ensure_next(LifecycleState::ShuttingDown)?;
        self.readiness.mark_not_ready();
        self.enter(LifecycleState::ShuttingDown);

        let report = self.hooks.run_all().await;

        self.enter(LifecycleState::Stopped);
        Ok(report)
    }
}
