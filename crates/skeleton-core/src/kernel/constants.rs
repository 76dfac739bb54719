/// Application name
pub const APP_NAME: &str = "skeleton";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

/// Log filter before configuration is loaded
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Log filter applied when `app.debug` is set
pub const DEBUG_LOG_DIRECTIVE: &str = "debug";

/// Shutdown hook names, in the order they are registered during boot
pub const HTTP_SERVER_HOOK: &str = "http-server";
pub const SERVICES_HOOK: &str = "services";
pub const PROVIDERS_HOOK: &str = "providers";
