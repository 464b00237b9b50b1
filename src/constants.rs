//! Framework-wide constants

pub const EMPTY_STR: &str = "";

pub const MODE_DEV: &str = "dev";
pub const MODE_TEST: &str = "test";
pub const MODE_PROD: &str = "prod";

/// Every recognized environment mode label
pub const MODE_LIST: [&str; 3] = [MODE_DEV, MODE_TEST, MODE_PROD];

/// Namespace scanned by the process-wide lifecycle manager.
///
/// Empty means every component linked into the binary.
pub const BASE_NAMESPACE: &str = "";

/// Separator between namespace segments (Rust module paths)
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Suffix of a component unit, both in registry entries and manifest trees
pub const COMPONENT_SUFFIX: &str = ".component";

/// Environment variable listing extra manifest directories for the scanner
pub const COMPONENT_PATH_VAR: &str = "BOOTKIT_COMPONENT_PATH";

pub const UTF8: &str = "UTF-8";

// Property source names
pub const COMMAND_LINE_SOURCE: &str = "commandLineArgs";
pub const SYSTEM_PROPERTIES_SOURCE: &str = "systemProperties";
pub const SYSTEM_ENVIRONMENT_SOURCE: &str = "systemEnvironment";
pub const BASIC_PROPERTIES_SOURCE: &str = "basicProperties";

/// Key under which non-option command line arguments are exposed
pub const NON_OPTION_ARGS: &str = "nonOptionArgs";

// Property keys
pub const APPLICATION_NAME: &str = "app.name";
pub const PROFILES_ACTIVE: &str = "app.profiles.active";
pub const MESSAGES_ENCODING: &str = "app.messages.encoding";
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_SHUTDOWN: &str = "server.shutdown";
pub const SHUTDOWN_GRACE_PERIOD: &str = "server.shutdown.grace-period";
pub const HEALTH_PROBES_ENABLED: &str = "management.health.probes.enabled";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_GRACE_PERIOD: &str = "20s";

/// Check whether a label names a recognized environment mode
pub fn valid_mode(mode: &str) -> bool {
    !mode.is_empty() && MODE_LIST.contains(&mode)
}
