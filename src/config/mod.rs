//! Layered process configuration
//!
//! Sources are consulted in precedence order:
//!
//! ```text
//! 1. commandLineArgs     --key=value arguments
//! 2. systemProperties    SystemProperties::global()
//! 3. systemEnvironment   OS environment, relaxed key binding
//! 4. basicProperties     synthesized defaults (name, mode, shutdown, probes)
//! ```

mod basic;
mod environment;
mod source;
mod system;

pub use basic::{BasicProperties, HostSettings, ShutdownMode, parse_duration};
pub use environment::Environment;
pub use source::{MapPropertySource, PropertySource, SystemEnvironmentSource};
pub use system::SystemProperties;
