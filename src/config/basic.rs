//! Synthesized basic configuration layer and the typed host settings view

use super::{Environment, MapPropertySource};
use crate::constants::*;
use crate::error::ConfigurationError;
use crate::mode::Mode;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumString};

/// How the host stops serving on shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShutdownMode {
    /// Drain in-flight requests, bounded by the grace period
    #[default]
    Graceful,
    Immediate,
}

/// Operational defaults derived from the application name and mode.
///
/// Installed as the lowest-precedence layer under the fixed name
/// `basicProperties`, replaced wholesale every time it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicProperties {
    pub application_name: String,
    pub active_profile: Mode,
    pub message_encoding: String,
    pub shutdown_mode: ShutdownMode,
    pub shutdown_grace_period: String,
    pub health_probes_enabled: bool,
}

impl BasicProperties {
    pub fn new(application_name: impl Into<String>, active_profile: Mode) -> Self {
        Self {
            application_name: application_name.into(),
            active_profile,
            message_encoding: UTF8.to_string(),
            shutdown_mode: ShutdownMode::Graceful,
            shutdown_grace_period: DEFAULT_GRACE_PERIOD.to_string(),
            health_probes_enabled: true,
        }
    }

    pub fn to_property_source(&self) -> MapPropertySource {
        MapPropertySource::from_pairs(
            BASIC_PROPERTIES_SOURCE,
            [
                (APPLICATION_NAME, self.application_name.clone()),
                (PROFILES_ACTIVE, self.active_profile.to_string()),
                (MESSAGES_ENCODING, self.message_encoding.clone()),
                (SERVER_SHUTDOWN, self.shutdown_mode.to_string()),
                (SHUTDOWN_GRACE_PERIOD, self.shutdown_grace_period.clone()),
                (HEALTH_PROBES_ENABLED, self.health_probes_enabled.to_string()),
            ],
        )
    }

    /// Install this layer last, dropping any previously applied basic layer
    pub fn apply_to(&self, environment: &mut Environment) {
        if environment.remove(BASIC_PROPERTIES_SOURCE).is_some() {
            tracing::debug!("Replacing existing {} layer", BASIC_PROPERTIES_SOURCE);
        }
        environment.add_last(self.to_property_source());
    }
}

/// Settings handed to the host framework, read from a layered environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSettings {
    pub application_name: String,
    pub message_encoding: String,
    pub address: IpAddr,
    pub port: u16,
    pub shutdown_mode: ShutdownMode,
    #[serde(with = "duration_millis")]
    pub grace_period: Duration,
    pub health_probes_enabled: bool,
}

impl HostSettings {
    pub fn from_environment(environment: &Environment) -> Result<Self, ConfigurationError> {
        let address = environment.property_or(SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS);
        let address: IpAddr = address.trim().parse().map_err(|_| {
            ConfigurationError::invalid_property(SERVER_ADDRESS, &address, "not an IP address")
        })?;

        let port = match environment.property(SERVER_PORT) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                ConfigurationError::invalid_property(SERVER_PORT, &value, "not a port number")
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let shutdown = environment.property_or(SERVER_SHUTDOWN, ShutdownMode::Graceful.as_ref());
        let shutdown_mode = shutdown.trim().parse::<ShutdownMode>().map_err(|_| {
            ConfigurationError::invalid_property(
                SERVER_SHUTDOWN,
                &shutdown,
                "expected 'graceful' or 'immediate'",
            )
        })?;

        let grace = environment.property_or(SHUTDOWN_GRACE_PERIOD, DEFAULT_GRACE_PERIOD);
        let grace_period = parse_duration(&grace).map_err(|reason| {
            ConfigurationError::invalid_property(SHUTDOWN_GRACE_PERIOD, &grace, reason)
        })?;

        let probes = environment.property_or(HEALTH_PROBES_ENABLED, "false");
        let health_probes_enabled = parse_bool(&probes).ok_or_else(|| {
            ConfigurationError::invalid_property(HEALTH_PROBES_ENABLED, &probes, "not a boolean")
        })?;

        Ok(Self {
            application_name: environment.property_or(APPLICATION_NAME, EMPTY_STR),
            message_encoding: environment.property_or(MESSAGES_ENCODING, UTF8),
            address,
            port,
            shutdown_mode,
            grace_period,
            health_probes_enabled,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    /// Time the host may spend draining on shutdown
    pub fn drain_timeout(&self) -> Duration {
        match self.shutdown_mode {
            ShutdownMode::Graceful => self.grace_period,
            ShutdownMode::Immediate => Duration::ZERO,
        }
    }
}

/// Parse `500ms`, `20s`, `2m`, `1h` or a bare number of seconds
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    if digits.is_empty() {
        return Err("missing numeric value".to_string());
    }
    let amount: u64 = digits
        .parse()
        .map_err(|_| "numeric value out of range".to_string())?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(amount)),
        "" | "s" => Ok(Duration::from_secs(amount)),
        "m" => seconds(amount, 60),
        "h" => seconds(amount, 3600),
        other => Err(format!("unknown duration unit '{other}'")),
    }
}

fn seconds(amount: u64, unit: u64) -> Result<Duration, String> {
    amount
        .checked_mul(unit)
        .map(Duration::from_secs)
        .ok_or_else(|| "numeric value out of range".to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertySource;

    #[test]
    fn test_basic_layer_contents() {
        let source = BasicProperties::new("orders", Mode::Prod).to_property_source();
        assert_eq!(source.name(), BASIC_PROPERTIES_SOURCE);
        assert_eq!(source.get(APPLICATION_NAME).as_deref(), Some("orders"));
        assert_eq!(source.get(PROFILES_ACTIVE).as_deref(), Some("prod"));
        assert_eq!(source.get(MESSAGES_ENCODING).as_deref(), Some("UTF-8"));
        assert_eq!(source.get(SERVER_SHUTDOWN).as_deref(), Some("graceful"));
        assert_eq!(source.get(SHUTDOWN_GRACE_PERIOD).as_deref(), Some("20s"));
        assert_eq!(source.get(HEALTH_PROBES_ENABLED).as_deref(), Some("true"));
    }

    #[test]
    fn test_apply_replaces_and_stays_last() {
        let mut environment = Environment::new();
        environment.add_last(MapPropertySource::from_pairs(
            "commandLineArgs",
            [(APPLICATION_NAME, "cli-name")],
        ));

        BasicProperties::new("orders", Mode::Dev).apply_to(&mut environment);
        environment.add_last(MapPropertySource::from_pairs("late", [("k", "v")]));
        BasicProperties::new("orders", Mode::Test).apply_to(&mut environment);

        assert_eq!(
            environment.source_names(),
            vec!["commandLineArgs", "late", BASIC_PROPERTIES_SOURCE]
        );
        assert_eq!(environment.property(APPLICATION_NAME).as_deref(), Some("cli-name"));
        assert_eq!(environment.property(PROFILES_ACTIVE).as_deref(), Some("test"));
    }

    #[test]
    fn test_host_settings_from_basic_layer() {
        let mut environment = Environment::new();
        BasicProperties::new("orders", Mode::Dev).apply_to(&mut environment);

        let settings = HostSettings::from_environment(&environment).unwrap();
        assert_eq!(settings.application_name, "orders");
        assert_eq!(settings.port, DEFAULT_SERVER_PORT);
        assert_eq!(settings.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(settings.shutdown_mode, ShutdownMode::Graceful);
        assert_eq!(settings.grace_period, Duration::from_secs(20));
        assert_eq!(settings.drain_timeout(), Duration::from_secs(20));
        assert!(settings.health_probes_enabled);
    }

    #[test]
    fn test_host_settings_rejects_invalid_values() {
        let mut environment = Environment::new();
        environment.add_first(MapPropertySource::from_pairs(
            "commandLineArgs",
            [(SERVER_PORT, "http")],
        ));
        let err = HostSettings::from_environment(&environment).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidProperty { ref key, .. } if key == SERVER_PORT
        ));

        environment.add_first(MapPropertySource::from_pairs(
            "commandLineArgs",
            [(SERVER_SHUTDOWN, "never")],
        ));
        assert!(HostSettings::from_environment(&environment).is_err());
    }

    #[test]
    fn test_immediate_shutdown_has_no_drain() {
        let mut environment = Environment::new();
        environment.add_first(MapPropertySource::from_pairs(
            "commandLineArgs",
            [(SERVER_SHUTDOWN, "immediate"), (SHUTDOWN_GRACE_PERIOD, "30s")],
        ));
        let settings = HostSettings::from_environment(&environment).unwrap();
        assert_eq!(settings.drain_timeout(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("20s").unwrap(), Duration::from_secs(20));
        assert_eq!(parse_duration(" 15 ").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("10d").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_overflow() {
        let max = u64::MAX.to_string();
        assert_eq!(
            parse_duration(&format!("{max}m")).unwrap_err(),
            "numeric value out of range"
        );
        assert_eq!(
            parse_duration(&format!("{max}h")).unwrap_err(),
            "numeric value out of range"
        );
        assert_eq!(parse_duration(&format!("{max}s")).unwrap(), Duration::from_secs(u64::MAX));
        assert!(parse_duration("184467440737095516160").is_err());
    }

    #[test]
    fn test_oversized_grace_period_is_invalid_property() {
        let mut environment = Environment::new();
        BasicProperties::new("orders", Mode::Dev).apply_to(&mut environment);
        environment.add_first(MapPropertySource::from_pairs(
            "commandLineArgs",
            [(SHUTDOWN_GRACE_PERIOD, "9999999999999999h")],
        ));

        let err = HostSettings::from_environment(&environment).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidProperty { ref key, .. } if key == SHUTDOWN_GRACE_PERIOD
        ));
    }
}
