//! Service configuration loaded from the environment

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable names
pub mod env_keys {
    pub const DEVICE_HOST: &str = "HLK_SW16_HOST";
    pub const DEVICE_PORT: &str = "HLK_SW16_PORT";
    pub const NOTIFIER_HOST: &str = "MQTT_SENDER_HOST";
    pub const NOTIFIER_STRICT: &str = "NOTIFIER_STRICT";
    pub const BIND_ADDR: &str = "HLK_BIND_ADDR";
    pub const STATUS_ATTEMPTS: &str = "HLK_STATUS_ATTEMPTS";
    pub const STATUS_RETRY_DELAY_MS: &str = "HLK_STATUS_RETRY_DELAY_MS";
    pub const CONNECT_TIMEOUT_MS: &str = "HLK_CONNECT_TIMEOUT_MS";
    pub const IO_TIMEOUT_MS: &str = "HLK_IO_TIMEOUT_MS";
}

/// Runtime configuration shared by the server and its handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Relay board host name or address
    pub device_host: String,

    /// Relay board TCP port
    pub device_port: u16,

    /// `host[:port]` of the message bus ingress; `None` disables notifications
    pub notifier_host: Option<String>,

    /// Fail the switch request when publishing the notification fails.
    /// When unset, the failure is reported as a warning next to the new states.
    pub notifier_strict: bool,

    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Maximum number of status reads before giving up on a stable frame
    pub status_attempts: u32,

    /// Pause between status reads
    pub status_retry_delay: Duration,

    /// Timeout for opening the device connection
    pub connect_timeout: Duration,

    /// Timeout for a single read or write on the device connection
    pub io_timeout: Duration,
}

fn default_device_host() -> String {
    "192.168.0.200".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const DEFAULT_DEVICE_PORT: u16 = 8080;
const DEFAULT_STATUS_ATTEMPTS: u32 = 10;
const DEFAULT_STATUS_RETRY_DELAY: Duration = Duration::from_millis(1);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            device_host: default_device_host(),
            device_port: DEFAULT_DEVICE_PORT,
            notifier_host: None,
            notifier_strict: true,
            bind_addr: default_bind_addr(),
            status_attempts: DEFAULT_STATUS_ATTEMPTS,
            status_retry_delay: DEFAULT_STATUS_RETRY_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let status_attempts = parse_or(&get, env_keys::STATUS_ATTEMPTS, defaults.status_attempts)?;
        if status_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: env_keys::STATUS_ATTEMPTS.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let config = Self {
            device_host: get(env_keys::DEVICE_HOST).unwrap_or(defaults.device_host),
            device_port: parse_or(&get, env_keys::DEVICE_PORT, defaults.device_port)?,
            notifier_host: get(env_keys::NOTIFIER_HOST),
            notifier_strict: parse_bool_or(&get, env_keys::NOTIFIER_STRICT, defaults.notifier_strict)?,
            bind_addr: get(env_keys::BIND_ADDR).unwrap_or(defaults.bind_addr),
            status_attempts,
            status_retry_delay: parse_millis_or(
                &get,
                env_keys::STATUS_RETRY_DELAY_MS,
                defaults.status_retry_delay,
            )?,
            connect_timeout: parse_millis_or(
                &get,
                env_keys::CONNECT_TIMEOUT_MS,
                defaults.connect_timeout,
            )?,
            io_timeout: parse_millis_or(&get, env_keys::IO_TIMEOUT_MS, defaults.io_timeout)?,
        };

        debug!(?config, "Loaded service configuration");
        Ok(config)
    }

    /// `host:port` of the relay board
    pub fn device_addr(&self) -> String {
        format!("{}:{}", self.device_host, self.device_port)
    }

    /// Publish endpoint of the notifier, if configured
    pub fn notifier_url(&self) -> Option<String> {
        self.notifier_host
            .as_ref()
            .map(|host| format!("http://{}/publish", host))
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn parse_millis_or<G>(get: &G, key: &str, default: Duration) -> ConfigResult<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    let millis = parse_or(get, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(millis))
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> ConfigResult<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' is not a boolean", raw),
            }),
        },
        None => Ok(default),
    }
}
