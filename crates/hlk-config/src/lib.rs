//! Configuration for the HLK-SW16 relay service
//!
//! All settings come from environment variables and are read exactly once at
//! startup into a [`ServiceConfig`], which is then shared with the handlers.
//! Unset or empty variables fall back to the defaults below.
//!
//! | Variable | Default |
//! |---|---|
//! | `HLK_SW16_HOST` | `192.168.0.200` |
//! | `HLK_SW16_PORT` | `8080` |
//! | `MQTT_SENDER_HOST` | unset, notifications disabled |
//! | `NOTIFIER_STRICT` | `true` |
//! | `HLK_BIND_ADDR` | `0.0.0.0:8080` |
//! | `HLK_STATUS_ATTEMPTS` | `10` |
//! | `HLK_STATUS_RETRY_DELAY_MS` | `1` |
//! | `HLK_CONNECT_TIMEOUT_MS` | `5000` |
//! | `HLK_IO_TIMEOUT_MS` | `5000` |

mod error;
mod service_config;

pub use error::{ConfigError, ConfigResult};
pub use service_config::{env_keys, ServiceConfig};
