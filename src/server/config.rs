use std::time::Duration;

use mac_address::MacAddress;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 9001;
pub const DEFAULT_COMMAND: &str = "wakeonlan";
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub const TARGET_MAC_VAR: &str = "WOL_TARGET_MAC";
pub const BROADCAST_ADDRESS_VAR: &str = "WOL_BROADCAST_ADDRESS";
pub const PORT_VAR: &str = "PORT";
pub const COMMAND_VAR: &str = "WOL_COMMAND";
pub const COMMAND_TIMEOUT_VAR: &str = "WOL_COMMAND_TIMEOUT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("WOL_COMMAND_TIMEOUT must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Settings read once at startup. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target_mac: Option<String>,
    pub broadcast_address: Option<String>,
    pub port: u16,
    pub command: String,
    /// `None` waits for the tool indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_mac: None,
            broadcast_address: None,
            port: DEFAULT_PORT,
            command: DEFAULT_COMMAND.to_string(),
            command_timeout: Some(DEFAULT_COMMAND_TIMEOUT),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset;
    /// text values are otherwise taken verbatim, numbers may be padded.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let number = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        let port = match number(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let command_timeout = match number(COMMAND_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Some(DEFAULT_COMMAND_TIMEOUT),
        };

        Ok(Config {
            target_mac: var(TARGET_MAC_VAR),
            broadcast_address: var(BROADCAST_ADDRESS_VAR),
            port,
            command: var(COMMAND_VAR).unwrap_or_else(|| DEFAULT_COMMAND.to_string()),
            command_timeout,
        })
    }

    /// Logs anything that will make requests fail, without refusing to start.
    pub fn log_warnings(&self) {
        match &self.target_mac {
            None => tracing::error!(
                "WOL_TARGET_MAC is not set, every request to the webhook will fail"
            ),
            Some(mac) => {
                if mac.parse::<MacAddress>().is_err() {
                    tracing::warn!(%mac, "WOL_TARGET_MAC does not look like a MAC address");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 9001);
        assert_eq!(config.command, "wakeonlan");
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("WOL_TARGET_MAC", "AA:BB:CC:DD:EE:FF"),
            ("WOL_BROADCAST_ADDRESS", "192.168.1.255"),
            ("PORT", "8080"),
            ("WOL_COMMAND", "/usr/local/bin/wakeonlan"),
            ("WOL_COMMAND_TIMEOUT", "5"),
        ])
        .unwrap();

        assert_eq!(config.target_mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(config.broadcast_address.as_deref(), Some("192.168.1.255"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.command, "/usr/local/bin/wakeonlan");
        assert_eq!(config.command_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config_from(&[
            ("WOL_TARGET_MAC", ""),
            ("WOL_BROADCAST_ADDRESS", ""),
            ("WOL_COMMAND", ""),
            ("PORT", ""),
            ("WOL_COMMAND_TIMEOUT", ""),
        ])
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn whitespace_text_is_kept_verbatim() {
        let config = config_from(&[
            ("WOL_TARGET_MAC", "   "),
            ("WOL_BROADCAST_ADDRESS", "  "),
        ])
        .unwrap();

        assert_eq!(config.target_mac.as_deref(), Some("   "));
        assert_eq!(config.broadcast_address.as_deref(), Some("  "));
    }

    #[test]
    fn whitespace_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "  "), ("WOL_COMMAND_TIMEOUT", " ")]).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.command_timeout, Some(DEFAULT_COMMAND_TIMEOUT));
    }

    #[test]
    fn padded_port_is_accepted() {
        let config = config_from(&[("PORT", " 8080 ")]).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn malformed_mac_is_kept() {
        let config = config_from(&[("WOL_TARGET_MAC", "not-a-mac")]).unwrap();

        config.log_warnings();
        assert_eq!(config.target_mac.as_deref(), Some("not-a-mac"));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = config_from(&[("WOL_COMMAND_TIMEOUT", "0")]).unwrap();
        assert_eq!(config.command_timeout, None);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            config_from(&[("PORT", "ninety")]),
            Err(ConfigError::InvalidPort("ninety".to_string()))
        );
        assert_eq!(
            config_from(&[("PORT", "70000")]),
            Err(ConfigError::InvalidPort("70000".to_string()))
        );
        assert_eq!(
            config_from(&[("WOL_COMMAND_TIMEOUT", "-1")]),
            Err(ConfigError::InvalidTimeout("-1".to_string()))
        );
    }
}
