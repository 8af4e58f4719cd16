//! Connection and client configuration.
//!
//! The values are owned and loaded by the embedding application; this
//! module only describes their shape and offers a validation pass.

use std::time::Duration;

use thiserror::Error;

/// Default interval between keepalive PINGs.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_millis(30_000);

/// Farewell sent with `QUIT` when the session closes.
pub const DEFAULT_QUIT_MESSAGE: &str = "Leaving";

/// The parameters needed to reach and register with a server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Username (ident); the nickname is used when absent.
    pub username: Option<String>,
    /// Server password, sent with `PASS` when non-empty.
    pub password: Option<String>,
    /// Desired nickname.
    pub nickname: String,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16, nickname: impl Into<String>) -> Self {
        ConnectionConfig {
            host: host.into(),
            port,
            username: None,
            password: None,
            nickname: nickname.into(),
        }
    }

    /// Check that the configuration can be used to connect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.nickname.trim().is_empty() {
            return Err(ConfigError::MissingNickname);
        }
        if self.nickname.contains(' ') {
            return Err(ConfigError::InvalidNickname(self.nickname.clone()));
        }
        Ok(())
    }

    /// Username for `USER`, falling back to the nickname.
    pub fn username_or_nick(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.nickname)
    }

    /// Server password, if one is configured and non-empty.
    pub fn server_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Tunables for the client core.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Interval between keepalive PINGs.
    pub ping_interval: Duration,
    /// Timeout for opening the TCP connection.
    pub connect_timeout: Duration,
    /// Timeout for a single socket write.
    pub write_timeout: Duration,
    /// TCP keepalive idle time; `None` disables it.
    pub tcp_keepalive: Option<Duration>,
    /// Message sent with `QUIT`.
    pub quit_message: String,
    /// Text returned for CTCP VERSION queries.
    pub version_reply: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            ping_interval: DEFAULT_PING_INTERVAL,
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            tcp_keepalive: Some(Duration::from_secs(120)),
            quit_message: DEFAULT_QUIT_MESSAGE.to_string(),
            version_reply: concat!("slirc-client ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Problems found by [`ConnectionConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("server host is not set")]
    MissingHost,
    #[error("server port must be non-zero")]
    InvalidPort,
    #[error("nickname is not set")]
    MissingNickname,
    #[error("invalid nickname: {0:?}")]
    InvalidNickname(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ConnectionConfig::new("irc.example.com", 6667, "jeb").validate().is_ok());
        assert_eq!(
            ConnectionConfig::new("", 6667, "jeb").validate(),
            Err(ConfigError::MissingHost)
        );
        assert_eq!(
            ConnectionConfig::new("irc.example.com", 0, "jeb").validate(),
            Err(ConfigError::InvalidPort)
        );
        assert_eq!(
            ConnectionConfig::new("irc.example.com", 6667, " ").validate(),
            Err(ConfigError::MissingNickname)
        );
        assert!(matches!(
            ConnectionConfig::new("irc.example.com", 6667, "jeb kerman").validate(),
            Err(ConfigError::InvalidNickname(_))
        ));
    }

    #[test]
    fn test_username_fallback() {
        let mut config = ConnectionConfig::new("irc.example.com", 6667, "jeb");
        assert_eq!(config.username_or_nick(), "jeb");
        config.username = Some(String::new());
        assert_eq!(config.username_or_nick(), "jeb");
        config.username = Some("jebediah".to_string());
        assert_eq!(config.username_or_nick(), "jebediah");
    }

    #[test]
    fn test_empty_password_is_absent() {
        let mut config = ConnectionConfig::new("irc.example.com", 6667, "jeb");
        config.password = Some(String::new());
        assert_eq!(config.server_password(), None);
        config.password = Some("hunter2".to_string());
        assert_eq!(config.server_password(), Some("hunter2"));
    }

    #[test]
    fn test_default_ping_interval() {
        assert_eq!(ClientConfig::default().ping_interval, Duration::from_secs(30));
    }
}
