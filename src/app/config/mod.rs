mod cli;
mod merge;
mod validation;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Verbosity of the tool's own diagnostics (stderr), not of the GELF record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Socket type used to reach the GELF input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP over IPv4 or IPv6 (default)
    #[default]
    Tcp,
    /// TCP over IPv4 only
    Tcp4,
    /// TCP over IPv6 only
    Tcp6,
    /// Connected UDP socket, one datagram per message
    Udp,
}

impl Protocol {
    /// Whether a resolved address belongs to the address family this protocol dials.
    pub fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            Protocol::Tcp | Protocol::Udp => true,
            Protocol::Tcp4 => addr.is_ipv4(),
            Protocol::Tcp6 => addr.is_ipv6(),
        }
    }
}

pub use crate::domain::TimestampPrecision;
pub use cli::Config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_address_family() {
        let v4: SocketAddr = "127.0.0.1:12201".parse().unwrap();
        let v6: SocketAddr = "[::1]:12201".parse().unwrap();

        assert!(Protocol::Tcp.accepts(&v4));
        assert!(Protocol::Tcp.accepts(&v6));
        assert!(Protocol::Udp.accepts(&v6));
        assert!(Protocol::Tcp4.accepts(&v4));
        assert!(!Protocol::Tcp4.accepts(&v6));
        assert!(Protocol::Tcp6.accepts(&v6));
        assert!(!Protocol::Tcp6.accepts(&v4));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
