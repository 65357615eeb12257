//! Export server connection settings

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Default export server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default export server port
pub const DEFAULT_PORT: u16 = 1337;

/// Where the export server listens
///
/// Immutable once handed to an [`ExportManager`](crate::core::ExportManager);
/// every export made through that manager uses the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    is_secure: bool,
}

impl ConnectionConfig {
    /// Creates a connection config
    pub fn new(host: impl Into<String>, port: u16, is_secure: bool) -> Self {
        Self {
            host: host.into(),
            port,
            is_secure,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Host as written in a URL; IPv6 literals are bracketed
    pub fn url_host(&self) -> Cow<'_, str> {
        if self.host.contains(':') && !self.host.starts_with('[') {
            Cow::Owned(format!("[{}]", self.host))
        } else {
            Cow::Borrowed(&self.host)
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.is_secure
    }

    /// URL scheme matching the secure flag
    pub fn scheme(&self) -> &'static str {
        if self.is_secure {
            "https"
        } else {
            "http"
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, false)
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme(), self.url_host(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let connection = ConnectionConfig::default();
        assert_eq!(connection.host(), "127.0.0.1");
        assert_eq!(connection.port(), 1337);
        assert!(!connection.is_secure());
    }

    #[test]
    fn test_display_uses_scheme() {
        let insecure = ConnectionConfig::new("export.local", 8080, false);
        let secure = ConnectionConfig::new("export.local", 8443, true);

        assert_eq!(insecure.to_string(), "http://export.local:8080");
        assert_eq!(secure.to_string(), "https://export.local:8443");
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let connection = ConnectionConfig::new("::1", 1337, false);
        assert_eq!(connection.host(), "::1");
        assert_eq!(connection.to_string(), "http://[::1]:1337");

        let bracketed = ConnectionConfig::new("[fe80::1]", 8443, true);
        assert_eq!(bracketed.to_string(), "https://[fe80::1]:8443");
    }
}
