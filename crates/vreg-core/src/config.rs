// ── Runtime registry configuration ──
//
// Describes where the registry backend lives and how to talk to it. Built by
// the presentation layer and handed in; core never reads files or the
// process environment.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use vreg_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one registry backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Backend base URL (e.g. `https://registry.example.com`).
    pub base_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout enforced by the HTTP transport.
    pub timeout: Duration,
}

impl RegistryConfig {
    pub const DEFAULT_TIMEOUT: Duration = TransportConfig::DEFAULT_TIMEOUT;

    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// `https://<hostname>` with default TLS and timeout.
    pub fn from_hostname(hostname: &str) -> Result<Self, url::ParseError> {
        Url::parse(&format!("https://{hostname}")).map(Self::new)
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::new(tls, self.timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hostname_defaults_to_https() {
        let config = RegistryConfig::from_hostname("registry.example.com").unwrap();
        assert_eq!(config.base_url.as_str(), "https://registry.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn transport_mirrors_tls_choice() {
        let mut config = RegistryConfig::from_hostname("localhost:8443").unwrap();
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert_eq!(
            transport,
            TransportConfig::new(TlsMode::DangerAcceptInvalid, Duration::from_secs(5))
        );
    }
}
