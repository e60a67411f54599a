// ── HTTP transport ──
//
// Turns the registry's TLS and timeout settings into a `reqwest::Client`.
// Every request asks for JSON and identifies itself as vreg.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::ClientBuilder;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::warn;

use crate::error::Error;

const USER_AGENT: &str = concat!("vreg/", env!("CARGO_PKG_VERSION"));

/// Upper bound on establishing a connection, within the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the client verifies the registry's certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Trust the CA certificate in the given PEM file as well.
    CustomCa(PathBuf),
    /// Accept any certificate (development backends with self-signed certs).
    DangerAcceptInvalid,
}

impl TlsMode {
    fn configure(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        match self {
            Self::System => Ok(builder),
            Self::CustomCa(path) => Ok(builder.add_root_certificate(load_ca(path)?)),
            Self::DangerAcceptInvalid => {
                warn!("certificate verification is disabled for the registry connection");
                Ok(builder.danger_accept_invalid_certs(true))
            }
        }
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("invalid CA cert {}: {e}", path.display())))
}

/// TLS and timeout settings for talking to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout, connection included.
    pub timeout: Duration,
}

impl TransportConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(tls: TlsMode, timeout: Duration) -> Self {
        Self { tls, timeout }
    }

    fn connect_timeout(&self) -> Duration {
        self.timeout.min(CONNECT_TIMEOUT)
    }

    /// Build the `reqwest::Client` every registry service shares.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout());

        self.tls
            .configure(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new(TlsMode::default(), Self::DEFAULT_TIMEOUT)
    }
}
