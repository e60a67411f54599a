// HTTP client for the Vehicle Registry REST API.
//
// Base URL: https://<api hostname>/
// Resources: /vehicles, /drivers, /logs

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, classify_error};
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the registry backend.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport settings.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: Self::normalize_base_url(base_url),
        }
    }

    /// Parse `raw` and wrap an existing `reqwest::Client`.
    pub fn from_reqwest(raw: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(raw)?;
        Ok(Self::with_client(&base_url, http))
    }

    /// Base URL with a trailing slash so resource paths join beneath it.
    fn normalize_base_url(raw: &Url) -> Url {
        let mut url = raw.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn resource_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let mut builder = self.http.get(url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        trace!(body = ?serde_json::to_string(body).ok(), "request body");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        trace!(body = ?serde_json::to_string(body).ok(), "request body");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        trace!(status = status.as_u16(), body = %raw, "error response");
        classify_error(status.as_u16(), &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(raw: &str) -> RegistryClient {
        RegistryClient::from_reqwest(raw, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(
            client("https://api.example.com").base_url().as_str(),
            "https://api.example.com/"
        );
        assert_eq!(
            client("https://api.example.com/v2").base_url().as_str(),
            "https://api.example.com/v2/"
        );
    }

    #[test]
    fn resource_url_joins_segments() {
        let c = client("https://api.example.com/v2/");
        let url = c.resource_url(&["vehicles", "HND-1024"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/vehicles/HND-1024");
    }

    #[test]
    fn resource_url_encodes_keys() {
        let c = client("https://api.example.com");
        let url = c.resource_url(&["drivers", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/drivers/a%2Fb%20c");
    }
}
