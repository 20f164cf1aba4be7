//! HTTP client for the scrape.do anti-blocking proxy.

mod encode;

use std::time::Duration;

use reqwest::{Client, Url};
use tpsmail_core::ProxyConfig;

use crate::error::ProxyError;

#[cfg(test)]
use encode::{encode_opaque, proxy_request_url, redacted_request_url};

pub(super) const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Per-request proxy options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Country the proxy should exit from (`geoCode`).
    pub geo_code: String,
    /// Residential/anti-bot mode (`super`).
    pub super_proxy: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            geo_code: "us".to_string(),
            super_proxy: true,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            geo_code: config.geo_code.clone(),
            super_proxy: config.super_proxy,
        }
    }
}

/// Fetches arbitrary target URLs through the scraping proxy.
///
/// One attempt per call: a timeout, transport failure or non-2xx response is
/// returned as-is and never retried. The proxy token is fixed at
/// construction and never logged.
pub struct ProxyClient {
    client: Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyClient")
            .field("token", &encode::REDACTED_TOKEN)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProxyClient {
    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::MissingToken`] if the token is blank.
    /// - [`ProxyError::InvalidBaseUrl`] if the proxy base URL does not parse.
    /// - [`ProxyError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        Self::with_base_url(&config.token, config.timeout_secs, &config.base_url)
    }

    /// Creates a client against a custom proxy endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`ProxyClient::new`].
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProxyError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ProxyError::MissingToken);
        }

        let normalised = base_url.trim().trim_end_matches('/');
        Url::parse(normalised).map_err(|e| ProxyError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(BROWSER_UA)
            .build()?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: normalised.to_owned(),
        })
    }

    /// Fetches `target_url` through the proxy and returns the raw body text.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::Timeout`] if the configured timeout elapses.
    /// - [`ProxyError::FetchFailed`] on any non-2xx proxy response.
    /// - [`ProxyError::Http`] on any other network or TLS failure.
    pub async fn fetch(
        &self,
        target_url: &str,
        options: &FetchOptions,
    ) -> Result<String, ProxyError> {
        let url = encode::proxy_request_url(&self.base_url, &self.token, target_url, options);
        tracing::debug!(
            target_url,
            proxy_url = %encode::redacted_request_url(&self.base_url, target_url, options),
            "fetching through proxy"
        );

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| classify(e, target_url))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(target_url, status = status.as_u16(), "proxy returned non-2xx");
            return Err(ProxyError::FetchFailed {
                status: status.as_u16(),
                target: target_url.to_owned(),
            });
        }

        let body = response.text().await.map_err(|e| classify(e, target_url))?;
        tracing::debug!(target_url, bytes = body.len(), "proxy fetch complete");
        Ok(body)
    }
}

fn classify(err: reqwest::Error, target_url: &str) -> ProxyError {
    if err.is_timeout() {
        ProxyError::Timeout {
            target: target_url.to_owned(),
        }
    } else {
        ProxyError::Http(err)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
