use thiserror::Error;

use crate::lookup::LookupStage;

/// Failures of a single proxied fetch.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("scraping proxy token is missing or blank")]
    MissingToken,

    #[error("invalid proxy base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("proxy request for {target} timed out")]
    Timeout { target: String },

    #[error("proxy returned HTTP {status} for {target}")]
    FetchFailed { status: u16, target: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures while turning a results page into a detail-page URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no detail link found in results page")]
    NotFound,

    #[error("detail link \"{href}\" could not be resolved: {reason}")]
    InvalidHref { href: String, reason: String },
}

#[derive(Debug, Error)]
#[error("invalid site origin \"{origin}\": {reason}")]
pub struct InvalidSiteOrigin {
    pub origin: String,
    pub reason: String,
}

/// Terminal failure of a lookup. Every variant aborts the pipeline.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("missing 'name'")]
    InvalidInput,

    #[error("{stage} failed: {source}")]
    Fetch {
        stage: LookupStage,
        #[source]
        source: ProxyError,
    },

    #[error("no detail link found")]
    DetailLinkNotFound,

    #[error("detail link \"{href}\" could not be resolved: {reason}")]
    InvalidDetailLink { href: String, reason: String },
}

impl LookupError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            LookupError::Fetch {
                source: ProxyError::Timeout { .. },
                ..
            }
        )
    }
}

impl From<ResolveError> for LookupError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => LookupError::DetailLinkNotFound,
            ResolveError::InvalidHref { href, reason } => {
                LookupError::InvalidDetailLink { href, reason }
            }
        }
    }
}
