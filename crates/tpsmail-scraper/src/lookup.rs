//! End-to-end email lookup: search, pick a record, scan it for addresses.

use std::fmt;

use reqwest::Url;
use serde::Serialize;
use tpsmail_core::{Query, ResolvedQuery, SiteConfig};

use crate::client::{FetchOptions, ProxyClient};
use crate::detail::{resolve_detail_url, LinkPolicy};
use crate::emails::{emails_or_sentinel, extract_emails};
use crate::error::{InvalidSiteOrigin, LookupError};
use crate::search::build_search_url;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    ValidateInput,
    FetchResults,
    ResolveDetailLink,
    FetchDetail,
    ExtractEmails,
    Done,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupStage::ValidateInput => "validate_input",
            LookupStage::FetchResults => "fetch_results",
            LookupStage::ResolveDetailLink => "resolve_detail_link",
            LookupStage::FetchDetail => "fetch_detail",
            LookupStage::ExtractEmails => "extract_emails",
            LookupStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Successful lookup payload. `emails` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub query: ResolvedQuery,
    pub emails: Vec<String>,
}

/// Site-specific settings for [`EmailLookup`].
#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub site_origin: Url,
    pub operator_domain: String,
    pub fetch_options: FetchOptions,
    pub link_policy: LinkPolicy,
}

impl LookupSettings {
    /// Settings for `site` using the default text-match link policy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSiteOrigin`] if `site.origin` is not a valid URL.
    pub fn from_site(
        site: &SiteConfig,
        fetch_options: FetchOptions,
    ) -> Result<Self, InvalidSiteOrigin> {
        let site_origin = Url::parse(&site.origin).map_err(|e| InvalidSiteOrigin {
            origin: site.origin.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            site_origin,
            operator_domain: site.operator_domain.clone(),
            fetch_options,
            link_policy: LinkPolicy::default(),
        })
    }
}

/// Runs lookups against one people-search site through one proxy client.
///
/// Holds no per-request state; a single instance serves concurrent callers.
#[derive(Debug)]
pub struct EmailLookup {
    client: ProxyClient,
    settings: LookupSettings,
}

impl EmailLookup {
    #[must_use]
    pub fn new(client: ProxyClient, settings: LookupSettings) -> Self {
        Self { client, settings }
    }

    /// Looks up email addresses for `query`.
    ///
    /// Makes exactly two proxied requests on success and none when the name
    /// is blank. The first failing stage ends the lookup.
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidInput`] if the name is blank.
    /// - [`LookupError::Fetch`] if either proxied request fails.
    /// - [`LookupError::DetailLinkNotFound`] if the results page has no detail link.
    /// - [`LookupError::InvalidDetailLink`] if the detail link cannot be made absolute.
    #[tracing::instrument(level = "debug", skip_all, fields(name = query.name()))]
    pub async fn lookup(&self, query: &Query) -> Result<LookupOutcome, LookupError> {
        tracing::debug!(stage = %LookupStage::ValidateInput);
        if !query.has_name() {
            return Err(LookupError::InvalidInput);
        }

        let results_url = build_search_url(&self.settings.site_origin, query);
        tracing::debug!(stage = %LookupStage::FetchResults, %results_url);
        let results_html = self
            .client
            .fetch(results_url.as_str(), &self.settings.fetch_options)
            .await
            .map_err(|source| LookupError::Fetch {
                stage: LookupStage::FetchResults,
                source,
            })?;

        tracing::debug!(stage = %LookupStage::ResolveDetailLink);
        let detail_url = resolve_detail_url(
            &results_html,
            results_url.as_str(),
            &self.settings.site_origin,
            self.settings.link_policy,
        )?;

        tracing::debug!(stage = %LookupStage::FetchDetail, %detail_url);
        let detail_html = self
            .client
            .fetch(detail_url.as_str(), &self.settings.fetch_options)
            .await
            .map_err(|source| LookupError::Fetch {
                stage: LookupStage::FetchDetail,
                source,
            })?;

        tracing::debug!(stage = %LookupStage::ExtractEmails);
        let emails = extract_emails(&detail_html, &self.settings.operator_domain);
        tracing::info!(
            stage = %LookupStage::Done,
            found = emails.len(),
            "email lookup complete"
        );

        Ok(LookupOutcome {
            query: query.resolved(),
            emails: emails_or_sentinel(emails),
        })
    }
}
