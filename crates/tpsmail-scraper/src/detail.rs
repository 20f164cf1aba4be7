//! Detail-record link selection on a results page.
//!
//! The results page lists several candidate people; each links to a per-record
//! detail page. Only the first matching link in document order is followed.
//! There is no ranking, so the chosen record is not guaranteed to be the
//! person being searched for.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::ResolveError;

pub const VIEW_DETAILS_TEXT: &str = "View Details";
pub const DETAIL_PATH_PREFIX: &str = "/find/person/";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// How a detail-record anchor is recognised among all anchors on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Visible anchor text contains `View Details`.
    #[default]
    TextMatch,
    /// `href` starts with `/find/person/`.
    PathMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLinkCandidate {
    pub href: String,
    pub link_text: String,
}

impl LinkPolicy {
    fn matches(self, href: &str, text: &str) -> bool {
        match self {
            LinkPolicy::TextMatch => text.contains(VIEW_DETAILS_TEXT),
            LinkPolicy::PathMatch => href.trim_start().starts_with(DETAIL_PATH_PREFIX),
        }
    }
}

/// Returns every anchor matching `policy`, in document order.
#[must_use]
pub fn find_detail_candidates(html: &str, policy: LinkPolicy) -> Vec<DetailLinkCandidate> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let text: String = anchor.text().collect();
            policy.matches(href, &text).then(|| DetailLinkCandidate {
                href: href.to_string(),
                link_text: text.trim().to_string(),
            })
        })
        .collect()
}

/// Picks the first detail link on a results page and makes it absolute.
///
/// The href is resolved against `site_origin`. If it carries no query string of
/// its own, the query of `results_url` is appended so the detail request keeps
/// the search context that identifies the record.
///
/// # Errors
///
/// - [`ResolveError::NotFound`] when no anchor matches `policy`.
/// - [`ResolveError::InvalidHref`] when the chosen href is not a usable http(s) URL.
pub fn resolve_detail_url(
    results_html: &str,
    results_url: &str,
    site_origin: &Url,
    policy: LinkPolicy,
) -> Result<Url, ResolveError> {
    let candidates = find_detail_candidates(results_html, policy);
    tracing::debug!(
        ?policy,
        count = candidates.len(),
        hrefs = ?candidates.iter().map(|c| c.href.as_str()).collect::<Vec<_>>(),
        "detail link candidates"
    );

    let chosen = candidates.into_iter().next().ok_or(ResolveError::NotFound)?;
    let href = chosen.href.trim();

    let resolved = site_origin
        .join(href)
        .map_err(|e| ResolveError::InvalidHref {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(ResolveError::InvalidHref {
            href: href.to_string(),
            reason: format!("unsupported scheme \"{}\"", resolved.scheme()),
        });
    }

    Ok(complete_query(resolved, results_url))
}

/// Appends the query string of `results_url` (everything after its first `?`)
/// when `detail` has none. An existing query, even an empty one, is kept.
#[must_use]
pub fn complete_query(mut detail: Url, results_url: &str) -> Url {
    if detail.query().is_some() {
        return detail;
    }
    if let Some((_, query)) = results_url.split_once('?') {
        let query = query.split_once('#').map_or(query, |(q, _)| q);
        if !query.is_empty() {
            detail.set_query(Some(query));
        }
    }
    detail
}
