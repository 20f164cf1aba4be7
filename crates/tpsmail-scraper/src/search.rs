//! Search-results URL construction.

use reqwest::Url;
use tpsmail_core::Query;

pub const RESULTS_PATH: &str = "/results";

/// Builds the results-page URL for `query` on the site at `site_origin`.
///
/// Parameters are form-encoded (`Jane Doe` → `Jane+Doe`, `,` → `%2C`) in a
/// fixed order, so the same query always yields the same string.
#[must_use]
pub fn build_search_url(site_origin: &Url, query: &Query) -> Url {
    let mut url = site_origin.clone();
    url.set_path(RESULTS_PATH);
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("name", query.name());
        if let Some(location) = query.search_location() {
            pairs.append_pair("citystatezip", &location);
        }
    }
    url
}
