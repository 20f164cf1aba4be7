//! Email-token extraction from raw detail-page markup.
//!
//! The markup is scanned as plain text, not as a DOM, so addresses inside
//! `mailto:` hrefs, inline scripts and embedded JSON are found as well as
//! visible ones. The pattern is deliberately loose and may pick up trailing
//! dots or hyphens.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Placeholder returned in place of an empty result list.
pub const NOT_AVAILABLE: &str = "not available";

static EMAIL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid email regex"));

/// Returns every email-shaped token in `markup`, sorted and deduplicated,
/// minus addresses whose domain equals `operator_domain` (case-insensitive).
#[must_use]
pub fn extract_emails(markup: &str, operator_domain: &str) -> Vec<String> {
    let found: BTreeSet<&str> = EMAIL_TOKEN_RE
        .find_iter(markup)
        .map(|m| m.as_str())
        .collect();

    found
        .into_iter()
        .filter(|email| !is_operator_address(email, operator_domain))
        .map(ToOwned::to_owned)
        .collect()
}

/// Substitutes `["not available"]` for an empty list.
#[must_use]
pub fn emails_or_sentinel(emails: Vec<String>) -> Vec<String> {
    if emails.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        emails
    }
}

fn is_operator_address(email: &str, operator_domain: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case(operator_domain))
}
