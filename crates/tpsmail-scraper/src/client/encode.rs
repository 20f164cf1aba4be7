//! Proxy request URL construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::FetchOptions;

/// Everything except RFC 3986 unreserved characters is escaped, so the target
/// URL travels as one opaque query value (`?`, `&`, `=`, `/` all encoded).
const OPAQUE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(super) const REDACTED_TOKEN: &str = "[redacted]";

#[must_use]
pub(super) fn encode_opaque(value: &str) -> String {
    utf8_percent_encode(value, OPAQUE_VALUE).to_string()
}

/// Builds `<base>/?token=..&url=..&geoCode=..&super=..`.
///
/// `base` must already have its trailing slash trimmed.
pub(super) fn proxy_request_url(
    base: &str,
    token: &str,
    target_url: &str,
    options: &FetchOptions,
) -> String {
    render(base, &encode_opaque(token), target_url, options)
}

/// Same shape as [`proxy_request_url`] with the token replaced, for logs.
pub(super) fn redacted_request_url(base: &str, target_url: &str, options: &FetchOptions) -> String {
    render(base, REDACTED_TOKEN, target_url, options)
}

fn render(base: &str, token_value: &str, target_url: &str, options: &FetchOptions) -> String {
    format!(
        "{base}/?token={token_value}&url={url}&geoCode={geo}&super={super_proxy}",
        url = encode_opaque(target_url),
        geo = encode_opaque(&options.geo_code),
        super_proxy = options.super_proxy,
    )
}
