use std::net::SocketAddr;

/// Settings for the scraping proxy that fronts every outbound fetch.
#[derive(Clone)]
pub struct ProxyConfig {
    pub token: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub geo_code: String,
    pub super_proxy: bool,
}

/// The people-search site being queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub origin: String,
    /// Addresses on this domain belong to the site operator, not the person.
    pub operator_domain: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub proxy: ProxyConfig,
    pub site: SiteConfig,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("token", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("geo_code", &self.geo_code)
            .field("super_proxy", &self.super_proxy)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("proxy", &self.proxy)
            .field("site", &self.site)
            .finish()
    }
}
