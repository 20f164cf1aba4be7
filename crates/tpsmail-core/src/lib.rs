pub mod app_config;
pub mod config;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, ProxyConfig, SiteConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use query::{Query, ResolvedQuery};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
