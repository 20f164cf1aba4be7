pub mod client;
pub mod detail;
pub mod emails;
pub mod error;
pub mod lookup;
pub mod search;

pub use client::{FetchOptions, ProxyClient};
pub use detail::{resolve_detail_url, DetailLinkCandidate, LinkPolicy};
pub use emails::{emails_or_sentinel, extract_emails, NOT_AVAILABLE};
pub use error::{InvalidSiteOrigin, LookupError, ProxyError, ResolveError};
pub use lookup::{EmailLookup, LookupOutcome, LookupSettings, LookupStage};
pub use search::build_search_url;
