//! Endpoint and timeout configuration.
//!
//! Endpoint URLs resolve as explicit value, then environment variable, then
//! the built-in CESSDA production endpoint.

use crate::error::CheckError;
use std::time::Duration;

/// OAI-PMH GetRecord endpoint; the record identifier is appended verbatim.
pub const DEFAULT_METADATA_URL: &str = "https://datacatalogue.cessda.eu/oai-pmh/v0/oai?verb=GetRecord&metadataPrefix=oai_ddi25&identifier=";

/// CESSDA Access Rights vocabulary, English 1.0.0 rendering.
pub const DEFAULT_VOCABULARY_URL: &str = "https://vocabularies.cessda.eu/v2/vocabularies/CessdaAccessRights/1.0.0?languageVersion=en-1.0.0&format=json";

pub const METADATA_URL_ENV: &str = "ACCESS_RIGHTS_METADATA_URL";
pub const VOCABULARY_URL_ENV: &str = "ACCESS_RIGHTS_VOCABULARY_URL";

/// Everything the checker needs to reach its two remote services.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Prefix of the metadata request; the identifier is appended to it.
    pub metadata_url: String,
    /// Vocabulary JSON endpoint.
    pub vocabulary_url: String,
    /// TCP/TLS connect timeout shared by both requests.
    pub connect_timeout: Duration,
    /// Whole-request timeout for the metadata fetch.
    pub metadata_timeout: Duration,
    /// Whole-request timeout for the vocabulary fetch.
    pub vocabulary_timeout: Duration,
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            vocabulary_url: DEFAULT_VOCABULARY_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            metadata_timeout: Duration::from_secs(30),
            vocabulary_timeout: Duration::from_secs(20),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CheckerConfig {
    /// Build a config from optional explicit endpoints, falling back to the
    /// environment and then to the defaults. Both URLs must parse.
    pub fn resolve(
        metadata_url: Option<&str>,
        vocabulary_url: Option<&str>,
    ) -> Result<Self, CheckError> {
        let config = Self {
            metadata_url: resolve_endpoint(metadata_url, METADATA_URL_ENV, DEFAULT_METADATA_URL),
            vocabulary_url: resolve_endpoint(
                vocabulary_url,
                VOCABULARY_URL_ENV,
                DEFAULT_VOCABULARY_URL,
            ),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both endpoints are absolute URLs.
    pub fn validate(&self) -> Result<(), CheckError> {
        for url in [&self.metadata_url, &self.vocabulary_url] {
            url::Url::parse(url).map_err(|source| CheckError::InvalidEndpoint {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn resolve_endpoint(explicit: Option<&str>, env_var: &str, default: &str) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(url) = std::env::var(env_var) {
        if !url.trim().is_empty() {
            return url;
        }
    }

    default.to_string()
}
