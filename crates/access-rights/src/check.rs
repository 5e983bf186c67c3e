//! End-to-end Access Rights check for one catalogue record.

use crate::config::CheckerConfig;
use crate::ddi::{self, TYPE_OF_ACCESS};
use crate::error::{CheckError, FetchError, LocateError};
use crate::fetch::{HttpFetcher, XML_ACCEPT};
use crate::identifier::RecordIdentifier;
use crate::logging::{log_safe, preview};
use crate::verdict::{decide, Verdict};
use crate::vocabulary::{HttpTermSource, VocabularyCache};
use std::future::Future;
use std::sync::Arc;

/// What became of the metadata retrieval for one record.
#[derive(Debug)]
pub enum MetadataOutcome {
    /// Access Rights values, possibly none.
    Values(Vec<String>),
    TransportFailed(FetchError),
    ParseFailed(String),
    RootMissing,
}

impl MetadataOutcome {
    fn from_located(located: Result<Vec<String>, LocateError>) -> Self {
        match located {
            Ok(values) => MetadataOutcome::Values(values),
            Err(LocateError::MalformedInput(reason)) => MetadataOutcome::ParseFailed(reason),
            Err(LocateError::MissingRoot) => MetadataOutcome::RootMissing,
        }
    }
}

/// Checks catalogue records against the approved Access Rights vocabulary.
///
/// The vocabulary cache is shared through an `Arc`; checkers built with
/// [`AccessRightsChecker::with_cache`] reuse one set of approved terms.
pub struct AccessRightsChecker {
    config: CheckerConfig,
    fetcher: HttpFetcher,
    cache: Arc<VocabularyCache>,
}

impl AccessRightsChecker {
    /// Build a checker with its own HTTP client and vocabulary cache.
    pub fn new(config: CheckerConfig) -> Result<Self, CheckError> {
        let fetcher = HttpFetcher::new(config.connect_timeout, &config.user_agent)?;
        let source = HttpTermSource::from_config(fetcher.clone(), &config);
        let cache = Arc::new(VocabularyCache::new(Arc::new(source)));
        Ok(Self {
            config,
            fetcher,
            cache,
        })
    }

    /// Build a checker around an existing vocabulary cache.
    pub fn with_cache(
        config: CheckerConfig,
        cache: Arc<VocabularyCache>,
    ) -> Result<Self, CheckError> {
        let fetcher = HttpFetcher::new(config.connect_timeout, &config.user_agent)?;
        Ok(Self {
            config,
            fetcher,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<VocabularyCache> {
        &self.cache
    }

    /// OAI-PMH GetRecord URL for `id`.
    pub fn metadata_locator(&self, id: &RecordIdentifier) -> String {
        format!("{}{}", self.config.metadata_url, id)
    }

    /// Validate the record behind a detail URL.
    ///
    /// Only a malformed `reference` is an error. Retrieval and parsing
    /// problems become [`Verdict::Indeterminate`].
    pub async fn check_record(&self, reference: &str) -> Result<Verdict, CheckError> {
        self.check_record_until(reference, std::future::pending::<()>())
            .await
    }

    /// Like [`check_record`](Self::check_record), but stops waiting once
    /// `interrupt` completes.
    ///
    /// Interrupting the metadata retrieval yields [`Verdict::Indeterminate`]
    /// without touching the vocabulary. Interrupting the vocabulary retrieval
    /// compares the record against the fallback terms instead; see
    /// [`VocabularyCache::approved_terms_until`].
    pub async fn check_record_until<F>(
        &self,
        reference: &str,
        interrupt: F,
    ) -> Result<Verdict, CheckError>
    where
        F: Future<Output = ()>,
    {
        let id = RecordIdentifier::extract(reference)?;
        tokio::pin!(interrupt);

        let outcome = tokio::select! {
            outcome = self.retrieve_access_values(&id) => outcome,
            () = &mut interrupt => {
                tracing::error!("metadata retrieval interrupted for {}", log_safe(id.as_str()));
                return Ok(Verdict::Indeterminate);
            }
        };

        let verdict = match outcome {
            MetadataOutcome::Values(values) => {
                let approved = self.cache.approved_terms_until(&mut interrupt).await;
                decide(&values, &approved)
            }
            MetadataOutcome::TransportFailed(e) => {
                tracing::error!("metadata fetch failed for {}: {e}", log_safe(id.as_str()));
                Verdict::Indeterminate
            }
            MetadataOutcome::ParseFailed(reason) => {
                tracing::error!(
                    "metadata for {} is not valid XML: {}",
                    log_safe(id.as_str()),
                    log_safe(&reason)
                );
                Verdict::Indeterminate
            }
            MetadataOutcome::RootMissing => {
                tracing::error!("no DDI codeBook in metadata for {}", log_safe(id.as_str()));
                Verdict::Indeterminate
            }
        };

        tracing::info!("result for {}: {verdict}", log_safe(id.as_str()));
        Ok(verdict)
    }

    /// Fetch, parse and read the Access Rights field for `id`.
    pub async fn retrieve_access_values(&self, id: &RecordIdentifier) -> MetadataOutcome {
        let url = self.metadata_locator(id);
        let bytes = match self
            .fetcher
            .fetch(&url, XML_ACCEPT, self.config.metadata_timeout)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => return MetadataOutcome::TransportFailed(e),
        };

        tracing::info!("parsing XML response from OAI-PMH endpoint at {}", log_safe(&url));
        let located =
            ddi::isolate_root(&bytes).map(|doc| ddi::extract_field(&doc, TYPE_OF_ACCESS));
        if let Err(LocateError::MalformedInput(_)) = &located {
            tracing::error!("failed to parse XML, preview: {}", log_safe(&preview(&bytes)));
        }

        MetadataOutcome::from_located(located)
    }
}
