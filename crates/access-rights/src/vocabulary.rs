//! Approved Access Rights terms, fetched once per process.
//!
//! ## Population
//!
//! [`VocabularyCache::approved_terms`] reads a `OnceLock` first and returns
//! without locking once it is set. Otherwise the caller takes the population
//! mutex, re-checks, and only then asks its [`TermSource`]. Any failure or an
//! empty vocabulary yields [`ApprovedTermSet::fallback`], which is cached like
//! a real set; the remote vocabulary is not retried afterwards.
//!
//! If a populating caller is dropped or interrupted mid-fetch, the mutex
//! guard is released and the cache stays empty, so the next caller tries
//! again. An interrupted caller itself gets the fallback set, uncached.

use crate::config::CheckerConfig;
use crate::error::VocabularyError;
use crate::fetch::{HttpFetcher, JSON_ACCEPT};
use crate::logging::log_safe;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Terms used when the vocabulary service is unusable.
pub const FALLBACK_TERMS: [&str; 2] = ["Open", "Restricted"];

/// Where a cached term set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOrigin {
    Remote,
    Fallback,
}

/// Case-sensitive set of approved, trimmed terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedTermSet {
    terms: BTreeSet<String>,
    origin: TermOrigin,
}

impl ApprovedTermSet {
    pub fn new(terms: BTreeSet<String>, origin: TermOrigin) -> Self {
        Self { terms, origin }
    }

    /// `{"Open", "Restricted"}`.
    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_TERMS.iter().map(|t| t.to_string()).collect(),
            TermOrigin::Fallback,
        )
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn origin(&self) -> TermOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Supplier of the remote vocabulary.
#[async_trait]
pub trait TermSource: Send + Sync {
    async fn fetch_terms(&self) -> Result<BTreeSet<String>, VocabularyError>;
}

/// Fetches the CESSDA Access Rights vocabulary over HTTP.
pub struct HttpTermSource {
    fetcher: HttpFetcher,
    url: String,
    timeout: Duration,
}

impl HttpTermSource {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config(fetcher: HttpFetcher, config: &CheckerConfig) -> Self {
        Self::new(fetcher, &config.vocabulary_url, config.vocabulary_timeout)
    }
}

#[async_trait]
impl TermSource for HttpTermSource {
    async fn fetch_terms(&self) -> Result<BTreeSet<String>, VocabularyError> {
        tracing::info!("fetching approved Access Rights terms from {}", log_safe(&self.url));
        let body = self.fetcher.fetch(&self.url, JSON_ACCEPT, self.timeout).await?;
        let root: Value = serde_json::from_slice(&body)?;
        Ok(parse_terms(&root))
    }
}

/// Collect `versions[0].concepts[*].title`, skipping blank and non-string
/// titles.
pub fn parse_terms(root: &Value) -> BTreeSet<String> {
    let concepts = root
        .get("versions")
        .and_then(Value::as_array)
        .and_then(|versions| versions.first())
        .and_then(|version| version.get("concepts"))
        .and_then(Value::as_array);

    let Some(concepts) = concepts else {
        return BTreeSet::new();
    };

    let mut terms = BTreeSet::new();
    for concept in concepts {
        let Some(title) = concept.get("title").and_then(Value::as_str) else {
            continue;
        };
        let title = title.trim();
        if title.is_empty() {
            continue;
        }
        tracing::info!("found Access Rights entry: {}", log_safe(title));
        terms.insert(title.to_string());
    }
    terms
}

/// Process-lifetime cache of the approved term set.
pub struct VocabularyCache {
    source: Arc<dyn TermSource>,
    terms: OnceLock<Arc<ApprovedTermSet>>,
    populate: tokio::sync::Mutex<()>,
}

impl VocabularyCache {
    pub fn new(source: Arc<dyn TermSource>) -> Self {
        Self {
            source,
            terms: OnceLock::new(),
            populate: tokio::sync::Mutex::new(()),
        }
    }

    /// A cache that is already populated and never touches `source`.
    pub fn prepopulated(terms: ApprovedTermSet) -> Self {
        let cache = Self::new(Arc::new(NoSource));
        let _ = cache.terms.set(Arc::new(terms));
        cache
    }

    /// The cached set, if population has completed.
    pub fn get(&self) -> Option<Arc<ApprovedTermSet>> {
        self.terms.get().cloned()
    }

    /// Return the approved terms, populating the cache on first use.
    ///
    /// Never fails: vocabulary errors resolve to the fallback set.
    pub async fn approved_terms(&self) -> Arc<ApprovedTermSet> {
        if let Some(terms) = self.terms.get() {
            return terms.clone();
        }

        let _guard = self.populate.lock().await;
        if let Some(terms) = self.terms.get() {
            return terms.clone();
        }

        let terms = match self.source.fetch_terms().await {
            Ok(terms) if !terms.is_empty() => {
                tracing::info!("fetched {} approved Access Rights terms", terms.len());
                ApprovedTermSet::new(terms, TermOrigin::Remote)
            }
            Ok(_) => fallback_after(&VocabularyError::Empty),
            Err(e) => fallback_after(&e),
        };

        self.terms.get_or_init(|| Arc::new(terms)).clone()
    }

    /// Like [`approved_terms`](Self::approved_terms), but falls back to
    /// [`ApprovedTermSet::fallback`] if `interrupt` completes first.
    ///
    /// The interrupted fallback is returned to this caller only; the cache is
    /// left empty.
    pub async fn approved_terms_until<F>(&self, interrupt: F) -> Arc<ApprovedTermSet>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            terms = self.approved_terms() => terms,
            () = interrupt => Arc::new(fallback_after(&VocabularyError::Interrupted)),
        }
    }
}

fn fallback_after(err: &VocabularyError) -> ApprovedTermSet {
    tracing::error!("{}", log_safe(&err.to_string()));
    tracing::info!("using default Access Rights terms {:?}", FALLBACK_TERMS);
    ApprovedTermSet::fallback()
}

struct NoSource;

#[async_trait]
impl TermSource for NoSource {
    async fn fetch_terms(&self) -> Result<BTreeSet<String>, VocabularyError> {
        Err(VocabularyError::Empty)
    }
}
