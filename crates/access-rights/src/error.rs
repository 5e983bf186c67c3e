//! Error types for the Access Rights check.
//!
//! Only [`CheckError`] ever reaches a caller. Transport, markup and
//! vocabulary failures are folded into a [`Verdict`](crate::Verdict) or the
//! fallback term set before they leave the crate.

/// Failures a caller of [`AccessRightsChecker`](crate::AccessRightsChecker) can observe.
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("invalid record reference {reference:?}: {reason}")]
    InvalidReference {
        reference: String,
        reason: &'static str,
    },

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// A single GET that did not produce a usable body.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,
}

/// Why the remote vocabulary could not be used.
#[derive(thiserror::Error, Debug)]
pub enum VocabularyError {
    #[error("vocabulary fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("vocabulary response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vocabulary response contains no usable terms")]
    Empty,

    #[error("vocabulary retrieval interrupted")]
    Interrupted,
}

/// Why a fetched metadata payload could not be narrowed to its DDI codeBook.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("malformed XML: {0}")]
    MalformedInput(String),

    #[error("no DDI codeBook element found")]
    MissingRoot,
}
