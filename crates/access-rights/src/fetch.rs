//! Single-shot HTTP GET wrapping reqwest.
//!
//! Follows redirects, applies a connect timeout plus a per-request timeout,
//! and never retries. Anything other than `200 OK` with a non-empty body is
//! a [`FetchError`].

use crate::error::{CheckError, FetchError};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::time::Duration;

/// Accept header for the OAI-PMH metadata request.
pub const XML_ACCEPT: &str = "application/xml, text/xml, */*";

/// Accept header for the vocabulary request.
pub const JSON_ACCEPT: &str = "application/json";

/// HTTP client shared by the metadata and vocabulary fetches.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the given connect timeout and identity string.
    pub fn new(connect_timeout: Duration, user_agent: &str) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()
            .map_err(CheckError::ClientBuild)?;

        Ok(Self { client })
    }

    /// GET `url` and return the raw body bytes.
    pub async fn fetch(
        &self,
        url: &str,
        accept: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body.to_vec())
    }
}
