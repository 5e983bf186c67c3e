//! Record identifiers carried in catalogue detail URLs.

use crate::error::CheckError;
use std::fmt;

/// Path marker that precedes the identifier in a detail URL.
pub const DETAIL_SEGMENT: &str = "/detail/";

/// Opaque record identifier taken from a detail URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordIdentifier(String);

impl RecordIdentifier {
    /// Derive the identifier from a detail URL such as
    /// `https://datacatalogue.cessda.eu/detail/abc123?lang=en`.
    ///
    /// The query string is dropped before the marker is searched for, and
    /// everything after the first `/detail/` becomes the identifier.
    pub fn extract(reference: &str) -> Result<Self, CheckError> {
        let path = reference
            .split_once('?')
            .map_or(reference, |(before, _)| before);

        let Some(pos) = path.find(DETAIL_SEGMENT) else {
            return Err(CheckError::InvalidReference {
                reference: reference.to_string(),
                reason: "URL must contain '/detail/'",
            });
        };

        let id = &path[pos + DETAIL_SEGMENT.len()..];
        if id.is_empty() {
            return Err(CheckError::InvalidReference {
                reference: reference.to_string(),
                reason: "no record identifier after '/detail/'",
            });
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_query() {
        let id = RecordIdentifier::extract("https://datacatalogue.cessda.eu/detail/abc123?lang=en")
            .unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_query_is_ignored() {
        let a = RecordIdentifier::extract("https://datacatalogue.cessda.eu/detail/X?lang=en").unwrap();
        let b = RecordIdentifier::extract("https://datacatalogue.cessda.eu/detail/X").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "X");
    }

    #[test]
    fn test_missing_marker() {
        let err = RecordIdentifier::extract("https://datacatalogue.cessda.eu/record/abc123")
            .unwrap_err();
        assert!(matches!(err, CheckError::InvalidReference { .. }));
    }

    #[test]
    fn test_empty_identifier() {
        for url in [
            "https://datacatalogue.cessda.eu/detail/",
            "https://datacatalogue.cessda.eu/detail/?lang=en",
        ] {
            let err = RecordIdentifier::extract(url).unwrap_err();
            assert!(
                matches!(err, CheckError::InvalidReference { ref reference, .. } if reference == url),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_marker_only_in_query_is_rejected() {
        let err = RecordIdentifier::extract("https://example.org/search?next=/detail/abc")
            .unwrap_err();
        assert!(matches!(err, CheckError::InvalidReference { .. }));
    }

    #[test]
    fn test_identifier_keeps_trailing_path() {
        let id = RecordIdentifier::extract("https://example.org/detail/a/b").unwrap();
        assert_eq!(id.as_str(), "a/b");
    }
}
