//! Validated report key.
//!
//! A report key names one bucket directory under the store root, so it must
//! be a single inert path segment. [`ReportKey`] can only be built through
//! validation, which keeps raw form input away from filesystem joins.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::paths::is_safe_segment;

/// Identifier of the report a batch of photos belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey(String);

impl ReportKey {
    /// Validate and wrap a report key.
    ///
    /// Surrounding whitespace is trimmed. Empty keys and keys that are not a
    /// single path segment are rejected with [`Error::InvalidInput`].
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(Error::invalid_input("report key is required"));
        }
        if !is_safe_segment(key) {
            return Err(Error::invalid_input(format!(
                "report key {key:?} must be a single path segment"
            )));
        }
        Ok(Self(key.to_string()))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ReportKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ReportKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_plain_keys() {
        let key = ReportKey::parse("r42").unwrap();
        assert_eq!(key.as_str(), "r42");
        assert_eq!(key.to_string(), "r42");

        let key: ReportKey = "  abc-123  ".parse().unwrap();
        assert_eq!(key.as_str(), "abc-123");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            ReportKey::parse(""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ReportKey::parse("   "),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_rejects_traversal() {
        for raw in ["..", ".", "a/b", "../etc", "a\\b"] {
            assert!(
                matches!(ReportKey::parse(raw), Err(Error::InvalidInput(_))),
                "accepted {raw:?}"
            );
        }
    }
}
