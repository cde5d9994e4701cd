//! Error types for studio-lookup

use crate::types::{TargetOs, Utility};
use std::fmt;
use thiserror::Error;

/// What an extraction pattern was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// Download URL
    Url,
    /// SHA-256 checksum
    Checksum,
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::Url => write!(f, "URL"),
            MatchTarget::Checksum => write!(f, "checksum"),
        }
    }
}

/// Errors that can occur during a lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// Pattern produced zero matches
    #[error("{}", not_found_message(.target, .utility, .target_os))]
    NotFound {
        target: MatchTarget,
        utility: Utility,
        target_os: TargetOs,
    },

    /// Pattern produced more than one distinct match
    #[error("Expected one {target}, found multiple: {matches:?}")]
    AmbiguousMatch {
        target: MatchTarget,
        matches: Vec<String>,
    },

    /// Unknown target operating system name
    #[error("Invalid target_os '{0}': must be one of chromeos, linux, mac, mac_arm, windows")]
    InvalidTargetOs(String),

    /// Unknown utility name
    #[error("Invalid utility '{0}': must be one of studio, cli")]
    InvalidUtility(String),

    /// Source URL has invalid scheme
    #[error("Invalid source URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out waiting for first byte
    #[error("Request timed out: server did not respond in time")]
    FirstByteTimeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Source page returned a non-success status
    #[error("Source page returned HTTP {0}")]
    HttpStatus(u16),

    /// Source page body did not arrive in time
    #[error("Timed out reading source page body")]
    BodyTimeout,
}

fn not_found_message(target: &MatchTarget, utility: &Utility, target_os: &TargetOs) -> String {
    match target {
        MatchTarget::Url => format!(
            "Unable to find URL matching OS {} and utility {}",
            target_os, utility
        ),
        MatchTarget::Checksum => {
            format!("Unable to find checksum for {} on {}.", utility, target_os)
        }
    }
}

impl LookupError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::FirstByteTimeout
        } else if err.is_connect() {
            LookupError::ConnectError(err)
        } else {
            LookupError::RequestError(err.to_string())
        }
    }

    /// True for errors raised by the extractor itself (page fetched, markup
    /// did not match as expected)
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            LookupError::NotFound { .. } | LookupError::AmbiguousMatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::NotFound {
                target: MatchTarget::Url,
                utility: Utility::Studio,
                target_os: TargetOs::Linux,
            }
            .to_string(),
            "Unable to find URL matching OS linux and utility studio"
        );
        assert_eq!(
            LookupError::NotFound {
                target: MatchTarget::Checksum,
                utility: Utility::Cli,
                target_os: TargetOs::MacArm,
            }
            .to_string(),
            "Unable to find checksum for cli on mac_arm."
        );
        assert_eq!(
            LookupError::AmbiguousMatch {
                target: MatchTarget::Url,
                matches: vec!["a".to_string(), "b".to_string()],
            }
            .to_string(),
            "Expected one URL, found multiple: [\"a\", \"b\"]"
        );
        assert_eq!(
            LookupError::InvalidUrlScheme.to_string(),
            "Invalid source URL: must start with http:// or https://"
        );
        assert_eq!(
            LookupError::HttpStatus(503).to_string(),
            "Source page returned HTTP 503"
        );
    }

    #[test]
    fn test_is_extraction_error() {
        assert!(LookupError::AmbiguousMatch {
            target: MatchTarget::Checksum,
            matches: vec![],
        }
        .is_extraction_error());
        assert!(!LookupError::BodyTimeout.is_extraction_error());
        assert!(!LookupError::InvalidUtility("x".to_string()).is_extraction_error());
    }
}
