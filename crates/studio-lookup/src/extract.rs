//! Metadata extraction from the download page
//!
//! Pure functions of `(page, request)`. Nothing here knows how the page was
//! fetched or how the result will be consumed.

use crate::error::{LookupError, MatchTarget};
use crate::patterns::{CHECKSUM_PATTERNS, URL_PATTERNS};
use crate::types::{ChecksumMode, ExtractionRequest, ExtractionResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Delimiter runs used by the vendor's `product-VERSION-platform.ext` names
static VERSION_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]+").expect("delimiter pattern must compile"));

/// Extract download metadata, failing if the checksum is missing
pub fn extract(page: &str, request: ExtractionRequest) -> Result<ExtractionResult, LookupError> {
    extract_with(page, request, ChecksumMode::Required)
}

/// Extract download metadata with an explicit checksum policy
pub fn extract_with(
    page: &str,
    request: ExtractionRequest,
    checksum_mode: ChecksumMode,
) -> Result<ExtractionResult, LookupError> {
    let url = extract_url(page, request)?;

    let checksum = match extract_checksum(page, request) {
        Ok(checksum) => Some(checksum),
        Err(LookupError::NotFound { .. }) if checksum_mode == ChecksumMode::Optional => {
            debug!(
                target_os = %request.target_os,
                utility = %request.utility,
                "No checksum row, reporting checksum as unavailable"
            );
            None
        }
        Err(e) => return Err(e),
    };

    Ok(ExtractionResult {
        checksum,
        filename: filename_from_url(&url).to_string(),
        version: version_from_url(&url).to_string(),
        url,
    })
}

/// Find the one download URL for the request
///
/// The same URL usually appears more than once (link target and button
/// label), so matches are deduplicated before the exactly-one check.
pub fn extract_url(page: &str, request: ExtractionRequest) -> Result<String, LookupError> {
    let pattern = URL_PATTERNS.select(request.utility, request.target_os);
    let matched = dedup_preserving_order(find_matches(pattern, page));
    exactly_one(MatchTarget::Url, request, matched)
}

/// Find the one SHA-256 checksum for the request
///
/// No deduplication; the digest is trusted to be whatever the pattern's
/// character class captured.
pub fn extract_checksum(page: &str, request: ExtractionRequest) -> Result<String, LookupError> {
    let pattern = CHECKSUM_PATTERNS.select(request.utility, request.target_os);
    let matched = find_matches(pattern, page);
    exactly_one(MatchTarget::Checksum, request, matched)
}

/// All first-capture-group substrings, in page order
pub fn find_matches(pattern: &Regex, page: &str) -> Vec<String> {
    pattern
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Remove repeated entries, keeping first occurrences in order
pub fn dedup_preserving_order(matches: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// Final path segment of a URL (text after the last `/`)
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Second-to-last `-`/`_`-delimited segment of the whole URL
///
/// `.../android-studio-2024.1.1.11-linux.tar.gz` gives `2024.1.1.11`,
/// `.../commandlinetools-linux-11076708_latest.zip` gives `11076708`.
/// Names that stray from the vendor convention give a wrong version rather
/// than an error; a URL without any delimiter gives an empty string.
pub fn version_from_url(url: &str) -> &str {
    let segments: Vec<&str> = VERSION_DELIMITERS.split(url).collect();
    segments.iter().rev().nth(1).copied().unwrap_or_default()
}

fn exactly_one(
    target: MatchTarget,
    request: ExtractionRequest,
    mut matched: Vec<String>,
) -> Result<String, LookupError> {
    match matched.len() {
        0 => Err(LookupError::NotFound {
            target,
            utility: request.utility,
            target_os: request.target_os,
        }),
        1 => Ok(matched.remove(0)),
        _ => Err(LookupError::AmbiguousMatch {
            target,
            matches: matched,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TargetOs, Utility};

    const STUDIO_LINUX_URL: &str =
        "https://dl.google.com/dl/android/studio/install/2024.1.1.11/android-studio-2024.1.1.11-linux.tar.gz";
    const CLI_LINUX_URL: &str =
        "https://dl.google.com/android/repository/commandlinetools-linux-11076708_latest.zip";

    fn digest(c: char) -> String {
        std::iter::repeat(c).take(64).collect()
    }

    fn request(os: TargetOs, utility: Utility) -> ExtractionRequest {
        ExtractionRequest::new(os, utility)
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url(STUDIO_LINUX_URL),
            "android-studio-2024.1.1.11-linux.tar.gz"
        );
        assert_eq!(filename_from_url("no-slash"), "no-slash");
        assert_eq!(filename_from_url("https://host/dir/"), "");
    }

    #[test]
    fn test_version_from_studio_url() {
        assert_eq!(version_from_url(STUDIO_LINUX_URL), "2024.1.1.11");
    }

    #[test]
    fn test_version_from_cli_url() {
        assert_eq!(version_from_url(CLI_LINUX_URL), "11076708");
    }

    #[test]
    fn test_version_quirks() {
        // Extra delimiters shift the segment
        assert_eq!(
            version_from_url("https://host/android-studio-2024.1.1.11-mac_arm.dmg"),
            "mac"
        );
        // Runs of delimiters count as one
        assert_eq!(version_from_url("https://host/a--1__b"), "1");
        assert_eq!(version_from_url("https://host/plain.zip"), "");
    }

    #[test]
    fn test_dedup_preserving_order() {
        let input = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(dedup_preserving_order(input), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_extract_url_deduplicates() {
        let page = format!(
            "<a href=\"x\" data-url=\n{url}\n>\n<button>\n{url}\n</button>",
            url = STUDIO_LINUX_URL
        );
        let url = extract_url(&page, request(TargetOs::Linux, Utility::Studio)).unwrap();
        assert_eq!(url, STUDIO_LINUX_URL);
    }

    #[test]
    fn test_extract_url_not_found() {
        let err = extract_url("<html></html>", request(TargetOs::Mac, Utility::Studio)).unwrap_err();
        assert!(matches!(
            err,
            LookupError::NotFound {
                target: MatchTarget::Url,
                target_os: TargetOs::Mac,
                utility: Utility::Studio,
            }
        ));
    }

    #[test]
    fn test_extract_url_ambiguous() {
        let page = "https://host/android-studio-1.0-linux.tar.gz\nhttps://host/android-studio-2.0-linux.tar.gz\n";
        let err = extract_url(page, request(TargetOs::Linux, Utility::Studio)).unwrap_err();
        match err {
            LookupError::AmbiguousMatch { target, matches } => {
                assert_eq!(target, MatchTarget::Url);
                assert_eq!(matches.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_checksum_compact_markup() {
        let page = format!(
            "android-studio-2024.1.1.11-linux.tar.gz</button></td><td>SHA-256</td><td>{}</td>",
            digest('a')
        );
        let checksum =
            extract_checksum(&page, request(TargetOs::Linux, Utility::Studio)).unwrap();
        assert_eq!(checksum, digest('a'));
    }

    #[test]
    fn test_extract_checksum_single_line_rows_stay_in_their_row() {
        let page = format!(
            "https://example.com/android-studio-2024.1.1.11-linux.tar.gz\n\
             <tr><td>Linux</td><td><button>android-studio-2024.1.1.11-linux.tar.gz</button></td><td>1.2 GB</td><td>{}</td></tr>\
             <tr><td>ChromeOS</td><td><button>android-studio-2024.1.1.11-cros.deb</button></td><td>1.0 GB</td><td>{}</td></tr>",
            digest('a'),
            digest('c')
        );

        let result = extract(&page, request(TargetOs::Linux, Utility::Studio)).unwrap();
        assert_eq!(result.checksum, Some(digest('a')));

        let checksum =
            extract_checksum(&page, request(TargetOs::ChromeOs, Utility::Studio)).unwrap();
        assert_eq!(checksum, digest('c'));
    }

    #[test]
    fn test_extract_windows_checksum_single_line_rows() {
        let page = format!(
            "<tr><td><button>android-studio-2024.1.1.11-windows.exe</button><br>Recommended</td><td>1.2 GB</td><td>{}</td></tr>\
             <tr><td><button>android-studio-2024.1.1.11-mac.dmg</button></td><td>1.3 GB</td><td>{}</td></tr>",
            digest('d'),
            digest('e')
        );

        let checksum =
            extract_checksum(&page, request(TargetOs::Windows, Utility::Studio)).unwrap();
        assert_eq!(checksum, digest('d'));
    }

    #[test]
    fn test_extract_checksum_duplicates_are_ambiguous() {
        let row = format!(
            "commandlinetools-linux-11076708_latest.zip</button></td><td>147 MB</td><td>{}</td>\n",
            digest('b')
        );
        let page = format!("{row}{row}");
        let err = extract_checksum(&page, request(TargetOs::Linux, Utility::Cli)).unwrap_err();
        assert!(matches!(
            err,
            LookupError::AmbiguousMatch {
                target: MatchTarget::Checksum,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_checksum_rejects_short_digest() {
        let page = "commandlinetools-linux-1_latest.zip</button></td><td>1 MB</td><td>abcdef</td>";
        let err = extract_checksum(page, request(TargetOs::Linux, Utility::Cli)).unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[test]
    fn test_extract_optional_checksum() {
        let page = format!("{}\n", CLI_LINUX_URL);
        let req = request(TargetOs::Linux, Utility::Cli);

        assert!(matches!(
            extract(&page, req),
            Err(LookupError::NotFound {
                target: MatchTarget::Checksum,
                ..
            })
        ));

        let result = extract_with(&page, req, ChecksumMode::Optional).unwrap();
        assert_eq!(result.checksum, None);
        assert_eq!(result.checksum_or_unavailable(), "Unavailable");
        assert_eq!(result.version, "11076708");
    }

    #[test]
    fn test_url_failure_wins_over_checksum() {
        let page = format!(
            "android-studio-1-linux.tar.gz</button></td><td>x</td><td>{}</td>",
            digest('c')
        );
        let err = extract(&page, request(TargetOs::Linux, Utility::Studio)).unwrap_err();
        assert!(matches!(
            err,
            LookupError::NotFound {
                target: MatchTarget::Url,
                ..
            }
        ));
    }
}
