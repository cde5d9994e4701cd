//! studio-lookup - latest Android Studio download metadata
//!
//! This crate scans the Android Studio download page and extracts the
//! download URL, version, file name and SHA-256 checksum for a given
//! target operating system and utility (full IDE or command-line tools).
//!
//! ## Layout
//!
//! - [`extract`] - pure extractor over page text, no I/O
//! - [`patterns`] - per `(utility, os)` regular expression tables
//! - [`PageSource`] - seam for fetching the page; [`HttpPageSource`] is the
//!   reqwest implementation
//! - [`lookup`] / [`Tool`] - fetch then extract
//!
//! ```no_run
//! use studio_lookup::{lookup, ExtractionRequest, TargetOs, Utility};
//!
//! # async fn run() -> Result<(), studio_lookup::LookupError> {
//! let result = lookup(ExtractionRequest::new(TargetOs::Linux, Utility::Cli)).await?;
//! println!("{} {}", result.version, result.url);
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
pub mod extract;
pub mod patterns;
mod source;
mod tool;
mod types;

pub use client::{lookup, lookup_with_options, lookup_with_source, LookupOptions};
pub use error::{LookupError, MatchTarget};
pub use extract::{extract, extract_with};
pub use source::{HttpPageSource, PageSource, DEFAULT_BODY_TIMEOUT, DEFAULT_CONNECT_TIMEOUT};
pub use tool::{Tool, ToolBuilder, ToolStatus};
pub use types::{ChecksumMode, ExtractionRequest, ExtractionResult, TargetOs, Utility, UNAVAILABLE};

/// Page scanned when no source URL is configured
pub const DEFAULT_SOURCE_URL: &str = "https://developer.android.com/studio/index.html";

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "studio-lookup/1.0";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Looks up the latest Android Studio or Android command-line tools download.

- Returns version, download URL, file name and SHA-256 checksum
- Targets chromeos, linux, mac, mac_arm or windows
- Scans the official Android Studio download page"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# Android Studio Lookup Tool

Scans https://developer.android.com/studio/index.html and reports the current
download for one operating system and utility.

## Input Parameters
- `target_os` (optional): chromeos, linux, mac, mac_arm or windows (default: linux)
- `utility` (optional): studio (full IDE) or cli (command-line tools only) (default: studio)

## Output Fields
- `checksum`: SHA-256 of the download, or "Unavailable"
- `filename`: Download file name
- `url`: Download URL
- `version`: Version number taken from the file name

## Notes
- There is no separate ChromeOS command-line tools package; cli on chromeos
  returns the Linux package.
- Versions come from the vendor file name convention
  (`product-VERSION-platform.ext`); unusual names give unusual versions.

## Examples

### Android Studio for Linux
```json
{"target_os": "linux", "utility": "studio"}
```

### Command-line tools for macOS
```json
{"target_os": "mac", "utility": "cli"}
```

## Error Handling
- No match on the page: the page layout changed or there is no such download
- Several distinct matches: the page holds unexpected duplicates
- Network errors and non-2xx responses are reported as-is; nothing is retried
"#;
