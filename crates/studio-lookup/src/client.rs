//! Lookup client for studio-lookup
//!
//! This module provides the main entry points: fetch the download page,
//! then run the extractor over it. Extraction itself lives in
//! [`extract`](crate::extract) and never touches the network.

use crate::error::LookupError;
use crate::extract::extract_with;
use crate::source::{HttpPageSource, PageSource, DEFAULT_BODY_TIMEOUT, DEFAULT_CONNECT_TIMEOUT};
use crate::types::{ChecksumMode, ExtractionRequest, ExtractionResult};
use crate::DEFAULT_SOURCE_URL;
use std::time::Duration;
use tracing::{debug, info};

/// Lookup options that can be configured via tool builder
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Page to scan
    pub source_url: String,
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Connect / first-byte timeout
    pub connect_timeout: Duration,
    /// Total body timeout
    pub body_timeout: Duration,
    /// Whether a missing checksum fails the lookup
    pub checksum_mode: ChecksumMode,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            body_timeout: DEFAULT_BODY_TIMEOUT,
            checksum_mode: ChecksumMode::default(),
        }
    }
}

impl LookupOptions {
    /// HTTP page source configured from these options
    pub fn http_source(&self) -> HttpPageSource {
        HttpPageSource::new()
            .user_agent(self.user_agent.clone())
            .connect_timeout(self.connect_timeout)
            .body_timeout(self.body_timeout)
    }
}

/// Look up download metadata from the default source page
///
/// For custom options, use [`lookup_with_options`].
pub async fn lookup(request: ExtractionRequest) -> Result<ExtractionResult, LookupError> {
    lookup_with_options(request, LookupOptions::default()).await
}

/// Look up download metadata with custom options over HTTP
pub async fn lookup_with_options(
    request: ExtractionRequest,
    options: LookupOptions,
) -> Result<ExtractionResult, LookupError> {
    let source = options.http_source();
    lookup_with_source(&source, request, &options).await
}

/// Look up download metadata using any page source
pub async fn lookup_with_source(
    source: &dyn PageSource,
    request: ExtractionRequest,
    options: &LookupOptions,
) -> Result<ExtractionResult, LookupError> {
    validate_source_url(&options.source_url)?;

    info!(
        "Scanning {} for {} {}",
        options.source_url, request.target_os, request.utility
    );
    debug!(source = source.name(), "Fetching source page");

    let page = source.fetch_page(&options.source_url).await?;
    let result = extract_with(&page, request, options.checksum_mode)?;
    log_found(request, &result);

    Ok(result)
}

/// Summary line for a successful lookup
pub(crate) fn log_found(request: ExtractionRequest, result: &ExtractionResult) {
    info!(
        version = %result.version,
        url = %result.url,
        filename = %result.filename,
        checksum = %result.checksum_or_unavailable(),
        "Found {} {} download",
        request.target_os,
        request.utility
    );
}

/// Source URL must be http(s) and parse
pub(crate) fn validate_source_url(source_url: &str) -> Result<(), LookupError> {
    if !source_url.starts_with("http://") && !source_url.starts_with("https://") {
        return Err(LookupError::InvalidUrlScheme);
    }
    url::Url::parse(source_url).map_err(|_| LookupError::InvalidUrlScheme)?;
    Ok(())
}
