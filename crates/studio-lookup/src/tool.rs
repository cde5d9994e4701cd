//! Tool builder and contract for studio-lookup

use crate::client::{log_found, lookup_with_source, validate_source_url, LookupOptions};
use crate::error::LookupError;
use crate::extract::extract_with;
use crate::source::PageSource;
use crate::types::{ChecksumMode, ExtractionRequest, ExtractionResult};
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Status update during tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Current phase ("validate", "fetch", "extract", "complete")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ToolStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for configuring the lookup tool
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    options: LookupOptions,
}

impl ToolBuilder {
    /// Create a new tool builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to scan instead of the public download page
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.options.source_url = url.into();
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set connect / first-byte timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set total body timeout
    pub fn body_timeout(mut self, timeout: Duration) -> Self {
        self.options.body_timeout = timeout;
        self
    }

    /// Accept pages without a checksum row
    pub fn allow_missing_checksum(mut self, allow: bool) -> Self {
        self.options.checksum_mode = if allow {
            ChecksumMode::Optional
        } else {
            ChecksumMode::Required
        };
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            options: self.options,
        }
    }
}

/// Configured lookup tool
#[derive(Debug, Clone, Default)]
pub struct Tool {
    options: LookupOptions,
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Options this tool was built with
    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractionRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractionResult);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Execute the tool with the given request
    pub async fn execute(&self, req: ExtractionRequest) -> Result<ExtractionResult, LookupError> {
        let source = self.options.http_source();
        lookup_with_source(&source, req, &self.options).await
    }

    /// Execute the tool against a custom page source
    pub async fn execute_with_source(
        &self,
        source: &dyn PageSource,
        req: ExtractionRequest,
    ) -> Result<ExtractionResult, LookupError> {
        lookup_with_source(source, req, &self.options).await
    }

    /// Execute the tool with status updates
    pub async fn execute_with_status<F>(
        &self,
        req: ExtractionRequest,
        mut status_callback: F,
    ) -> Result<ExtractionResult, LookupError>
    where
        F: FnMut(ToolStatus),
    {
        status_callback(ToolStatus::new("validate").with_percent(0.0));

        validate_source_url(&self.options.source_url)?;

        let message = format!(
            "Scanning {} for {} {}",
            self.options.source_url, req.target_os, req.utility
        );
        info!("{}", message);
        status_callback(
            ToolStatus::new("fetch")
                .with_message(message)
                .with_percent(10.0),
        );

        let source = self.options.http_source();
        let page = source.fetch_page(&self.options.source_url).await?;

        status_callback(ToolStatus::new("extract").with_percent(90.0));

        let result = extract_with(&page, req, self.options.checksum_mode)?;
        log_found(req, &result);

        status_callback(ToolStatus::new("complete").with_percent(100.0));

        Ok(result)
    }
}
