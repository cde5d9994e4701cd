//! Core types for studio-lookup

use crate::error::LookupError;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Placeholder rendered for a checksum the page did not provide
pub const UNAVAILABLE: &str = "Unavailable";

/// Operating system the download is for
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetOs {
    /// ChromeOS (Debian package)
    #[serde(rename = "chromeos")]
    ChromeOs,
    /// Linux tarball
    #[default]
    Linux,
    /// macOS, Intel
    Mac,
    /// macOS, Apple silicon
    MacArm,
    /// Windows installer
    Windows,
}

impl TargetOs {
    /// All supported operating systems, in display order
    pub const ALL: [TargetOs; 5] = [
        TargetOs::ChromeOs,
        TargetOs::Linux,
        TargetOs::Mac,
        TargetOs::MacArm,
        TargetOs::Windows,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::ChromeOs => "chromeos",
            TargetOs::Linux => "linux",
            TargetOs::Mac => "mac",
            TargetOs::MacArm => "mac_arm",
            TargetOs::Windows => "windows",
        }
    }
}

impl FromStr for TargetOs {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chromeos" => Ok(TargetOs::ChromeOs),
            "linux" => Ok(TargetOs::Linux),
            "mac" => Ok(TargetOs::Mac),
            "mac_arm" => Ok(TargetOs::MacArm),
            "windows" => Ok(TargetOs::Windows),
            _ => Err(LookupError::InvalidTargetOs(s.to_string())),
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which download the caller wants
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Utility {
    /// Full Android Studio IDE
    #[default]
    Studio,
    /// Command-line tools only
    Cli,
}

impl Utility {
    /// All supported utilities
    pub const ALL: [Utility; 2] = [Utility::Studio, Utility::Cli];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Utility::Studio => "studio",
            Utility::Cli => "cli",
        }
    }
}

impl FromStr for Utility {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "studio" => Ok(Utility::Studio),
            "cli" => Ok(Utility::Cli),
            _ => Err(LookupError::InvalidUtility(s.to_string())),
        }
    }
}

impl std::fmt::Display for Utility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a missing checksum fails the lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChecksumMode {
    /// No checksum row is a `NotFound` error
    #[default]
    Required,
    /// No checksum row yields `checksum: None`
    Optional,
}

/// Request for download metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionRequest {
    /// Target operating system (default: linux)
    #[serde(default)]
    pub target_os: TargetOs,

    /// Full studio or command-line tools only (default: studio)
    #[serde(default)]
    pub utility: Utility,
}

impl ExtractionRequest {
    /// Create a new request
    pub fn new(target_os: TargetOs, utility: Utility) -> Self {
        Self { target_os, utility }
    }

    /// Parse a request from loosely typed terms, e.g. `("mac", "cli")`
    pub fn from_terms(target_os: &str, utility: &str) -> Result<Self, LookupError> {
        Ok(Self {
            target_os: target_os.parse()?,
            utility: utility.parse()?,
        })
    }
}

/// Download metadata extracted from the source page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionResult {
    /// SHA-256 checksum of the download, "Unavailable" if the page had none
    #[serde(
        serialize_with = "serialize_checksum",
        deserialize_with = "deserialize_checksum",
        default
    )]
    pub checksum: Option<String>,

    /// Download file name
    pub filename: String,

    /// Download URL
    pub url: String,

    /// Version number derived from the URL
    pub version: String,
}

fn serialize_checksum<S: Serializer>(
    checksum: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(checksum.as_deref().unwrap_or(UNAVAILABLE))
}

fn deserialize_checksum<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let checksum = Option::<String>::deserialize(deserializer)?;
    Ok(checksum.filter(|c| c.as_str() != UNAVAILABLE))
}

impl ExtractionResult {
    /// Checksum, or "Unavailable"
    pub fn checksum_or_unavailable(&self) -> &str {
        self.checksum.as_deref().unwrap_or(UNAVAILABLE)
    }

    /// Join fields as `version, url, filename, checksum` with `separator`
    pub fn to_delimited(&self, separator: &str) -> String {
        [
            self.version.as_str(),
            self.url.as_str(),
            self.filename.as_str(),
            self.checksum_or_unavailable(),
        ]
        .join(separator)
    }
}
