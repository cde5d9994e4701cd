//! Pattern tables for the Android Studio download page
//!
//! Each table maps `(Utility, TargetOs)` to one regular expression whose
//! first capture group is the value of interest. The patterns are tuned to
//! the download table markup on developer.android.com and are deliberately
//! narrow; they are not a general HTML parser.
//!
//! A table also carries one default entry per utility. [`PatternTable::select`]
//! uses it for any combination that has no row of its own. This mirrors the
//! long-standing lookup behavior (unknown combinations resolve to the Linux
//! package) and is kept for compatibility even though failing loudly would
//! arguably be better.

use crate::types::{TargetOs, Utility};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

const STUDIO_CHROMEOS_URL: &str = r"(https?://.*cros\.deb)";
const STUDIO_LINUX_URL: &str = r"(https?://.*linux\.tar\.gz)";
const STUDIO_MAC_URL: &str = r"(https?://.*mac\.dmg)";
const STUDIO_MAC_ARM_URL: &str = r"(https?://.*mac_arm\.dmg)";
const STUDIO_WINDOWS_URL: &str = r"(https?://.*windows\.exe)";
const CLI_LINUX_URL: &str = r"(https?://.*commandlinetools-linux.*_latest\.zip)";
const CLI_MAC_URL: &str = r"(https?://.*commandlinetools-mac.*_latest\.zip)";
const CLI_WINDOWS_URL: &str = r"(https?://.*commandlinetools-win.*_latest\.zip)";

/// Tail shared by every checksum row: close the button cell, skip the size
/// cell, capture the digest cell.
macro_rules! checksum_row {
    ($file:literal) => {
        concat!(
            $file,
            r"</button>\s*</td>\s*<td>[^<]*</td>\s*<td>([0-9a-f]{64})</td>"
        )
    };
}

const STUDIO_CHROMEOS_CHECKSUM: &str = checksum_row!(r"android-studio-.*-cros\.deb");
const STUDIO_LINUX_CHECKSUM: &str = checksum_row!(r"android-studio-.*-linux\.tar\.gz");
const STUDIO_MAC_CHECKSUM: &str = checksum_row!(r"android-studio-.*-mac\.dmg");
const STUDIO_MAC_ARM_CHECKSUM: &str = checksum_row!(r"android-studio-.*-mac_arm\.dmg");
// The Windows installer row is flagged "Recommended" under the button.
const STUDIO_WINDOWS_CHECKSUM: &str = r"android-studio-.*-windows\.exe</button>\s*<br>\s*Recommended\s*</td>\s*<td>[^<]*</td>\s*<td>([0-9a-f]{64})</td>";
const CLI_LINUX_CHECKSUM: &str = checksum_row!(r"commandlinetools-linux-.*_latest\.zip");
const CLI_MAC_CHECKSUM: &str = checksum_row!(r"commandlinetools-mac-.*_latest\.zip");
const CLI_WINDOWS_CHECKSUM: &str = checksum_row!(r"commandlinetools-win-.*_latest\.zip");

/// One table row: `(utility, os, pattern)`
pub type PatternRow = (Utility, TargetOs, &'static str);

/// Download URL rows. ChromeOS has no command-line package of its own, so
/// cli/chromeos resolves to the Linux archive.
pub const URL_ROWS: &[PatternRow] = &[
    (Utility::Studio, TargetOs::ChromeOs, STUDIO_CHROMEOS_URL),
    (Utility::Studio, TargetOs::Linux, STUDIO_LINUX_URL),
    (Utility::Studio, TargetOs::Mac, STUDIO_MAC_URL),
    (Utility::Studio, TargetOs::MacArm, STUDIO_MAC_ARM_URL),
    (Utility::Studio, TargetOs::Windows, STUDIO_WINDOWS_URL),
    (Utility::Cli, TargetOs::ChromeOs, CLI_LINUX_URL),
    (Utility::Cli, TargetOs::Linux, CLI_LINUX_URL),
    (Utility::Cli, TargetOs::Mac, CLI_MAC_URL),
    (Utility::Cli, TargetOs::MacArm, CLI_MAC_URL),
    (Utility::Cli, TargetOs::Windows, CLI_WINDOWS_URL),
];

/// Checksum rows, aliased the same way as [`URL_ROWS`]
pub const CHECKSUM_ROWS: &[PatternRow] = &[
    (Utility::Studio, TargetOs::ChromeOs, STUDIO_CHROMEOS_CHECKSUM),
    (Utility::Studio, TargetOs::Linux, STUDIO_LINUX_CHECKSUM),
    (Utility::Studio, TargetOs::Mac, STUDIO_MAC_CHECKSUM),
    (Utility::Studio, TargetOs::MacArm, STUDIO_MAC_ARM_CHECKSUM),
    (Utility::Studio, TargetOs::Windows, STUDIO_WINDOWS_CHECKSUM),
    (Utility::Cli, TargetOs::ChromeOs, CLI_LINUX_CHECKSUM),
    (Utility::Cli, TargetOs::Linux, CLI_LINUX_CHECKSUM),
    (Utility::Cli, TargetOs::Mac, CLI_MAC_CHECKSUM),
    (Utility::Cli, TargetOs::MacArm, CLI_MAC_CHECKSUM),
    (Utility::Cli, TargetOs::Windows, CLI_WINDOWS_CHECKSUM),
];

/// Process-wide URL table
pub static URL_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::from_rows("url", URL_ROWS, STUDIO_LINUX_URL, CLI_LINUX_URL)
});

/// Process-wide checksum table
pub static CHECKSUM_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::from_rows(
        "checksum",
        CHECKSUM_ROWS,
        STUDIO_LINUX_CHECKSUM,
        CLI_LINUX_CHECKSUM,
    )
});

/// Compiled patterns keyed by `(utility, os)` with a per-utility default
#[derive(Debug)]
pub struct PatternTable {
    name: &'static str,
    entries: HashMap<(Utility, TargetOs), Regex>,
    studio_default: Regex,
    cli_default: Regex,
}

impl PatternTable {
    /// Compile a table from literal rows
    ///
    /// Panics if a pattern does not compile. All patterns are constants
    /// checked by the test suite.
    pub fn from_rows(
        name: &'static str,
        rows: &[PatternRow],
        studio_default: &str,
        cli_default: &str,
    ) -> Self {
        let entries = rows
            .iter()
            .map(|(utility, os, pattern)| ((*utility, *os), compile(pattern)))
            .collect();

        Self {
            name,
            entries,
            studio_default: compile(studio_default),
            cli_default: compile(cli_default),
        }
    }

    /// Table name (for logging)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of explicit rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no explicit rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default pattern for a utility
    pub fn default_for(&self, utility: Utility) -> &Regex {
        match utility {
            Utility::Studio => &self.studio_default,
            Utility::Cli => &self.cli_default,
        }
    }

    /// Pattern for `(utility, os)`, or the utility's default entry if the
    /// combination has no row
    pub fn select(&self, utility: Utility, os: TargetOs) -> &Regex {
        match self.entries.get(&(utility, os)) {
            Some(pattern) => pattern,
            None => {
                debug!(
                    table = self.name,
                    %utility,
                    target_os = %os,
                    "No pattern row, using utility default"
                );
                self.default_for(utility)
            }
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_every_combination() {
        for utility in Utility::ALL {
            for os in TargetOs::ALL {
                assert!(URL_PATTERNS.entries.contains_key(&(utility, os)));
                assert!(CHECKSUM_PATTERNS.entries.contains_key(&(utility, os)));
            }
        }
        assert_eq!(URL_PATTERNS.len(), 10);
        assert_eq!(CHECKSUM_PATTERNS.len(), 10);
    }

    #[test]
    fn test_cli_chromeos_aliases_linux() {
        assert_eq!(
            URL_PATTERNS.select(Utility::Cli, TargetOs::ChromeOs).as_str(),
            URL_PATTERNS.select(Utility::Cli, TargetOs::Linux).as_str()
        );
        assert_eq!(
            CHECKSUM_PATTERNS
                .select(Utility::Cli, TargetOs::ChromeOs)
                .as_str(),
            CHECKSUM_PATTERNS.select(Utility::Cli, TargetOs::Linux).as_str()
        );
    }

    #[test]
    fn test_studio_patterns_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for os in TargetOs::ALL {
            assert!(seen.insert(URL_PATTERNS.select(Utility::Studio, os).as_str()));
        }
    }

    #[test]
    fn test_missing_row_falls_back_to_default() {
        let table = PatternTable::from_rows(
            "partial",
            &[(Utility::Studio, TargetOs::Mac, STUDIO_MAC_URL)],
            STUDIO_LINUX_URL,
            CLI_LINUX_URL,
        );

        assert_eq!(table.select(Utility::Studio, TargetOs::Mac).as_str(), STUDIO_MAC_URL);
        assert_eq!(
            table.select(Utility::Studio, TargetOs::Windows).as_str(),
            STUDIO_LINUX_URL
        );
        assert_eq!(table.select(Utility::Cli, TargetOs::Mac).as_str(), CLI_LINUX_URL);
    }

    #[test]
    fn test_checksum_row_shape() {
        let pattern = CHECKSUM_PATTERNS.select(Utility::Studio, TargetOs::Linux);
        let digest = "0".repeat(64);
        let markup = format!(
            "android-studio-2024.1.1.11-linux.tar.gz</button>\n    </td>\n    <td>1.2 GB</td>\n    <td>{}</td>",
            digest
        );
        let caps = pattern.captures(&markup).unwrap();
        assert_eq!(&caps[1], digest);
    }

    #[test]
    fn test_mac_url_does_not_match_mac_arm_file() {
        let pattern = URL_PATTERNS.select(Utility::Studio, TargetOs::Mac);
        assert!(!pattern.is_match("https://host/android-studio-1-mac_arm.dmg"));
        assert!(pattern.is_match("https://host/android-studio-1-mac.dmg"));
    }
}
