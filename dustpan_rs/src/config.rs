//! Configuration file support for dustpan.
//!
//! Loads optional `.dustpan/config.toml` from the project root. Every field has a
//! default, so an empty or missing file behaves exactly like the built-in setup.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{DustpanError, Result};
use crate::types::IdentityPolicy;

/// Path substrings excluded from every analysis, even if the upstream
/// collaborator already filtered them.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules/",
    ".git/",
    "dist/",
    "build/",
    ".next/",
    "coverage/",
];

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_FINGERPRINT_LINES: usize = 5;
pub const DEFAULT_FINGERPRINT_CHARS: usize = 200;

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DustpanConfig {
    pub analysis: AnalysisConfig,
    pub duplicates: DuplicatesConfig,
    pub exports: ExportsConfig,
    pub census: CensusConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run analyzers on scoped threads.
    pub parallel: bool,
    /// How extractors record a name that is declared more than once.
    /// Changing this changes reported counts.
    pub identity_policy: IdentityPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            identity_policy: IdentityPolicy::LastWriteWins,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DuplicatesConfig {
    /// Minimum fingerprint similarity for a group to count as copy-paste.
    pub threshold: f64,
    /// Source lines following a declaration that make up its fingerprint.
    pub fingerprint_lines: usize,
    /// Maximum fingerprint length in characters.
    pub fingerprint_chars: usize,
}

impl Default for DuplicatesConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            fingerprint_lines: DEFAULT_FINGERPRINT_LINES,
            fingerprint_chars: DEFAULT_FINGERPRINT_CHARS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportsConfig {
    /// Treat any token-boundary occurrence of an export name as a usage when no
    /// import list mentions it. Over-approximates usage for short, common names.
    pub token_fallback: bool,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            token_fallback: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    /// Path substrings whose files are dropped before analysis.
    pub exclude: Vec<String>,
    /// Glob patterns whose files are dropped before analysis.
    pub exclude_globs: Vec<String>,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            exclude_globs: Vec::new(),
        }
    }
}

impl DustpanConfig {
    /// Load config from `.dustpan/config.toml` in the given root directory.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".dustpan").join("config.toml");
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; falling back to defaults");
                Self::default()
            }
        }
    }

    /// Load config from a specific path, failing on unreadable or invalid files.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DustpanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| DustpanError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        for pattern in &config.census.exclude_globs {
            globset::Glob::new(pattern).map_err(|source| DustpanError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DustpanConfig::default();
        assert!(config.analysis.parallel);
        assert_eq!(config.analysis.identity_policy, IdentityPolicy::LastWriteWins);
        assert_eq!(config.duplicates.threshold, 0.7);
        assert_eq!(config.duplicates.fingerprint_lines, 5);
        assert!(config.exports.token_fallback);
        assert!(config.census.exclude.iter().any(|e| e == "node_modules/"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let config = DustpanConfig::load(temp.path());
        assert!(config.analysis.parallel);
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".dustpan");
        std::fs::create_dir_all(&dir).expect("create .dustpan");

        let mut file = std::fs::File::create(dir.join("config.toml")).expect("create config");
        writeln!(
            file,
            r#"
[analysis]
parallel = false
identity_policy = "first_write_wins"

[duplicates]
threshold = 0.9

[exports]
token_fallback = false

[census]
exclude_globs = ["**/*.stories.tsx"]
"#
        )
        .expect("write config");

        let config = DustpanConfig::load(temp.path());
        assert!(!config.analysis.parallel);
        assert_eq!(config.analysis.identity_policy, IdentityPolicy::FirstWriteWins);
        assert_eq!(config.duplicates.threshold, 0.9);
        assert_eq!(config.duplicates.fingerprint_lines, 5);
        assert!(!config.exports.token_fallback);
        assert_eq!(config.census.exclude_globs, vec!["**/*.stories.tsx"]);
        // Untouched sections keep their defaults.
        assert!(!config.census.exclude.is_empty());
    }

    #[test]
    fn test_load_invalid_config_falls_back() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".dustpan");
        std::fs::create_dir_all(&dir).expect("create .dustpan");
        std::fs::write(dir.join("config.toml"), "analysis = [broken").expect("write config");

        let config = DustpanConfig::load(temp.path());
        assert!(config.analysis.parallel);
    }

    #[test]
    fn test_load_from_path_reports_errors() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[census]\nexclude_globs = [\"a/[\"]\n").expect("write config");
        assert!(matches!(
            DustpanConfig::load_from_path(&path),
            Err(DustpanError::Glob { .. })
        ));

        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            DustpanConfig::load_from_path(&missing),
            Err(DustpanError::Io { .. })
        ));
    }
}
