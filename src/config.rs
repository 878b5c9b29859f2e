//! Configuration for jakartacheck.
//!
//! Configuration selects which rule domains and codes run, overrides
//! severities, and carries client capabilities through to code actions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Domain, Severity};

/// File names searched for in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["jakartacheck.yaml", ".jakartacheck.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Glob patterns for paths to exclude from analysis (e.g., "**/generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Whether to include test sources in analysis (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Domains to skip, by source tag or short name.
    #[serde(default)]
    pub disabled_domains: Vec<String>,
    #[serde(default)]
    pub disabled_codes: Vec<String>,
    /// Per-code severity overrides.
    #[serde(default)]
    pub severity: BTreeMap<String, Severity>,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Client capabilities passed through resolve data.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whether the client accepts versioned `documentChanges` edits.
    #[serde(default)]
    pub document_changes: bool,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Find a configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|g| g.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }

    pub fn is_domain_enabled(&self, domain: Domain) -> bool {
        !self
            .disabled_domains
            .iter()
            .any(|d| Domain::parse(d) == Some(domain))
    }

    pub fn is_code_enabled(&self, code: &str) -> bool {
        !self.disabled_codes.iter().any(|c| c == code)
    }

    /// Drop disabled codes and apply severity overrides.
    pub fn apply(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        diagnostics
            .into_iter()
            .filter(|d| self.is_code_enabled(&d.code))
            .map(|mut d| {
                if let Some(severity) = self.severity.get(&d.code) {
                    d.severity = *severity;
                }
                d
            })
            .collect()
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for domain in &config.disabled_domains {
        if Domain::parse(domain).is_none() {
            anyhow::bail!("unknown domain {:?} in disabled_domains", domain);
        }
    }

    for code in config.disabled_codes.iter().chain(config.severity.keys()) {
        if crate::rules::code_domain(code).is_none() {
            anyhow::bail!("unknown diagnostic code {:?}", code);
        }
    }

    // Validate excluded_paths glob patterns compile
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
