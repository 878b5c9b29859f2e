//! Output formatting for jakartacheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Domain, Severity};
use crate::model::LineIndex;

/// A diagnostic with its 1-based position.
#[derive(Debug, Clone)]
pub struct LocatedDiagnostic {
    pub diagnostic: Diagnostic,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// Diagnostics of one scanned file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path as shown to the user.
    pub path: String,
    pub diagnostics: Vec<LocatedDiagnostic>,
}

impl FileReport {
    /// Locate `diagnostics` in `text`.
    pub fn new(path: impl Into<String>, text: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let index = LineIndex::new(text);
        let diagnostics = diagnostics
            .into_iter()
            .map(|d| {
                let (line, column) = index.line_col(d.range.start);
                let (end_line, end_column) = index.line_col(d.range.end);
                LocatedDiagnostic {
                    diagnostic: d,
                    line,
                    column,
                    end_line,
                    end_column,
                }
            })
            .collect();
        Self {
            path: path.into(),
            diagnostics,
        }
    }
}

/// Result of a lint run.
#[derive(Debug, Clone, Default)]
pub struct LintResult {
    pub files_scanned: usize,
    pub files: Vec<FileReport>,
}

impl LintResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = (&FileReport, &LocatedDiagnostic)> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().map(move |d| (f, d)))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics()
            .filter(|(_, d)| d.diagnostic.severity == severity)
            .count()
    }

    /// Passed when there are no error-severity diagnostics.
    pub fn passed(&self) -> bool {
        self.count(Severity::Error) == 0
    }
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub passed: bool,
    pub files_scanned: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub source: String,
    pub code: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Build the JSON report for a run.
pub fn json_report(path: &str, config_path: Option<&str>, result: &LintResult) -> JsonReport {
    let diagnostics = result
        .diagnostics()
        .map(|(file, d)| JsonDiagnostic {
            source: d.diagnostic.source.clone(),
            code: d.diagnostic.code.clone(),
            severity: d.diagnostic.severity.to_string(),
            file: file.path.clone(),
            line: d.line,
            column: d.column,
            end_line: d.end_line,
            end_column: d.end_column,
            message: d.diagnostic.message.clone(),
            data: d.diagnostic.data.clone(),
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.map(str::to_string),
        passed: result.passed(),
        files_scanned: result.files_scanned,
        errors: result.count(Severity::Error),
        warnings: result.count(Severity::Warning),
        diagnostics,
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, config_path: Option<&str>, result: &LintResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(path, config_path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "jakartacheck";
const INFO_URI: &str = "https://github.com/zen-systems/jakartacheck";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "helpUri", skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
    #[serde(rename = "endLine")]
    pub end_line: usize,
    #[serde(rename = "endColumn")]
    pub end_column: usize,
}

/// SARIF rule id: `<source>/<code>`.
fn rule_id(d: &Diagnostic) -> String {
    format!("{}/{}", d.source, d.code)
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.to_string_lossy().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // single file scan
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Build the SARIF report for a run.
pub fn sarif_report(base_path: &Path, result: &LintResult) -> SarifReport {
    let rule_ids: BTreeSet<(String, String, String)> = result
        .diagnostics()
        .map(|(_, d)| {
            (
                rule_id(&d.diagnostic),
                d.diagnostic.source.clone(),
                d.diagnostic.code.clone(),
            )
        })
        .collect();

    let rules: Vec<SarifRule> = rule_ids
        .into_iter()
        .map(|(id, source, code)| {
            let domain = Domain::parse(&source).map(|d| d.short_name()).unwrap_or("");
            SarifRule {
                id,
                name: code.clone(),
                short_description: SarifMessage {
                    text: format!("{} rule {}", source, code),
                },
                help_uri: Some(format!("{}#{}", INFO_URI, domain)),
                default_config: SarifRuleConfig {
                    level: "error".to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = result
        .diagnostics()
        .map(|(file, d)| SarifResult {
            rule_id: rule_id(&d.diagnostic),
            level: map_severity_to_level(d.diagnostic.severity).to_string(),
            message: SarifMessage {
                text: d.diagnostic.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&file.path, base_path),
                    },
                    region: SarifRegion {
                        start_line: d.line,
                        start_column: d.column,
                        end_line: d.end_line,
                        end_column: d.end_column,
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&sarif_report(base_path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, result: &LintResult) {
    println!();
    print!("  ");
    print!("{}", "jakartacheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    if let Some(config) = config_path {
        print!("  {}", "Config:   ".dimmed());
        println!("{}", config);
    }
    println!();

    let total = result.diagnostics().count();
    if total > 0 {
        println!("  {} ({}):", "Diagnostics".bold(), total);
        println!();
        for (file, d) in result.diagnostics() {
            write_diagnostic(file, d);
        }
    }

    write_final_status(result);
    println!();
}

fn write_diagnostic(file: &FileReport, d: &LocatedDiagnostic) {
    write_severity_tag(d.diagnostic.severity);
    print!("   ");
    print!("{:<44}", d.diagnostic.code.dimmed());
    print!("{}", file.path.blue());
    print!("{}", format!(":{}:{}", d.line, d.column).dimmed());
    println!();

    println!("            {}", d.diagnostic.message);
    println!();
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_final_status(result: &LintResult) {
    print!(
        "  {}",
        format!("Files: {}", result.files_scanned).dimmed()
    );
    print!("  Errors: {}", result.count(Severity::Error));
    print!("  Warnings: {}", result.count(Severity::Warning));
    print!("  ");

    if result.passed() {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}
