//! Command-line interface for jakartacheck.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{self, Config, CONFIG_FILE_NAMES};
use crate::diagnostics::{CancellationToken, Diagnostic, DiagnosticsAggregator};
use crate::model::{FileDocuments, LineIndex, TextRange, Workspace};
use crate::proposals::apply_edits;
use crate::quickfix::{CodeAction, CodeActionService};
use crate::report::{self, FileReport, LintResult};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Upper bound on diagnose / fix rounds per file.
const MAX_FIX_PASSES: usize = 16;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", "bin", "node_modules"];

/// Jakarta EE annotation checker.
///
/// Reports violations of the Jakarta EE component specifications in
/// annotated Java sources and offers quick fixes for them.
#[derive(Parser)]
#[command(name = "jakartacheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr (overrides JAKARTACHECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose Java sources
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// List the quick fixes available on a line
    Actions(ActionsArgs),
    /// Apply quick fixes until no fixable diagnostic remains
    Fix(FixArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the actions command.
#[derive(Parser)]
pub struct ActionsArgs {
    /// Java source file
    pub file: PathBuf,

    /// 1-based line to list actions for
    #[arg(short, long)]
    pub line: usize,

    /// Also compute and print each action's edits
    #[arg(long)]
    pub resolve: bool,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the fix command.
#[derive(Parser)]
pub struct FixArgs {
    /// Path to fix (file or directory)
    pub path: PathBuf,

    /// Print the fixed sources instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Only fix diagnostics with this code
    #[arg(long)]
    pub code: Option<String>,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "jakartacheck.yaml")]
    pub output: PathBuf,
}

const DEFAULT_CONFIG: &str = include_str!("templates/jakartacheck.yaml");

/// Load the explicit or discovered configuration, or the default one.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Config::discover(Path::new(".")),
    };
    let Some(path) = path else {
        debug!(
            "no configuration file found (looked for {})",
            CONFIG_FILE_NAMES.join(", ")
        );
        return Ok((Config::default(), None));
    };
    let config = Config::parse_file(&path)
        .map_err(|e| anyhow::anyhow!("error parsing {}: {}", path.display(), e))?;
    config::validate(&config).map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    Ok((config, Some(path)))
}

fn is_test_source(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == "test" || c.as_os_str() == "tests")
        || path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.ends_with("Test") || s.ends_with("Tests"))
            .unwrap_or(false)
}

/// Collect the Java sources under `root`.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && e.file_type().is_dir() {
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                    return false;
                }
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("java") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !config.should_include_test_files() && is_test_source(relative) {
            continue;
        }
        if config.is_path_excluded(relative) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Resolve a path argument to the files to process.
fn resolve_files(path: &Path, config: &Config) -> anyhow::Result<(PathBuf, Vec<PathBuf>)> {
    let abs_path = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", path, e))?;
    let files = if abs_path.is_dir() {
        collect_files(&abs_path, config)?
    } else {
        vec![abs_path.clone()]
    };
    Ok((abs_path, files))
}

fn uri_of(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Diagnose one document with the configuration applied.
fn diagnose(workspace: &Workspace, uri: &str, config: &Config) -> Vec<Diagnostic> {
    DiagnosticsAggregator::with_defaults()
        .diagnose_file(workspace, uri, Some(config), &CancellationToken::new())
        .unwrap_or_default()
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (config, config_path) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (abs_path, files) = match resolve_files(&args.path, &config) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        eprintln!("Warning: no Java files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let workspace = Workspace::new(FileDocuments::new(files.clone()));
    let loaded = workspace.load_all();
    debug!(loaded, "loaded documents");

    let uris: Vec<String> = files.iter().map(|f| uri_of(f)).collect();
    let outcome = DiagnosticsAggregator::with_defaults().diagnose(
        &workspace,
        &uris,
        Some(&config),
        &CancellationToken::new(),
    );

    let mut result = LintResult {
        files_scanned: outcome.files.len(),
        files: Vec::new(),
    };
    for file in outcome.files {
        if file.diagnostics.is_empty() {
            continue;
        }
        let text = workspace.text(&file.uri)?;
        result
            .files
            .push(FileReport::new(file.uri, &text, file.diagnostics));
    }

    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    let path_str = args.path.to_string_lossy().to_string();

    match args.format.as_str() {
        "json" => report::write_json(&path_str, config_str.as_deref(), &result)?,
        "sarif" => report::write_sarif(&abs_path, &result)?,
        _ => report::write_pretty(&path_str, config_str.as_deref(), &result),
    }

    if result.passed() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the actions command.
pub fn run_actions(args: &ActionsArgs) -> anyhow::Result<i32> {
    let (config, _) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let path = match args.file.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.file, e);
            return Ok(EXIT_ERROR);
        }
    };

    let uri = uri_of(&path);
    let workspace = Workspace::new(FileDocuments::new(vec![path.clone()]));
    let text = workspace.text(&uri)?;
    let index = LineIndex::new(&text);
    let Some(range) = index.line_range(args.line) else {
        eprintln!("Error: line {} is out of range", args.line);
        return Ok(EXIT_ERROR);
    };

    let diagnostics: Vec<Diagnostic> = diagnose(&workspace, &uri, &config)
        .into_iter()
        .filter(|d| {
            let line = index.line_col(d.range.start).0;
            line == args.line || d.range.overlaps(range)
        })
        .collect();

    let service = CodeActionService::new(&workspace);
    let actions = service.propose_all(&uri, range, &diagnostics, config.client)?;
    if actions.is_empty() {
        println!("No quick fixes on line {}", args.line);
        return Ok(EXIT_SUCCESS);
    }

    for (i, action) in actions.into_iter().enumerate() {
        let code = action
            .diagnostics
            .first()
            .map(|d| d.code.clone())
            .unwrap_or_default();
        println!("{:>3}. {}  [{}]", i + 1, action.title, code);
        if !args.resolve {
            continue;
        }
        match service.resolve(action) {
            Ok(resolved) => {
                let edits = resolved
                    .edit
                    .map(|e| e.edits_for(&uri))
                    .unwrap_or_default();
                for edit in edits {
                    let (line, column) = index.line_col(edit.range.start);
                    println!(
                        "       {}:{} replace {:?} with {:?}",
                        line,
                        column,
                        &text[edit.range.start..edit.range.end],
                        edit.new_text
                    );
                }
            }
            Err(e) => println!("       failed: {}", e),
        }
    }
    Ok(EXIT_SUCCESS)
}

/// The first action proposed for any of `diagnostics` that resolves.
fn first_fix(
    service: &CodeActionService,
    uri: &str,
    diagnostics: &[Diagnostic],
    config: &Config,
) -> anyhow::Result<Option<CodeAction>> {
    for diagnostic in diagnostics {
        let actions = service.propose(uri, diagnostic.range, diagnostic, config.client)?;
        for action in actions {
            let title = action.title.clone();
            match service.resolve(action) {
                Ok(resolved) => return Ok(Some(resolved)),
                Err(e) => warn!(uri, title = title.as_str(), error = %e, "quick fix failed"),
            }
        }
    }
    Ok(None)
}

/// Fix one document in place; returns the number of fixes applied.
fn fix_document(
    workspace: &Workspace,
    uri: &str,
    config: &Config,
    only: Option<&str>,
) -> anyhow::Result<usize> {
    let service = CodeActionService::new(workspace);
    let mut applied = 0;
    let mut attempted: Vec<(String, TextRange)> = Vec::new();

    for _ in 0..MAX_FIX_PASSES {
        let diagnostics: Vec<Diagnostic> = diagnose(workspace, uri, config)
            .into_iter()
            .filter(|d| only.map(|c| d.code == c).unwrap_or(true))
            .filter(|d| !attempted.contains(&(d.code.clone(), d.range)))
            .collect();
        let Some(action) = first_fix(&service, uri, &diagnostics, config)? else {
            break;
        };
        if let Some(d) = action.diagnostics.first() {
            attempted.push((d.code.clone(), d.range));
        }

        let text = workspace.text(uri)?;
        let edits = action.edit.map(|e| e.edits_for(uri)).unwrap_or_default();
        let fixed = apply_edits(&text, &edits)?;
        if fixed == text {
            continue;
        }
        workspace.write_document(uri, &fixed)?;
        println!("  fixed: {} ({})", action.title, uri);
        applied += 1;
        attempted.clear();
    }
    Ok(applied)
}

/// Run the fix command.
pub fn run_fix(args: &FixArgs) -> anyhow::Result<i32> {
    let (config, _) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(code) = &args.code {
        if crate::rules::code_domain(code).is_none() {
            eprintln!("Error: unknown diagnostic code {:?}", code);
            return Ok(EXIT_ERROR);
        }
    }
    let (_, files) = match resolve_files(&args.path, &config) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // dry runs edit in-memory copies
    let workspace = if args.dry_run {
        let mut docs = Vec::new();
        for f in &files {
            docs.push((uri_of(f), std::fs::read_to_string(f)?));
        }
        Workspace::in_memory(docs)
    } else {
        Workspace::new(FileDocuments::new(files.clone()))
    };
    workspace.load_all();

    let mut total = 0;
    let mut remaining = 0;
    for file in &files {
        let uri = uri_of(file);
        let applied = fix_document(&workspace, &uri, &config, args.code.as_deref())?;
        total += applied;
        if args.dry_run && applied > 0 {
            println!("--- {}", uri);
            println!("{}", workspace.text(&uri)?);
        }
        remaining += diagnose(&workspace, &uri, &config)
            .iter()
            .filter(|d| d.is_error())
            .count();
    }

    println!("Applied {} fix(es); {} error(s) remain", total, remaining);
    if remaining == 0 {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_CONFIG) {
        eprintln!("Error: failed to write configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to disable domains or codes", args.output.display());
    println!("  2. Run: jakartacheck lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
