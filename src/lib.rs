//! Jakartacheck - Jakarta EE annotation checker.
//!
//! Jakartacheck validates annotated Java components against the rules of
//! the Jakarta EE specifications (CDI, JAX-RS, Persistence, Servlet, ...)
//! and offers quick fixes that rewrite the offending declarations.
//!
//! # Architecture
//!
//! - `model`: tree-sitter based Java model, element keys and workspace
//! - `diagnostics`: diagnostic types and the aggregator running rule participants
//! - `rules`: one rule participant per Jakarta domain
//! - `proposals`: correction proposals computing text edits
//! - `quickfix`: the propose / resolve code-action protocol
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! # Adding a New Rule
//!
//! Add a code to the domain's `error_codes!` enumeration, report it from the
//! domain participant in `src/rules/`, and register quick fixes for it in
//! `src/quickfix/registry.rs`.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod proposals;
pub mod quickfix;
pub mod report;
pub mod rules;

pub use config::{ClientConfig, Config};
pub use diagnostics::{
    CancellationToken, Diagnostic, DiagnosticsAggregator, Domain, ErrorCode, Severity,
};
pub use model::{CompilationUnit, ElementKey, TextRange, Workspace};
pub use proposals::{apply_edits, EditComputationError, TextEdit};
pub use quickfix::{CodeAction, CodeActionService, WorkspaceEdit};
