//! Diagnostics engine.
//!
//! Rule participants scan compilation units and report [`Diagnostic`]s; the
//! [`DiagnosticsAggregator`] runs them in a fixed order over a batch of files.

mod aggregator;
mod participant;
mod types;

pub use aggregator::{CancellationToken, DiagnosticsAggregator};
pub use participant::{DiagnosticsContext, RuleParticipant};
pub(crate) use types::error_codes;
pub use types::{
    data_strings, DiagnoseOutcome, Diagnostic, Domain, ErrorCode, FileDiagnostics, Severity,
};
