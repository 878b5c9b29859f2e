//! Runs rule participants over a batch of files.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::model::Workspace;

use super::{DiagnoseOutcome, Diagnostic, DiagnosticsContext, FileDiagnostics, RuleParticipant};

/// Shared cancellation flag, polled between participants and files.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Merges the diagnostics of every registered participant per file.
pub struct DiagnosticsAggregator<'p> {
    participants: &'p [Box<dyn RuleParticipant>],
}

impl DiagnosticsAggregator<'static> {
    /// Aggregator over the built-in rule participants.
    pub fn with_defaults() -> Self {
        Self::new(crate::rules::participants())
    }
}

impl<'p> DiagnosticsAggregator<'p> {
    pub fn new(participants: &'p [Box<dyn RuleParticipant>]) -> Self {
        Self { participants }
    }

    /// Diagnose `uris` in order. On cancellation only files that completed
    /// are returned.
    pub fn diagnose(
        &self,
        workspace: &Workspace,
        uris: &[String],
        config: Option<&Config>,
        cancel: &CancellationToken,
    ) -> DiagnoseOutcome {
        let mut outcome = DiagnoseOutcome::default();
        for uri in uris {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            match self.diagnose_file(workspace, uri, config, cancel) {
                Some(diagnostics) => outcome.files.push(FileDiagnostics {
                    uri: uri.clone(),
                    diagnostics,
                }),
                None => {
                    outcome.cancelled = true;
                    break;
                }
            }
        }
        if outcome.cancelled {
            debug!(
                completed = outcome.files.len(),
                requested = uris.len(),
                "diagnose request cancelled"
            );
        }
        outcome
    }

    /// Diagnose one file; `None` when cancelled part-way.
    pub fn diagnose_file(
        &self,
        workspace: &Workspace,
        uri: &str,
        config: Option<&Config>,
        cancel: &CancellationToken,
    ) -> Option<Vec<Diagnostic>> {
        let unit = match workspace.unit(uri) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(uri, error = %e, "skipping unreadable document");
                return Some(Vec::new());
            }
        };
        let ctx = DiagnosticsContext::new(workspace, &unit);

        let mut diagnostics = Vec::new();
        for participant in self.participants {
            if cancel.is_cancelled() {
                return None;
            }
            let domain = participant.domain();
            if config.map(|c| !c.is_domain_enabled(domain)).unwrap_or(false) {
                continue;
            }

            let result =
                panic::catch_unwind(AssertUnwindSafe(|| participant.collect_diagnostics(&ctx)));
            match result {
                Ok(Ok(found)) => diagnostics.extend(found),
                Ok(Err(e)) => {
                    warn!(uri, domain = domain.source(), error = %e, "rule participant failed");
                }
                Err(_) => {
                    warn!(uri, domain = domain.source(), "rule participant panicked");
                }
            }
        }

        Some(match config {
            Some(c) => c.apply(diagnostics),
            None => diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Domain, ErrorCode};
    use crate::model::TextRange;

    #[derive(Clone, Copy)]
    struct Code;

    impl ErrorCode for Code {
        fn domain(&self) -> Domain {
            Domain::Di
        }

        fn as_str(&self) -> &'static str {
            "Sample"
        }
    }

    struct Reporting;

    impl RuleParticipant for Reporting {
        fn domain(&self) -> Domain {
            Domain::Di
        }

        fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
            Ok(ctx
                .unit
                .types
                .iter()
                .map(|t| Diagnostic::new(Code, t.name_span, t.name.clone()))
                .collect())
        }
    }

    struct Failing;

    impl RuleParticipant for Failing {
        fn domain(&self) -> Domain {
            Domain::Cdi
        }

        fn collect_diagnostics(&self, _ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
            anyhow::bail!("model error")
        }
    }

    struct Panicking;

    impl RuleParticipant for Panicking {
        fn domain(&self) -> Domain {
            Domain::Jsonb
        }

        fn collect_diagnostics(&self, _ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
            panic!("boom")
        }
    }

    /// Cancels the shared token the first time it runs.
    struct Cancelling(CancellationToken);

    impl RuleParticipant for Cancelling {
        fn domain(&self) -> Domain {
            Domain::Servlet
        }

        fn collect_diagnostics(&self, _ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
            self.0.cancel();
            Ok(Vec::new())
        }
    }

    fn workspace() -> (Workspace, Vec<String>) {
        let ws = Workspace::in_memory([
            ("mem:///A.java", "class A {}"),
            ("mem:///B.java", "class B {}"),
        ]);
        (ws, vec!["mem:///A.java".to_string(), "mem:///B.java".to_string()])
    }

    #[test]
    fn test_failures_do_not_abort_siblings() {
        let (ws, uris) = workspace();
        let participants: Vec<Box<dyn RuleParticipant>> =
            vec![Box::new(Failing), Box::new(Panicking), Box::new(Reporting)];
        let aggregator = DiagnosticsAggregator::new(&participants);

        let outcome = aggregator.diagnose(&ws, &uris, None, &CancellationToken::new());
        assert!(!outcome.cancelled);
        assert_eq!(outcome.files.len(), 2);
        assert_eq!(outcome.files[0].diagnostics[0].message, "A");
        assert_eq!(outcome.files[1].diagnostics[0].message, "B");
        assert_eq!(outcome.files[0].diagnostics[0].range, TextRange::new(6, 7));
    }

    #[test]
    fn test_cancellation_keeps_only_completed_files() {
        let (ws, uris) = workspace();
        let token = CancellationToken::new();
        let participants: Vec<Box<dyn RuleParticipant>> =
            vec![Box::new(Cancelling(token.clone())), Box::new(Reporting)];
        let aggregator = DiagnosticsAggregator::new(&participants);

        let outcome = aggregator.diagnose(&ws, &uris, None, &token);
        assert!(outcome.cancelled);
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn test_cancelled_before_start() {
        let (ws, uris) = workspace();
        let token = CancellationToken::new();
        token.cancel();
        let participants: Vec<Box<dyn RuleParticipant>> = vec![Box::new(Reporting)];
        let outcome = DiagnosticsAggregator::new(&participants).diagnose(&ws, &uris, None, &token);
        assert!(outcome.cancelled);
        assert_eq!(outcome.diagnostic_count(), 0);
    }

    #[test]
    fn test_config_disables_domain() {
        let (ws, uris) = workspace();
        let participants: Vec<Box<dyn RuleParticipant>> = vec![Box::new(Reporting)];
        let config = Config {
            disabled_domains: vec!["di".to_string()],
            ..Default::default()
        };
        let outcome = DiagnosticsAggregator::new(&participants).diagnose(
            &ws,
            &uris,
            Some(&config),
            &CancellationToken::new(),
        );
        assert_eq!(outcome.files.len(), 2);
        assert_eq!(outcome.diagnostic_count(), 0);
    }

    #[test]
    fn test_unreadable_document_is_skipped() {
        let (ws, _) = workspace();
        let participants: Vec<Box<dyn RuleParticipant>> = vec![Box::new(Reporting)];
        let uris = vec!["mem:///Missing.java".to_string(), "mem:///A.java".to_string()];
        let outcome = DiagnosticsAggregator::new(&participants).diagnose(
            &ws,
            &uris,
            None,
            &CancellationToken::new(),
        );
        assert_eq!(outcome.files.len(), 2);
        assert!(outcome.files[0].diagnostics.is_empty());
        assert_eq!(outcome.files[1].diagnostics.len(), 1);
    }

    #[test]
    fn test_diagnose_sees_edited_text() {
        let ws = Workspace::in_memory([(
            "mem:///A.java",
            "import jakarta.inject.Inject;\nclass A {\n    @Inject final String s = \"\";\n}\n",
        )]);
        let uris = vec!["mem:///A.java".to_string()];
        let codes = |ws: &Workspace| -> Vec<String> {
            DiagnosticsAggregator::with_defaults()
                .diagnose(ws, &uris, None, &CancellationToken::new())
                .files
                .into_iter()
                .flat_map(|f| f.diagnostics)
                .map(|d| d.code)
                .collect()
        };
        assert_eq!(codes(&ws), vec!["RemoveInjectOrFinal"]);

        ws.write_document(
            "mem:///A.java",
            "import jakarta.inject.Inject;\nclass A {\n    @Inject String s = \"\";\n}\n",
        )
        .unwrap();
        assert!(codes(&ws).is_empty());
    }
}
