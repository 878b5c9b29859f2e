//! Quick fixes: the two-phase code-action protocol.
//!
//! Propose is cheap: participants registered for a diagnostic's code return
//! unresolved [`CodeAction`]s carrying [`ResolveData`]. Resolve locates the
//! target declaration again by its element key, rebuilding the unit from
//! the current text when the cached one is stale, and asks the participant
//! for a correction proposal that computes the edits.

mod action;
mod fixes;
mod participant;
mod registry;
mod service;

pub use action::{CodeAction, ResolveData, TextDocumentEdit, WorkspaceEdit, QUICKFIX_KIND};
pub use fixes::{
    AddAttributeFix, AddConstructorFix, AttributeSet, ChangeReturnTypeFix, ModifierFix,
    ParametersMode, PrefixSlashFix, RemoveAnnotationFix, RemoveAttributeFix, RemoveMode,
    RemoveParametersFix, RemoveThrownExceptionsFix, SupertypeFix,
};
pub use participant::{ProposeContext, QuickFixParticipant};
pub use registry::{registry, QuickFixRegistry};
pub use service::CodeActionService;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::diagnostics::{CancellationToken, Diagnostic, DiagnosticsAggregator};
    use crate::model::{TextRange, Workspace};
    use crate::proposals::{apply_edits, EditComputationError};

    const URI: &str = "mem:///Test.java";

    fn diagnose(ws: &Workspace) -> Vec<Diagnostic> {
        let outcome = DiagnosticsAggregator::with_defaults().diagnose(
            ws,
            &[URI.to_string()],
            None,
            &CancellationToken::new(),
        );
        outcome.files.into_iter().flat_map(|f| f.diagnostics).collect()
    }

    fn actions_for(ws: &Workspace, code: &str) -> (Diagnostic, Vec<CodeAction>) {
        let diagnostic = diagnose(ws).into_iter().find(|d| d.code == code).unwrap();
        let actions = CodeActionService::new(ws)
            .propose(URI, diagnostic.range, &diagnostic, ClientConfig::default())
            .unwrap();
        (diagnostic, actions)
    }

    fn apply(ws: &Workspace, action: CodeAction) -> String {
        let resolved = CodeActionService::new(ws).resolve(action).unwrap();
        let edits = resolved.edit.unwrap().edits_for(URI);
        apply_edits(&ws.text(URI).unwrap(), &edits).unwrap()
    }

    #[test]
    fn test_propose_is_unresolved_and_titled() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    @Inject\n    final String s = \"\";\n}\n",
        )]);
        let (_, actions) = actions_for(&ws, "RemoveInjectOrFinal");
        let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Remove @Inject", "Remove the 'final' modifier"]);
        assert!(actions.iter().all(|a| !a.is_resolved() && a.kind == QUICKFIX_KIND));
        assert_eq!(actions[0].data.as_ref().unwrap().element.to_string(), "A#s");
    }

    #[test]
    fn test_resolve_removes_annotation() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    @Inject\n    final String s = \"\";\n}\n",
        )]);
        let (_, actions) = actions_for(&ws, "RemoveInjectOrFinal");
        assert_eq!(
            apply(&ws, actions[0].clone()),
            "import jakarta.inject.Inject;\nclass A {\n    final String s = \"\";\n}\n"
        );
        assert_eq!(
            apply(&ws, actions[1].clone()),
            "import jakarta.inject.Inject;\nclass A {\n    @Inject\n    String s = \"\";\n}\n"
        );
    }

    #[test]
    fn test_resolve_after_edit_rebuilds_unit() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    @Inject final String s = \"\";\n}\n",
        )]);
        let (_, actions) = actions_for(&ws, "RemoveInjectOrFinal");

        // an unrelated edit moves the field down
        ws.write_document(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    int counter;\n    @Inject final String s = \"\";\n}\n",
        )
        .unwrap();
        assert_eq!(
            apply(&ws, actions[1].clone()),
            "import jakarta.inject.Inject;\nclass A {\n    int counter;\n    @Inject String s = \"\";\n}\n"
        );
    }

    #[test]
    fn test_propose_after_edit_uses_current_declarations() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    @Inject final String s = \"\";\n}\n",
        )]);
        actions_for(&ws, "RemoveInjectOrFinal");

        ws.write_document(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    String s;\n    @Inject final String t = \"\";\n}\n",
        )
        .unwrap();
        let (_, actions) = actions_for(&ws, "RemoveInjectOrFinal");
        assert_eq!(actions[0].data.as_ref().unwrap().element.to_string(), "A#t");
    }

    #[test]
    fn test_resolve_errors() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.inject.Inject;\nclass A {\n    @Inject final String s = \"\";\n}\n",
        )]);
        let service = CodeActionService::new(&ws);
        let (_, actions) = actions_for(&ws, "RemoveInjectOrFinal");

        let mut missing = actions[0].clone();
        missing.data = None;
        assert_eq!(
            service.resolve(missing).unwrap_err(),
            EditComputationError::MissingResolveData
        );

        let mut unknown = actions[0].clone();
        if let Some(data) = unknown.data.as_mut() {
            data.participant = "jakarta.di.Nope".to_string();
        }
        assert!(matches!(
            service.resolve(unknown),
            Err(EditComputationError::UnknownParticipant(_))
        ));

        ws.write_document(URI, "class B {}").unwrap();
        assert!(matches!(
            service.resolve(actions[0].clone()),
            Err(EditComputationError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_data_round_trips_through_json() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.enterprise.context.*;\n@RequestScoped\n@SessionScoped\nclass A {}\n",
        )]);
        let (_, actions) = actions_for(&ws, "InvalidNumberOfScopedAnnotationsByManagedBean");
        assert_eq!(actions.len(), 2);
        let json = serde_json::to_string(&actions[0]).unwrap();
        let back: CodeAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, actions[0]);
        assert_eq!(
            apply(&ws, back),
            "import jakarta.enterprise.context.*;\n@RequestScoped\nclass A {}\n"
        );
    }

    #[test]
    fn test_document_changes_capability() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.websocket.server.ServerEndpoint;\n@ServerEndpoint(\"chat\")\nclass A {}\n",
        )]);
        let diagnostic = diagnose(&ws)
            .into_iter()
            .find(|d| d.code == "InvalidEndpointPathWithNoStartingSlash")
            .unwrap();
        let service = CodeActionService::new(&ws);
        let actions = service
            .propose(
                URI,
                TextRange::new(0, 0),
                &diagnostic,
                ClientConfig {
                    document_changes: true,
                },
            )
            .unwrap();
        let resolved = service.resolve(actions[0].clone()).unwrap();
        let edit = resolved.edit.unwrap();
        assert!(edit.changes.is_none());
        assert_eq!(
            apply_edits(&ws.text(URI).unwrap(), &edit.edits_for(URI)).unwrap(),
            "import jakarta.websocket.server.ServerEndpoint;\n@ServerEndpoint(\"/chat\")\nclass A {}\n"
        );
    }

    #[test]
    fn test_relevance_orders_lifecycle_fixes() {
        let ws = Workspace::in_memory([(
            URI,
            "import jakarta.annotation.PostConstruct;\nclass A {\n    @PostConstruct\n    public void init(int x) {}\n}\n",
        )]);
        let (_, actions) = actions_for(&ws, "PostConstructParams");
        let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Remove all parameters", "Remove @PostConstruct"]);
        assert_eq!(
            apply(&ws, actions[0].clone()),
            "import jakarta.annotation.PostConstruct;\nclass A {\n    @PostConstruct\n    public void init() {}\n}\n"
        );
    }
}
