//! End-to-end quick-fix tests: diagnose, propose, resolve, apply, re-diagnose.

use std::path::PathBuf;

use jakartacheck::config::ClientConfig;
use jakartacheck::diagnostics::{CancellationToken, Diagnostic, DiagnosticsAggregator};
use jakartacheck::model::Workspace;
use jakartacheck::proposals::apply_edits;
use jakartacheck::quickfix::{CodeAction, CodeActionService};

fn fixture_text(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("jakarta")
        .join(name);
    std::fs::read_to_string(path).expect("should read fixture")
}

/// In-memory workspace holding one fixture under a `mem:` URI.
fn workspace_for(name: &str) -> (Workspace, String) {
    let uri = format!("mem:///{}", name);
    let ws = Workspace::in_memory([(uri.clone(), fixture_text(name))]);
    (ws, uri)
}

fn diagnose(ws: &Workspace, uri: &str) -> Vec<Diagnostic> {
    DiagnosticsAggregator::with_defaults()
        .diagnose_file(ws, uri, None, &CancellationToken::new())
        .unwrap_or_default()
}

fn propose(ws: &Workspace, uri: &str, diagnostic: &Diagnostic) -> Vec<CodeAction> {
    CodeActionService::new(ws)
        .propose(uri, diagnostic.range, diagnostic, ClientConfig::default())
        .unwrap()
}

/// Resolve `action`, apply it, and store the result in the workspace.
fn apply(ws: &Workspace, uri: &str, action: CodeAction) -> String {
    let resolved = CodeActionService::new(ws).resolve(action).unwrap();
    let edits = resolved.edit.unwrap().edits_for(uri);
    let fixed = apply_edits(&ws.text(uri).unwrap(), &edits).unwrap();
    ws.write_document(uri, &fixed).unwrap();
    fixed
}

fn action_titled(actions: Vec<CodeAction>, title: &str) -> CodeAction {
    let titles: Vec<String> = actions.iter().map(|a| a.title.clone()).collect();
    actions
        .into_iter()
        .find(|a| a.title == title)
        .unwrap_or_else(|| panic!("no action {:?} in {:?}", title, titles))
}

fn has_code(diagnostics: &[Diagnostic], code: &str) -> bool {
    diagnostics.iter().any(|d| d.code == code)
}

#[test]
fn test_entity_protected_constructor_clears_diagnostic() {
    let (ws, uri) = workspace_for("Customer.java");
    let diagnostics = diagnose(&ws, &uri);
    let actions = propose(&ws, &uri, &diagnostics[0]);
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Add a no-arg protected constructor to this class",
            "Add a no-arg public constructor to this class",
        ]
    );

    let fixed = apply(&ws, &uri, actions[0].clone());
    assert!(fixed.contains("public class Customer {\n    protected Customer() {\n    }\n"));
    assert!(diagnose(&ws, &uri).is_empty());
}

#[test]
fn test_private_no_arg_constructor_gains_visibility() {
    let (ws, uri) = workspace_for("Account.java");
    let diagnostics = diagnose(&ws, &uri);
    let action = action_titled(
        propose(&ws, &uri, &diagnostics[0]),
        "Add a no-arg public constructor to this class",
    );
    let fixed = apply(&ws, &uri, action);
    assert!(fixed.contains("    public Account() {\n"));
    assert!(!fixed.contains("private Account()"));
    assert!(diagnose(&ws, &uri).is_empty());
}

#[test]
fn test_jsonb_conflict_fixed_from_either_side() {
    // removing @JsonbTransient from the field
    let (ws, uri) = workspace_for("Profile.java");
    let diagnostics = diagnose(&ws, &uri);
    let field_side = &diagnostics[0];
    let action = action_titled(propose(&ws, &uri, field_side), "Remove @JsonbTransient");
    let fixed = apply(&ws, &uri, action);
    assert!(!fixed.contains("@JsonbTransient\n"));
    assert!(!has_code(&diagnose(&ws, &uri), "JSONBAccessorConflict"));

    // removing @JsonbProperty from the getter
    let (ws, uri) = workspace_for("Profile.java");
    let diagnostics = diagnose(&ws, &uri);
    let getter_side = &diagnostics[1];
    let action = action_titled(propose(&ws, &uri, getter_side), "Remove @JsonbProperty");
    let fixed = apply(&ws, &uri, action);
    assert!(!fixed.contains("@JsonbProperty(\"nick\")"));
    assert!(!has_code(&diagnose(&ws, &uri), "JSONBAccessorConflict"));
}

#[test]
fn test_transient_siblings_removed_in_one_edit() {
    let (ws, uri) = workspace_for("Settings.java");
    let diagnostics = diagnose(&ws, &uri);
    let actions = propose(&ws, &uri, &diagnostics[0]);
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Remove @JsonbTransient", "Remove @JsonbProperty, @JsonbNillable"]
    );

    let resolved = CodeActionService::new(&ws).resolve(actions[1].clone()).unwrap();
    let edits = resolved.edit.unwrap().edits_for(&uri);
    assert_eq!(edits.len(), 1);

    let fixed = apply_edits(&ws.text(&uri).unwrap(), &edits).unwrap();
    assert!(fixed.contains("    @JsonbTransient\n    private String theme;"));
    assert!(!fixed.contains("@JsonbNillable"));
}

#[test]
fn test_prefix_slash_is_idempotent() {
    let (ws, uri) = workspace_for("ChatEndpoint.java");
    let diagnostics = diagnose(&ws, &uri);
    let actions = propose(&ws, &uri, &diagnostics[0]);
    assert_eq!(actions[0].title, "Prefix value with '/'");

    let first = apply(&ws, &uri, actions[0].clone());
    assert!(first.contains("@ServerEndpoint(\"/chat\")"));
    assert!(diagnose(&ws, &uri).is_empty());

    // replaying the stale action must not add a second slash
    let second = apply(&ws, &uri, actions[0].clone());
    assert_eq!(first, second);
}

#[test]
fn test_lifecycle_parameters_removed() {
    let (ws, uri) = workspace_for("Warmup.java");
    let diagnostics = diagnose(&ws, &uri);
    let actions = propose(&ws, &uri, &diagnostics[0]);
    assert_eq!(actions[0].title, "Remove all parameters");
    let fixed = apply(&ws, &uri, actions[0].clone());
    assert!(fixed.contains("    @PostConstruct\n    public void init() {\n"));
    assert!(diagnose(&ws, &uri).is_empty());
}

#[test]
fn test_resolve_data_survives_json_round_trip() {
    let (ws, uri) = workspace_for("ShoppingCart.java");
    let diagnostics = diagnose(&ws, &uri);
    let actions = propose(&ws, &uri, &diagnostics[0]);
    assert_eq!(actions.len(), 2);

    let service = CodeActionService::new(&ws);
    for action in actions {
        let direct = service.resolve(action.clone()).unwrap();
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "quickfix");
        assert!(json.get("edit").is_none());

        let back: CodeAction = serde_json::from_value(json).unwrap();
        let via_json = service.resolve(back).unwrap();
        assert_eq!(direct.edit, via_json.edit);
    }
}

#[test]
fn test_keep_one_scope_leaves_the_other() {
    let (ws, uri) = workspace_for("ShoppingCart.java");
    let diagnostics = diagnose(&ws, &uri);
    let action = action_titled(propose(&ws, &uri, &diagnostics[0]), "Remove @SessionScoped");
    let fixed = apply(&ws, &uri, action);
    assert!(fixed.contains("@RequestScoped\npublic class ShoppingCart"));
    assert!(!fixed.contains("@SessionScoped\n"));
    assert!(diagnose(&ws, &uri).is_empty());
}
