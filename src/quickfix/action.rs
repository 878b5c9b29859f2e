//! Code action protocol types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::diagnostics::{data_strings, Diagnostic};
use crate::model::{ElementKey, TextRange};
use crate::proposals::TextEdit;

/// Kind of every action this crate proposes.
pub const QUICKFIX_KIND: &str = "quickfix";

/// A code action. Proposed actions carry `data` and no `edit`; resolving
/// fills in `edit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub kind: String,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResolveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<WorkspaceEdit>,
}

impl CodeAction {
    pub fn is_resolved(&self) -> bool {
        self.edit.is_some()
    }
}

/// Everything needed to locate the target again when the action is
/// resolved. Clients hold it verbatim between the two requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveData {
    pub uri: String,
    /// Id of the quick-fix participant that proposed the action.
    pub participant: String,
    pub code: String,
    /// The range of the original request.
    pub range: TextRange,
    pub element: ElementKey,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub capabilities: ClientConfig,
}

impl ResolveData {
    /// An extended entry read as a string list.
    pub fn strings(&self, key: &str) -> Vec<String> {
        data_strings(self.extended.get(key))
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.extended.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocumentEdit {
    pub uri: String,
    pub edits: Vec<TextEdit>,
}

/// Edits to apply, keyed by document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<String, Vec<TextEdit>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_changes: Option<Vec<TextDocumentEdit>>,
}

impl WorkspaceEdit {
    /// Edits for one document, shaped by the client's capabilities.
    pub fn for_document(uri: &str, edits: Vec<TextEdit>, capabilities: ClientConfig) -> Self {
        if capabilities.document_changes {
            Self {
                changes: None,
                document_changes: Some(vec![TextDocumentEdit {
                    uri: uri.to_string(),
                    edits,
                }]),
            }
        } else {
            Self {
                changes: Some(BTreeMap::from([(uri.to_string(), edits)])),
                document_changes: None,
            }
        }
    }

    /// Edits targeting `uri`, whichever form they were sent in.
    pub fn edits_for(&self, uri: &str) -> Vec<TextEdit> {
        if let Some(changes) = &self.changes {
            return changes.get(uri).cloned().unwrap_or_default();
        }
        self.document_changes
            .iter()
            .flatten()
            .filter(|d| d.uri == uri)
            .flat_map(|d| d.edits.iter().cloned())
            .collect()
    }
}
