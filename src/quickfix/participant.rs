//! Quick-fix participant contract.

use crate::config::ClientConfig;
use crate::diagnostics::Diagnostic;
use crate::model::{CompilationUnit, Element, ElementKey, TextRange, Workspace};
use crate::proposals::{CorrectionProposal, EditComputationError, DEFAULT_RELEVANCE};

use super::action::{CodeAction, ResolveData, QUICKFIX_KIND};

/// What a participant sees while proposing actions for one diagnostic.
pub struct ProposeContext<'a> {
    pub uri: &'a str,
    pub unit: &'a CompilationUnit,
    pub workspace: &'a Workspace,
    /// The range of the code action request.
    pub range: TextRange,
    /// Innermost declaration covering the diagnostic.
    pub element: Element<'a>,
    pub capabilities: ClientConfig,
}

impl<'a> ProposeContext<'a> {
    /// Resolve data pointing at the diagnosed declaration.
    pub fn resolve_data(&self, participant: &str, diagnostic: &Diagnostic) -> ResolveData {
        self.resolve_data_for(participant, diagnostic, self.element.key())
    }

    pub fn resolve_data_for(
        &self,
        participant: &str,
        diagnostic: &Diagnostic,
        element: ElementKey,
    ) -> ResolveData {
        ResolveData {
            uri: self.uri.to_string(),
            participant: participant.to_string(),
            code: diagnostic.code.clone(),
            range: self.range,
            element,
            extended: Default::default(),
            capabilities: self.capabilities,
        }
    }

    /// An unresolved action addressing `diagnostic`.
    pub fn action(&self, title: impl Into<String>, diagnostic: &Diagnostic, data: ResolveData) -> CodeAction {
        CodeAction {
            title: title.into(),
            kind: QUICKFIX_KIND.to_string(),
            diagnostics: vec![diagnostic.clone()],
            data: Some(data),
            edit: None,
        }
    }
}

impl ResolveData {
    /// Attach an extended entry.
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extended.insert(key.to_string(), value.into());
        self
    }
}

/// Maps a diagnostic to candidate code actions and, later, turns one of
/// them back into a correction proposal.
///
/// Propose is cheap: it reads the diagnostic and the declaration it sits on
/// and never computes edits. Everything resolve needs travels in the
/// action's [`ResolveData`].
pub trait QuickFixParticipant: Send + Sync {
    /// Unique participant id, `jakarta.<domain>.<Fix>`.
    fn id(&self) -> &str;

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction>;

    /// The proposal for a previously proposed action.
    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError>;

    /// Higher sorts first among the actions for one diagnostic.
    fn relevance(&self) -> i32 {
        DEFAULT_RELEVANCE
    }
}
