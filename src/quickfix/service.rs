//! The propose / resolve code-action service.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::diagnostics::Diagnostic;
use crate::model::{CompilationUnit, TextRange, Workspace};
use crate::proposals::{apply_edits, EditComputationError, Target, TextEdit};

use super::action::{CodeAction, ResolveData, WorkspaceEdit};
use super::participant::ProposeContext;
use super::registry::{registry, QuickFixRegistry};

/// Proposes code actions for diagnostics and resolves them into edits.
pub struct CodeActionService<'w> {
    workspace: &'w Workspace,
    registry: &'w QuickFixRegistry,
}

impl<'w> CodeActionService<'w> {
    /// Service over the built-in quick-fix registry.
    pub fn new(workspace: &'w Workspace) -> Self {
        Self::with_registry(workspace, registry())
    }

    pub fn with_registry(workspace: &'w Workspace, registry: &'w QuickFixRegistry) -> Self {
        Self {
            workspace,
            registry,
        }
    }

    /// Unresolved actions for one diagnostic, most relevant first.
    pub fn propose(
        &self,
        uri: &str,
        range: TextRange,
        diagnostic: &Diagnostic,
        capabilities: ClientConfig,
    ) -> anyhow::Result<Vec<CodeAction>> {
        let unit = self.workspace.unit(uri)?;
        let Some(element) = unit.element_at(diagnostic.range) else {
            debug!(uri, code = diagnostic.code.as_str(), "no declaration at diagnostic range");
            return Ok(Vec::new());
        };
        let ctx = ProposeContext {
            uri,
            unit: &unit,
            workspace: self.workspace,
            range,
            element,
            capabilities,
        };

        let mut ranked: Vec<(i32, CodeAction)> = Vec::new();
        for participant in self
            .registry
            .participants_for(&diagnostic.source, &diagnostic.code)
        {
            let relevance = participant.relevance();
            ranked.extend(
                participant
                    .propose(&ctx, diagnostic)
                    .into_iter()
                    .map(|a| (relevance, a)),
            );
        }
        ranked.sort_by_key(|(relevance, _)| std::cmp::Reverse(*relevance));
        Ok(ranked.into_iter().map(|(_, a)| a).collect())
    }

    /// Actions for every diagnostic overlapping `range`.
    pub fn propose_all(
        &self,
        uri: &str,
        range: TextRange,
        diagnostics: &[Diagnostic],
        capabilities: ClientConfig,
    ) -> anyhow::Result<Vec<CodeAction>> {
        let mut actions = Vec::new();
        for diagnostic in diagnostics
            .iter()
            .filter(|d| d.range.overlaps(range) || range.covers(d.range) || d.range.covers(range))
        {
            actions.extend(self.propose(uri, range, diagnostic, capabilities)?);
        }
        Ok(actions)
    }

    /// Compute the edit of a proposed action. On failure nothing is
    /// attached and the typed error is returned.
    pub fn resolve(&self, mut action: CodeAction) -> Result<CodeAction, EditComputationError> {
        let data = action
            .data
            .as_ref()
            .ok_or(EditComputationError::MissingResolveData)?;
        let edits = self.compute_edits(data)?;
        let edit = WorkspaceEdit::for_document(&data.uri, edits, data.capabilities);
        action.edit = Some(edit);
        Ok(action)
    }

    fn compute_edits(&self, data: &ResolveData) -> Result<Vec<TextEdit>, EditComputationError> {
        let participant = self
            .registry
            .get(&data.participant)
            .ok_or_else(|| EditComputationError::UnknownParticipant(data.participant.clone()))?;

        let unit = self.locate(data)?;
        let element = unit
            .find_element(&data.element)
            .ok_or_else(|| EditComputationError::ElementNotFound(data.element.to_string()))?;
        let target = Target::new(&unit, element, self.workspace);

        let proposal = participant.resolve(data)?;
        let edits = proposal.compute(&target)?;
        // edits must apply cleanly to the text they were computed against
        apply_edits(&unit.source, &edits)?;
        debug!(
            uri = data.uri.as_str(),
            participant = data.participant.as_str(),
            label = proposal.label(),
            edits = edits.len(),
            "resolved code action"
        );
        Ok(edits)
    }

    /// The unit for the document's current text. Actions proposed before
    /// an edit are resolved against the rebuilt unit by element key.
    fn locate(&self, data: &ResolveData) -> Result<Arc<CompilationUnit>, EditComputationError> {
        self.workspace
            .unit(&data.uri)
            .map_err(|e| EditComputationError::DocumentUnavailable {
                uri: data.uri.clone(),
                reason: e.to_string(),
            })
    }
}
