//! Rule participant contract.

use crate::model::{
    names, Annotation, CompilationUnit, MatchMode, TypeMatcher, TypeRef, TypeResolver, Workspace,
};

use super::{Diagnostic, Domain};

/// What a rule participant sees while scanning one file.
pub struct DiagnosticsContext<'a> {
    pub uri: &'a str,
    pub unit: &'a CompilationUnit,
    pub workspace: &'a Workspace,
    resolver: TypeResolver<'a>,
}

impl<'a> DiagnosticsContext<'a> {
    pub fn new(workspace: &'a Workspace, unit: &'a CompilationUnit) -> Self {
        Self {
            uri: &unit.uri,
            unit,
            workspace,
            resolver: workspace.resolver(unit),
        }
    }

    pub fn resolver(&self) -> &TypeResolver<'a> {
        &self.resolver
    }

    /// Whether `annotation` is the annotation named by `target`.
    pub fn is(&self, annotation: &Annotation, target: &str) -> bool {
        names::is_annotation(self.unit, annotation, target)
    }

    pub fn find<'b>(&self, annotations: &'b [Annotation], target: &str) -> Option<&'b Annotation> {
        names::find_annotation(self.unit, annotations, target)
    }

    pub fn has(&self, annotations: &[Annotation], target: &str) -> bool {
        names::has_annotation(self.unit, annotations, target)
    }

    /// Annotations matching any of `targets`, each with the target it
    /// matched, in declaration order.
    pub fn matching<'b, 't>(
        &self,
        annotations: &'b [Annotation],
        targets: &[&'t str],
    ) -> Vec<(&'b Annotation, &'t str)> {
        names::matching(self.unit, annotations, targets)
    }

    /// Whether a declared type is one of `accepted` (or a subtype of one).
    pub fn type_matches(&self, type_ref: &TypeRef, accepted: &[&str]) -> (bool, MatchMode) {
        TypeMatcher::new(&self.resolver).matches(type_ref, accepted)
    }

    /// Resolved subtype test; `None` when the type does not resolve.
    pub fn is_subtype(&self, type_ref: &TypeRef, target: &str) -> Option<bool> {
        self.resolver.is_subtype_of(&type_ref.name, target)
    }
}

/// One rule domain's diagnostics collector.
///
/// Participants are registered once and shared; they keep no per-request
/// state.
pub trait RuleParticipant: Send + Sync {
    fn domain(&self) -> Domain;

    /// Scan one file and report violations in declaration order.
    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>>;
}
