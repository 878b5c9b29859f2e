//! Removing exceptions from a `throws` clause.

use crate::model::{Element, MethodDecl};

use super::rewrite::Rewrite;
use super::{CorrectionProposal, EditComputationError, Target, TextEdit};

/// Removes the named exception types from the target method's `throws`
/// clause. With an empty list every exception is removed.
pub struct RemoveThrownExceptionsProposal {
    label: String,
    exceptions: Vec<String>,
}

impl RemoveThrownExceptionsProposal {
    pub fn new(label: impl Into<String>, exceptions: Vec<String>) -> Self {
        Self {
            label: label.into(),
            exceptions,
        }
    }
}

fn method<'a>(target: &Target<'a>) -> Result<&'a MethodDecl, EditComputationError> {
    match target.element {
        Element::Method(_, m) => Ok(m),
        _ => Err(EditComputationError::UnsupportedShape(format!(
            "'{}' is not a method",
            target.describe()
        ))),
    }
}

impl CorrectionProposal for RemoveThrownExceptionsProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let m = method(target)?;
        let throws_span = m.throws_span.ok_or_else(|| {
            EditComputationError::UnsupportedShape(format!("'{}' declares no exceptions", m.name))
        })?;

        let resolver = target.resolver();
        let (removed, kept): (Vec<_>, Vec<_>) = m.throws.iter().partition(|t| {
            if self.exceptions.is_empty() {
                return true;
            }
            let qualified = resolver.resolve(&t.name);
            self.exceptions
                .iter()
                .any(|e| Some(e) == qualified.as_ref() || *e == t.name)
        });
        if removed.is_empty() {
            return Err(EditComputationError::UnsupportedShape(format!(
                "'{}' throws none of {}",
                m.name,
                self.exceptions.join(", ")
            )));
        }

        let mut rewrite = Rewrite::new(target.source());
        if kept.is_empty() {
            rewrite.remove(throws_span);
        } else {
            let list: Vec<&str> = kept.iter().map(|t| target.unit.text(t.span)).collect();
            rewrite.replace(throws_span, format!("throws {}", list.join(", ")));
        }
        rewrite.into_edits()
    }
}
