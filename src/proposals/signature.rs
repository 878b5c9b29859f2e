//! Method signature rewrites: parameter lists and return types.

use crate::model::{Element, MethodDecl};

use super::rewrite::Rewrite;
use super::{CorrectionProposal, EditComputationError, Target, TextEdit};

fn method<'a>(target: &Target<'a>) -> Result<&'a MethodDecl, EditComputationError> {
    match target.element {
        Element::Method(_, m) | Element::Parameter(_, m, _) => Ok(m),
        _ => Err(EditComputationError::UnsupportedShape(format!(
            "'{}' is not a method",
            target.describe()
        ))),
    }
}

/// Which parameters to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSelection {
    All,
    Named(Vec<String>),
}

pub struct RemoveParametersProposal {
    label: String,
    selection: ParameterSelection,
}

impl RemoveParametersProposal {
    pub fn new(label: impl Into<String>, selection: ParameterSelection) -> Self {
        Self {
            label: label.into(),
            selection,
        }
    }
}

impl CorrectionProposal for RemoveParametersProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let m = method(target)?;
        let kept: Vec<&str> = match &self.selection {
            ParameterSelection::All => Vec::new(),
            ParameterSelection::Named(names) => {
                if !names.iter().any(|n| m.parameters.iter().any(|p| &p.name == n)) {
                    return Err(EditComputationError::UnsupportedShape(format!(
                        "'{}' has none of the parameters {}",
                        m.name,
                        names.join(", ")
                    )));
                }
                m.parameters
                    .iter()
                    .filter(|p| !names.contains(&p.name))
                    .map(|p| target.unit.text(p.span))
                    .collect()
            }
        };

        let mut rewrite = Rewrite::new(target.source());
        rewrite.replace(m.parameters_span, format!("({})", kept.join(", ")));
        rewrite.into_edits()
    }
}

/// Replaces the declared return type of the target method.
pub struct ChangeReturnTypeProposal {
    label: String,
    new_type: String,
}

impl ChangeReturnTypeProposal {
    pub fn new(label: impl Into<String>, new_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            new_type: new_type.into(),
        }
    }
}

impl CorrectionProposal for ChangeReturnTypeProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let m = method(target)?;
        let return_type = m.return_type.as_ref().ok_or_else(|| {
            EditComputationError::UnsupportedShape(format!("'{}' has no return type", m.name))
        })?;
        let mut rewrite = Rewrite::new(target.source());
        if return_type.text != self.new_type {
            rewrite.replace(return_type.span, self.new_type.clone());
        }
        rewrite.into_edits()
    }
}
