//! Correction proposals: the structural edits behind quick fixes.
//!
//! A proposal is built during resolve, computes its edits against the
//! located target declaration, and is then discarded. Computation either
//! yields the complete set of edits or fails with an
//! [`EditComputationError`]; partial edits are never returned.

pub mod annotations;
pub mod constructor;
pub mod exceptions;
pub mod modifiers;
pub mod rewrite;
pub mod signature;
pub mod supertype;

use thiserror::Error;

use crate::model::{CompilationUnit, Element, TypeResolver, Workspace};

pub use annotations::{DeleteAnnotationProposal, ModifyAttributesProposal, PrefixSlashProposal};
pub use constructor::AddConstructorProposal;
pub use exceptions::RemoveThrownExceptionsProposal;
pub use modifiers::{ModifierTarget, ModifyModifiersProposal};
pub use rewrite::{apply_edits, TextEdit};
pub use signature::{ChangeReturnTypeProposal, ParameterSelection, RemoveParametersProposal};
pub use supertype::{AddSupertypeProposal, SupertypeKind};

/// Default relevance of a proposal; higher sorts first.
pub const DEFAULT_RELEVANCE: i32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditComputationError {
    #[error("code action carries no resolve data")]
    MissingResolveData,
    #[error("unknown quick fix participant '{0}'")]
    UnknownParticipant(String),
    #[error("document {uri} is unavailable: {reason}")]
    DocumentUnavailable { uri: String, reason: String },
    #[error("declaration '{0}' not found")]
    ElementNotFound(String),
    #[error("annotation {annotation} not found on '{element}'")]
    AnnotationNotFound { annotation: String, element: String },
    #[error("unsupported declaration shape: {0}")]
    UnsupportedShape(String),
    #[error("computed edits overlap")]
    OverlappingEdits,
    #[error("invalid resolve data: {0}")]
    InvalidData(String),
}

/// The declaration a proposal edits, located in a freshly checked unit.
pub struct Target<'a> {
    pub unit: &'a CompilationUnit,
    pub element: Element<'a>,
    pub workspace: &'a Workspace,
}

impl<'a> Target<'a> {
    pub fn new(unit: &'a CompilationUnit, element: Element<'a>, workspace: &'a Workspace) -> Self {
        Self {
            unit,
            element,
            workspace,
        }
    }

    pub fn resolver(&self) -> TypeResolver<'a> {
        self.workspace.resolver(self.unit)
    }

    pub fn source(&self) -> &'a str {
        &self.unit.source
    }

    /// The target's key, for error messages.
    pub fn describe(&self) -> String {
        self.element.key().to_string()
    }
}

/// A concrete correction for one diagnostic.
pub trait CorrectionProposal: Send {
    fn label(&self) -> &str;

    fn relevance(&self) -> i32 {
        DEFAULT_RELEVANCE
    }

    /// Edits against the target unit's source.
    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError>;
}
