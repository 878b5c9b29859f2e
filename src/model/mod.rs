//! Semantic model of Java sources.
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌─────────────────┐
//! │ DocumentStore│────▶│ JavaParser │────▶│ CompilationUnit │
//! └──────────────┘     └────────────┘     └─────────────────┘
//!         │                                        │
//!         ▼                                        ▼
//! ┌──────────────┐     ┌──────────────┐    ┌───────────────┐
//! │  Workspace   │────▶│ TypeResolver │    │  ElementKey   │
//! │ (unit cache) │     │ (supertypes) │    │ (identity)    │
//! └──────────────┘     └──────────────┘    └───────────────┘
//! ```
//!
//! Rules read units; they never mutate them. Quick fixes locate their
//! target declaration again through its [`ElementKey`].

mod hierarchy;
mod java;
mod key;
mod line_index;
pub mod names;
mod platform;
mod types;
mod workspace;

pub use hierarchy::{
    is_primitive, PlatformHierarchy, TypeHierarchy, TypeMatcher, TypeResolver, EXCEPTION, OBJECT,
    RUNTIME_EXCEPTION,
};
pub use java::{literal_value_start, JavaParser};
pub use key::{Element, ElementKey, KeyParseError};
pub use line_index::LineIndex;
pub use names::MatchMode;
pub use types::{
    package_of, simple_name, Annotation, AnnotationMember, AnnotationValue, CompilationUnit,
    FieldDecl, Import, MethodDecl, Modifier, ModifierToken, Modifiers, PackageDecl, ParamDecl,
    TextRange, TypeDecl, TypeKind, TypeRef,
};
pub use workspace::{DocumentStore, FileDocuments, MemoryDocuments, Workspace};
