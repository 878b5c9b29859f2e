//! Proposals that edit annotation usages.

use crate::model::{literal_value_start, names, Annotation, AnnotationMember, Element};

use super::rewrite::Rewrite;
use super::{CorrectionProposal, EditComputationError, Target, TextEdit, DEFAULT_RELEVANCE};

/// Annotations of the target, and of its parameters when it is a method.
fn annotations_in_scope<'a>(element: Element<'a>) -> Vec<&'a Annotation> {
    let mut all: Vec<&Annotation> = element.annotations().iter().collect();
    if let Element::Method(_, m) = element {
        for p in &m.parameters {
            all.extend(p.annotations.iter());
        }
    }
    all
}

/// Removes every usage of the named annotations in one edit.
pub struct DeleteAnnotationProposal {
    label: String,
    annotations: Vec<String>,
    relevance: i32,
}

impl DeleteAnnotationProposal {
    pub fn new(label: impl Into<String>, annotations: Vec<String>) -> Self {
        Self {
            label: label.into(),
            annotations,
            relevance: DEFAULT_RELEVANCE,
        }
    }

    pub fn with_relevance(mut self, relevance: i32) -> Self {
        self.relevance = relevance;
        self
    }
}

impl CorrectionProposal for DeleteAnnotationProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn relevance(&self) -> i32 {
        self.relevance
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let in_scope = annotations_in_scope(target.element);
        let mut rewrite = Rewrite::new(target.source());
        for name in &self.annotations {
            let found: Vec<&&Annotation> = in_scope
                .iter()
                .filter(|a| names::is_annotation(target.unit, a, name))
                .collect();
            if found.is_empty() {
                return Err(EditComputationError::AnnotationNotFound {
                    annotation: name.clone(),
                    element: target.describe(),
                });
            }
            for annotation in found {
                rewrite.remove(annotation.span);
            }
        }
        rewrite.into_single_edit()
    }
}

/// Declared type of well-known annotation members.
fn member_type(annotation: &str, member: &str) -> &'static str {
    match (annotation, member) {
        ("jakarta.annotation.Resource", "type") => "Class",
        ("jakarta.annotation.Resource", "shareable") => "boolean",
        ("jakarta.servlet.annotation.WebServlet", "loadOnStartup") => "int",
        ("jakarta.servlet.annotation.WebServlet", "asyncSupported")
        | ("jakarta.servlet.annotation.WebFilter", "asyncSupported") => "boolean",
        ("jakarta.persistence.MapKeyJoinColumn", "unique")
        | ("jakarta.persistence.MapKeyJoinColumn", "nullable")
        | ("jakarta.persistence.MapKeyJoinColumn", "insertable")
        | ("jakarta.persistence.MapKeyJoinColumn", "updatable") => "boolean",
        (_, "name")
        | (_, "value")
        | (_, "urlPatterns")
        | (_, "servletNames")
        | (_, "referencedColumnName")
        | (_, "lookup")
        | (_, "mappedName")
        | (_, "description") => "String",
        _ => "Class",
    }
}

/// A syntactically valid default literal for a member type.
pub fn default_literal(type_name: &str) -> &'static str {
    match type_name.trim_end_matches("[]") {
        "boolean" | "Boolean" => "false",
        "byte" | "short" | "int" | "Byte" | "Short" | "Integer" => "0",
        "long" | "Long" => "0L",
        "float" | "Float" => "0f",
        "double" | "Double" => "0d",
        "char" | "Character" => "'\\0'",
        "String" | "java.lang.String" => "\"\"",
        _ => "Object.class",
    }
}

/// Adds missing members to and removes members from every usage of one
/// annotation on the target.
pub struct ModifyAttributesProposal {
    label: String,
    annotation: String,
    add: Vec<String>,
    remove: Vec<String>,
}

impl ModifyAttributesProposal {
    pub fn new(label: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            annotation: annotation.into(),
            add: Vec::new(),
            remove: Vec::new(),
        }
    }

    pub fn adding(mut self, members: Vec<String>) -> Self {
        self.add = members;
        self
    }

    pub fn removing(mut self, members: Vec<String>) -> Self {
        self.remove = members;
        self
    }

    fn member_text(&self, source: &str, member: &AnnotationMember, explicit: bool) -> String {
        let text = &source[member.span.start..member.span.end];
        if member.implicit && explicit {
            format!("value = {}", text)
        } else {
            text.to_string()
        }
    }

    /// New argument list for one usage, or `None` when nothing changes.
    fn arguments(&self, source: &str, annotation: &Annotation) -> Option<String> {
        let kept: Vec<&AnnotationMember> = annotation
            .members
            .iter()
            .filter(|m| !self.remove.contains(&m.name))
            .collect();
        let added: Vec<String> = self
            .add
            .iter()
            .filter(|name| !annotation.has_member(name))
            .map(|name| {
                format!(
                    "{} = {}",
                    name,
                    default_literal(member_type(&self.annotation, name))
                )
            })
            .collect();
        if added.is_empty() && kept.len() == annotation.members.len() {
            return None;
        }

        let explicit = kept.len() > 1 || !added.is_empty();
        let mut parts: Vec<String> = kept
            .iter()
            .map(|m| self.member_text(source, m, explicit))
            .collect();
        parts.extend(added);
        if parts.is_empty() {
            return Some(String::new());
        }
        Some(format!("({})", parts.join(", ")))
    }
}

impl CorrectionProposal for ModifyAttributesProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let usages: Vec<&Annotation> = target
            .element
            .annotations()
            .iter()
            .filter(|a| names::is_annotation(target.unit, a, &self.annotation))
            .collect();
        if usages.is_empty() {
            return Err(EditComputationError::AnnotationNotFound {
                annotation: self.annotation.clone(),
                element: target.describe(),
            });
        }

        let mut rewrite = Rewrite::new(target.source());
        for usage in usages {
            let Some(arguments) = self.arguments(target.source(), usage) else {
                continue;
            };
            match usage.arguments {
                Some(range) => rewrite.replace(range, arguments),
                None => rewrite.insert(usage.span.end, arguments),
            }
        }
        rewrite.into_edits()
    }
}

/// Prefixes the string value of an annotation member with `/`.
pub struct PrefixSlashProposal {
    label: String,
    annotation: String,
    member: String,
}

impl PrefixSlashProposal {
    pub fn new(label: impl Into<String>, annotation: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            annotation: annotation.into(),
            member: member.into(),
        }
    }
}

impl CorrectionProposal for PrefixSlashProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let not_found = || EditComputationError::AnnotationNotFound {
            annotation: self.annotation.clone(),
            element: target.describe(),
        };
        let annotation = names::find_annotation(target.unit, target.element.annotations(), &self.annotation)
            .ok_or_else(not_found)?;
        let member = annotation.member(&self.member).ok_or_else(not_found)?;
        let Some(value) = member.value.as_str() else {
            return Err(EditComputationError::UnsupportedShape(format!(
                "member '{}' is not a string literal",
                self.member
            )));
        };
        if value.starts_with('/') {
            return Ok(Vec::new());
        }

        let literal = target.unit.text(member.value_span);
        let Some(offset) = literal_value_start(literal) else {
            return Err(EditComputationError::UnsupportedShape(
                "endpoint path is not a plain string literal".to_string(),
            ));
        };
        Ok(vec![TextEdit::insert(member.value_span.start + offset, "/")])
    }
}
