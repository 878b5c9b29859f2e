//! Adding an accessible no-arg constructor.

use crate::model::{Element, Modifier, TypeDecl};

use super::modifiers::edit_modifiers;
use super::rewrite::{line_indent, Rewrite};
use super::{CorrectionProposal, EditComputationError, Target, TextEdit};

const INDENT_UNIT: &str = "    ";

/// Adds an empty no-arg constructor with the given visibility, or changes
/// the visibility of the existing one.
pub struct AddConstructorProposal {
    label: String,
    visibility: Modifier,
}

impl AddConstructorProposal {
    pub fn new(label: impl Into<String>, visibility: Modifier) -> Self {
        Self {
            label: label.into(),
            visibility,
        }
    }
}

/// Indentation for a new member of `t`.
fn member_indent(source: &str, t: &TypeDecl) -> String {
    let first_member = t
        .fields
        .iter()
        .map(|f| f.span.start)
        .chain(t.methods.iter().map(|m| m.span.start))
        .chain(t.types.iter().map(|n| n.span.start))
        .min();
    match first_member {
        Some(offset) if source[..offset].rfind('\n') > Some(t.body.start) => {
            line_indent(source, offset).to_string()
        }
        _ => format!("{}{}", line_indent(source, t.span.start), INDENT_UNIT),
    }
}

impl CorrectionProposal for AddConstructorProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let t = match target.element {
            Element::Type(t) => t,
            other => other
                .declaring_type()
                .ok_or_else(|| EditComputationError::ElementNotFound(target.describe()))?,
        };
        if !t.is_class() {
            return Err(EditComputationError::UnsupportedShape(format!(
                "'{}' is a {}, not a class",
                t.name,
                t.kind.as_str()
            )));
        }

        let source = target.source();
        let mut rewrite = Rewrite::new(source);

        if let Some(existing) = t.constructors().find(|c| c.parameters.is_empty()) {
            edit_modifiers(&mut rewrite, &existing.modifiers, &[self.visibility], &[]);
            return rewrite.into_edits();
        }

        if t.body.is_empty() || !source[t.body.start..].starts_with('{') {
            return Err(EditComputationError::UnsupportedShape(format!(
                "class '{}' has no body",
                t.name
            )));
        }
        let indent = member_indent(source, t);
        rewrite.insert(
            t.body.start + 1,
            format!(
                "\n{indent}{} {}() {{\n{indent}}}\n",
                self.visibility.keyword(),
                t.name,
                indent = indent
            ),
        );
        rewrite.into_edits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKey, Workspace};
    use crate::proposals::apply_edits;

    const URI: &str = "mem:///A.java";

    fn run(source: &str, key: &str, visibility: Modifier) -> Result<String, EditComputationError> {
        let ws = Workspace::in_memory([(URI, source)]);
        let unit = ws.unit(URI).unwrap();
        let key: ElementKey = key.parse().unwrap();
        let element = unit.find_element(&key).unwrap();
        let proposal = AddConstructorProposal::new("Add constructor", visibility);
        let edits = proposal.compute(&Target::new(&unit, element, &ws))?;
        apply_edits(source, &edits)
    }

    #[test]
    fn test_insert_constructor() {
        let source = "@Entity\npublic class Person {\n    private String name;\n\n    public Person(String name) {\n        this.name = name;\n    }\n}\n";
        let fixed = run(source, "Person", Modifier::Protected).unwrap();
        assert_eq!(
            fixed,
            "@Entity\npublic class Person {\n    protected Person() {\n    }\n\n    private String name;\n\n    public Person(String name) {\n        this.name = name;\n    }\n}\n"
        );
    }

    #[test]
    fn test_insert_into_empty_body() {
        assert_eq!(
            run("class A {}", "A", Modifier::Public).unwrap(),
            "class A {\n    public A() {\n    }\n}"
        );
    }

    #[test]
    fn test_existing_no_arg_constructor_gets_visibility() {
        assert_eq!(
            run("class A { private A() {} A(int x) {} }", "A", Modifier::Public).unwrap(),
            "class A { public A() {} A(int x) {} }"
        );
    }

    #[test]
    fn test_from_constructor_target() {
        assert_eq!(
            run("class A { A() {} }", "A#<init>()", Modifier::Public).unwrap(),
            "class A { public A() {} }"
        );
    }

    #[test]
    fn test_interface_is_unsupported() {
        assert!(matches!(
            run("interface A {}", "A", Modifier::Public),
            Err(EditComputationError::UnsupportedShape(_))
        ));
    }
}
