//! Adding a superclass or an implemented interface.

use crate::model::{simple_name, CompilationUnit, Element, TypeDecl};

use super::rewrite::Rewrite;
use super::{CorrectionProposal, EditComputationError, Target, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupertypeKind {
    Extend,
    Implement,
}

/// Makes the target type extend or implement a qualified supertype, adding
/// an import when the simple name is free.
pub struct AddSupertypeProposal {
    label: String,
    supertype: String,
    kind: SupertypeKind,
}

impl AddSupertypeProposal {
    pub fn new(label: impl Into<String>, supertype: impl Into<String>, kind: SupertypeKind) -> Self {
        Self {
            label: label.into(),
            supertype: supertype.into(),
            kind,
        }
    }

    /// How to spell the supertype in `target`, and whether an import is
    /// needed for that spelling.
    fn spelling(&self, target: &Target) -> (String, bool) {
        let simple = simple_name(&self.supertype);
        match target.resolver().resolve(simple) {
            Some(resolved) if resolved == self.supertype => (simple.to_string(), false),
            Some(_) => (self.supertype.clone(), false),
            None => (simple.to_string(), true),
        }
    }
}

/// Insert `import name;` after the existing imports, or after the package
/// declaration, or at the top of the file.
fn add_import(rewrite: &mut Rewrite, unit: &CompilationUnit, name: &str) {
    if let Some(last) = unit.imports.iter().max_by_key(|i| i.span.end) {
        rewrite.insert(last.span.end, format!("\nimport {};", name));
    } else if let Some(package) = &unit.package {
        rewrite.insert(package.span.end, format!("\n\nimport {};", name));
    } else {
        rewrite.insert(0, format!("import {};\n\n", name));
    }
}

fn target_type<'a>(target: &Target<'a>) -> Result<&'a TypeDecl, EditComputationError> {
    match target.element {
        Element::Type(t) => Ok(t),
        other => other
            .declaring_type()
            .ok_or_else(|| EditComputationError::ElementNotFound(target.describe())),
    }
}

impl CorrectionProposal for AddSupertypeProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let t = target_type(target)?;
        if !t.is_class() {
            return Err(EditComputationError::UnsupportedShape(format!(
                "'{}' is a {}, not a class",
                t.name,
                t.kind.as_str()
            )));
        }

        let (spelled, needs_import) = self.spelling(target);
        let mut rewrite = Rewrite::new(target.source());

        match self.kind {
            SupertypeKind::Extend => match &t.superclass {
                Some(existing) => rewrite.replace(existing.span, spelled),
                None => rewrite.insert(t.header_end, format!(" extends {}", spelled)),
            },
            SupertypeKind::Implement => match (t.interfaces_span, &t.superclass) {
                (Some(list), _) => rewrite.insert(list.end, format!(", {}", spelled)),
                (None, Some(superclass)) => {
                    rewrite.insert(superclass.span.end, format!(" implements {}", spelled))
                }
                (None, None) => rewrite.insert(t.header_end, format!(" implements {}", spelled)),
            },
        }

        if needs_import {
            add_import(&mut rewrite, target.unit, &self.supertype);
        }
        rewrite.into_edits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKey, Workspace};
    use crate::proposals::apply_edits;

    const URI: &str = "mem:///A.java";

    fn run(source: &str, key: &str, supertype: &str, kind: SupertypeKind) -> String {
        let ws = Workspace::in_memory([(URI, source)]);
        let unit = ws.unit(URI).unwrap();
        let key: ElementKey = key.parse().unwrap();
        let element = unit.find_element(&key).unwrap();
        let proposal = AddSupertypeProposal::new("Add supertype", supertype, kind);
        let edits = proposal.compute(&Target::new(&unit, element, &ws)).unwrap();
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_extend_with_import() {
        let source = "package web;\n\nimport jakarta.servlet.annotation.WebServlet;\n\n@WebServlet(\"/a\")\npublic class A {}\n";
        assert_eq!(
            run(source, "web.A", "jakarta.servlet.http.HttpServlet", SupertypeKind::Extend),
            "package web;\n\nimport jakarta.servlet.annotation.WebServlet;\nimport jakarta.servlet.http.HttpServlet;\n\n@WebServlet(\"/a\")\npublic class A extends HttpServlet {}\n"
        );
    }

    #[test]
    fn test_extend_already_imported() {
        let source = "import jakarta.servlet.http.HttpServlet;\nclass A extends Object {}";
        assert_eq!(
            run(source, "A", "jakarta.servlet.http.HttpServlet", SupertypeKind::Extend),
            "import jakarta.servlet.http.HttpServlet;\nclass A extends HttpServlet {}"
        );
    }

    #[test]
    fn test_implement_appends_to_list() {
        let source = "import jakarta.servlet.Filter;\nclass A extends B implements Runnable {}";
        assert_eq!(
            run(source, "A", "jakarta.servlet.Filter", SupertypeKind::Implement),
            "import jakarta.servlet.Filter;\nclass A extends B implements Runnable, Filter {}"
        );
    }

    #[test]
    fn test_implement_after_superclass_and_at_top() {
        assert_eq!(
            run("class A extends B {}", "A", "jakarta.servlet.Filter", SupertypeKind::Implement),
            "import jakarta.servlet.Filter;\n\nclass A extends B implements Filter {}"
        );
    }

    #[test]
    fn test_conflicting_simple_name_uses_qualified() {
        let source = "class A {}\nclass Filter {}";
        assert_eq!(
            run(source, "A", "jakarta.servlet.Filter", SupertypeKind::Implement),
            "class A implements jakarta.servlet.Filter {}\nclass Filter {}"
        );
    }
}
