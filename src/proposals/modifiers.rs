//! Proposals that change modifier keywords.

use crate::model::{Element, Modifier, Modifiers, TypeDecl};

use super::rewrite::Rewrite;
use super::{CorrectionProposal, EditComputationError, Target, TextEdit};

/// Add and remove keywords on one modifier list.
///
/// Adding a visibility keyword replaces any other visibility. New keywords
/// go before the first existing keyword that sorts after them.
pub fn edit_modifiers(rewrite: &mut Rewrite, modifiers: &Modifiers, add: &[Modifier], remove: &[Modifier]) {
    let adds_visibility: Option<Modifier> = add.iter().copied().find(|m| m.is_visibility());

    for token in &modifiers.tokens {
        let replaced = adds_visibility
            .map(|v| token.modifier.is_visibility() && token.modifier != v)
            .unwrap_or(false);
        if remove.contains(&token.modifier) || replaced {
            rewrite.remove(token.span);
        }
    }

    for modifier in add {
        if modifiers.has(*modifier) {
            continue;
        }
        let offset = modifiers
            .tokens
            .iter()
            .find(|t| t.modifier.rank() > modifier.rank())
            .map(|t| t.span.start)
            .unwrap_or(modifiers.insert_offset);
        rewrite.insert(offset, format!("{} ", modifier.keyword()));
    }
}

/// Which declaration's modifiers a proposal edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTarget {
    /// The diagnosed declaration itself.
    Element,
    /// The type declaring the diagnosed member.
    DeclaringType,
    /// The nested type named by the diagnosed field or parameter's type.
    ReferencedType,
}

pub struct ModifyModifiersProposal {
    label: String,
    target: ModifierTarget,
    add: Vec<Modifier>,
    remove: Vec<Modifier>,
}

impl ModifyModifiersProposal {
    pub fn new(label: impl Into<String>, target: ModifierTarget) -> Self {
        Self {
            label: label.into(),
            target,
            add: Vec::new(),
            remove: Vec::new(),
        }
    }

    pub fn adding(mut self, modifiers: Vec<Modifier>) -> Self {
        self.add = modifiers;
        self
    }

    pub fn removing(mut self, modifiers: Vec<Modifier>) -> Self {
        self.remove = modifiers;
        self
    }

    fn referenced_type<'a>(&self, target: &Target<'a>) -> Result<&'a TypeDecl, EditComputationError> {
        let type_ref = match target.element {
            Element::Field(_, f) => &f.type_ref,
            Element::Parameter(_, m, i) => {
                &m.parameters
                    .get(i)
                    .ok_or_else(|| EditComputationError::ElementNotFound(target.describe()))?
                    .type_ref
            }
            _ => {
                return Err(EditComputationError::UnsupportedShape(
                    "only fields and parameters reference a type".to_string(),
                ))
            }
        };
        let qualified = target.resolver().resolve(&type_ref.name).ok_or_else(|| {
            EditComputationError::UnsupportedShape(format!("type '{}' does not resolve", type_ref.text))
        })?;
        target
            .unit
            .find_type(&qualified)
            .ok_or(EditComputationError::ElementNotFound(qualified))
    }

    fn modifiers<'a>(&self, target: &Target<'a>) -> Result<&'a Modifiers, EditComputationError> {
        match self.target {
            ModifierTarget::Element => target.element.modifiers().ok_or_else(|| {
                EditComputationError::UnsupportedShape("declaration has no modifiers".to_string())
            }),
            ModifierTarget::DeclaringType => target
                .element
                .declaring_type()
                .map(|t| &t.modifiers)
                .ok_or_else(|| EditComputationError::ElementNotFound(target.describe())),
            ModifierTarget::ReferencedType => Ok(&self.referenced_type(target)?.modifiers),
        }
    }
}

impl CorrectionProposal for ModifyModifiersProposal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, target: &Target) -> Result<Vec<TextEdit>, EditComputationError> {
        let modifiers = self.modifiers(target)?;
        let mut rewrite = Rewrite::new(target.source());
        edit_modifiers(&mut rewrite, modifiers, &self.add, &self.remove);
        rewrite.into_edits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKey, Workspace};
    use crate::proposals::apply_edits;

    const URI: &str = "mem:///A.java";

    fn run(source: &str, key: &str, proposal: &ModifyModifiersProposal) -> String {
        let ws = Workspace::in_memory([(URI, source)]);
        let unit = ws.unit(URI).unwrap();
        let key: ElementKey = key.parse().unwrap();
        let element = unit.find_element(&key).unwrap();
        let edits = proposal.compute(&Target::new(&unit, element, &ws)).unwrap();
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_remove_modifier() {
        let proposal = ModifyModifiersProposal::new("Remove static", ModifierTarget::Element)
            .removing(vec![Modifier::Static]);
        assert_eq!(
            run("class A { @PostConstruct public static void init() {} }", "A#init()", &proposal),
            "class A { @PostConstruct public void init() {} }"
        );
    }

    #[test]
    fn test_add_visibility_replaces_existing() {
        let proposal = ModifyModifiersProposal::new("Make public", ModifierTarget::Element)
            .adding(vec![Modifier::Public]);
        assert_eq!(
            run("class A { private static String get() { return null; } }", "A#get()", &proposal),
            "class A { public static String get() { return null; } }"
        );
        assert_eq!(
            run("class A { @GET String get() { return null; } }", "A#get()", &proposal),
            "class A { @GET public String get() { return null; } }"
        );
        assert_eq!(
            run("class A { static final String get() { return null; } }", "A#get()", &proposal),
            "class A { public static final String get() { return null; } }"
        );
    }

    #[test]
    fn test_declaring_type() {
        let proposal = ModifyModifiersProposal::new("Remove final", ModifierTarget::DeclaringType)
            .removing(vec![Modifier::Final]);
        assert_eq!(
            run("public final class A { String s; }", "A#s", &proposal),
            "public class A { String s; }"
        );
    }

    #[test]
    fn test_referenced_nested_type() {
        let proposal = ModifyModifiersProposal::new("Make static", ModifierTarget::ReferencedType)
            .adding(vec![Modifier::Static]);
        assert_eq!(
            run(
                "class A {\n    private class Inner {}\n    @Inject Inner inner;\n}",
                "A#inner",
                &proposal
            ),
            "class A {\n    private static class Inner {}\n    @Inject Inner inner;\n}"
        );
        assert_eq!(
            run("class A {\n    class Inner {}\n    @Inject Inner inner;\n}", "A#inner", &proposal),
            "class A {\n    static class Inner {}\n    @Inject Inner inner;\n}"
        );
    }
}
