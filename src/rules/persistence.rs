//! Persistence (`jakarta.persistence`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{Annotation, Element, Modifier, TypeDecl};

pub const ENTITY: &str = "jakarta.persistence.Entity";
pub const MAP_KEY: &str = "jakarta.persistence.MapKey";
pub const MAP_KEY_CLASS: &str = "jakarta.persistence.MapKeyClass";
pub const MAP_KEY_JOIN_COLUMN: &str = "jakarta.persistence.MapKeyJoinColumn";

/// Attributes every `@MapKeyJoinColumn` of a composite key must name.
pub const JOIN_COLUMN_ATTRIBUTES: &[&str] = &["name", "referencedColumnName"];

error_codes! {
    pub enum PersistenceCode for Domain::Persistence {
        MissingEmptyConstructor,
        InvalidClass,
        RemoveFinalMethods,
        RemoveFinalVariables,
        RemoveMapKeyAnnotation,
        SupplyAttributesToAnnotations,
    }
}

pub struct PersistenceParticipant;

impl PersistenceParticipant {
    fn check_entity(&self, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let has_constructors = t.constructors().next().is_some();
        let accessible_no_arg = t.constructors().any(|c| {
            c.parameters.is_empty()
                && (c.modifiers.has(Modifier::Public) || c.modifiers.has(Modifier::Protected))
        });
        if has_constructors && !accessible_no_arg {
            out.push(Diagnostic::new(
                PersistenceCode::MissingEmptyConstructor,
                t.name_span,
                "An entity class must have a public or protected constructor with no parameters.",
            ));
        }

        if t.modifiers.is_final() {
            out.push(Diagnostic::new(
                PersistenceCode::InvalidClass,
                t.name_span,
                "An entity class must not be final.",
            ));
        }

        for m in t.plain_methods() {
            if m.modifiers.is_final() && !m.modifiers.is_static() {
                out.push(Diagnostic::new(
                    PersistenceCode::RemoveFinalMethods,
                    m.name_span,
                    "Methods of an entity class must not be final.",
                ));
            }
        }
        for f in &t.fields {
            if f.modifiers.is_final() && !f.modifiers.is_static() {
                out.push(Diagnostic::new(
                    PersistenceCode::RemoveFinalVariables,
                    f.name_span,
                    "Persistent instance variables of an entity class must not be final.",
                ));
            }
        }
    }

    fn check_map_keys(&self, ctx: &DiagnosticsContext, element: Element, out: &mut Vec<Diagnostic>) {
        let annotations = element.annotations();
        let range = match element {
            Element::Field(_, f) => f.name_span,
            Element::Method(_, m) => m.name_span,
            _ => return,
        };

        if ctx.has(annotations, MAP_KEY) && ctx.has(annotations, MAP_KEY_CLASS) {
            out.push(
                Diagnostic::new(
                    PersistenceCode::RemoveMapKeyAnnotation,
                    range,
                    "@MapKeyClass and @MapKey annotations cannot be used on the same field or property.",
                )
                .with_data_strings([MAP_KEY, MAP_KEY_CLASS]),
            );
        }

        let join_columns: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| ctx.is(a, MAP_KEY_JOIN_COLUMN))
            .collect();
        if join_columns.len() < 2 {
            return;
        }
        let missing: Vec<&str> = JOIN_COLUMN_ATTRIBUTES
            .iter()
            .copied()
            .filter(|attr| join_columns.iter().any(|a| !a.has_member(attr)))
            .collect();
        if !missing.is_empty() {
            out.push(
                Diagnostic::new(
                    PersistenceCode::SupplyAttributesToAnnotations,
                    range,
                    "A field with multiple @MapKeyJoinColumn annotations must specify both the name and referencedColumnName attributes in the corresponding @MapKeyJoinColumn annotations.",
                )
                .with_data_strings(missing),
            );
        }
    }
}

impl RuleParticipant for PersistenceParticipant {
    fn domain(&self) -> Domain {
        Domain::Persistence
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            if t.is_class() && ctx.has(&t.annotations, ENTITY) {
                self.check_entity(t, &mut out);
            }
        }
        for element in ctx.unit.elements() {
            self.check_map_keys(ctx, element, &mut out);
        }
        // stable, so one member's findings keep their check order
        out.sort_by_key(|d| d.range.start);
        Ok(out)
    }
}
