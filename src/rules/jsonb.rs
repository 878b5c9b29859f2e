//! JSON binding (`jakarta.json.bind.annotation`).

use std::collections::BTreeMap;

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{Annotation, FieldDecl, MethodDecl, TextRange, TypeDecl};

use super::at;

pub const JSONB_CREATOR: &str = "jakarta.json.bind.annotation.JsonbCreator";
pub const JSONB_TRANSIENT: &str = "jakarta.json.bind.annotation.JsonbTransient";
pub const JSONB_PROPERTY: &str = "jakarta.json.bind.annotation.JsonbProperty";

/// Every JSON-B annotation applicable to a property.
pub const JSONB_ANNOTATIONS: &[&str] = &[
    "jakarta.json.bind.annotation.JsonbAnnotation",
    "jakarta.json.bind.annotation.JsonbDateFormat",
    "jakarta.json.bind.annotation.JsonbNillable",
    "jakarta.json.bind.annotation.JsonbNumberFormat",
    JSONB_PROPERTY,
    "jakarta.json.bind.annotation.JsonbPropertyOrder",
    JSONB_TRANSIENT,
    "jakarta.json.bind.annotation.JsonbTypeAdapter",
    "jakarta.json.bind.annotation.JsonbTypeDeserializer",
    "jakarta.json.bind.annotation.JsonbTypeSerializer",
    "jakarta.json.bind.annotation.JsonbVisibility",
];

error_codes! {
    pub enum JsonbCode for Domain::Jsonb {
        MultipleJsonbCreatorAnnotations,
        JSONBTransientWithOtherAnnotations,
        JSONBAccessorConflict,
        InvalidPropertyNamesOnJsonbFields,
    }
}

/// One of the three declarations backing a property.
struct Side<'a> {
    range: TextRange,
    transient: bool,
    others: Vec<&'a str>,
}

impl<'a> Side<'a> {
    fn new(ctx: &DiagnosticsContext, annotations: &[Annotation], range: TextRange) -> Self {
        let found: Vec<&'a str> = ctx
            .matching(annotations, JSONB_ANNOTATIONS)
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        Side {
            range,
            transient: found.contains(&JSONB_TRANSIENT),
            others: found.into_iter().filter(|n| *n != JSONB_TRANSIENT).collect(),
        }
    }
}

/// `name` with its first character upper-cased.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn getter<'t>(t: &'t TypeDecl, field: &str) -> Option<&'t MethodDecl> {
    let property = capitalize(field);
    t.plain_methods().find(|m| {
        m.parameters.is_empty()
            && !m.returns_void()
            && (m.name == format!("get{}", property) || m.name == format!("is{}", property))
    })
}

fn setter<'t>(t: &'t TypeDecl, field: &str) -> Option<&'t MethodDecl> {
    let name = format!("set{}", capitalize(field));
    t.plain_methods()
        .find(|m| m.parameters.len() == 1 && m.name == name)
}

pub struct JsonbParticipant;

impl JsonbParticipant {
    fn check_creators(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let creators: Vec<&MethodDecl> = t
            .methods
            .iter()
            .filter(|m| ctx.has(&m.annotations, JSONB_CREATOR))
            .collect();
        if creators.len() < 2 {
            return;
        }
        for m in creators {
            out.push(Diagnostic::new(
                JsonbCode::MultipleJsonbCreatorAnnotations,
                m.name_span,
                "Only one constructor or static factory method can be annotated with @JsonbCreator in a given class.",
            ));
        }
    }

    fn check_field(&self, ctx: &DiagnosticsContext, t: &TypeDecl, f: &FieldDecl, out: &mut Vec<Diagnostic>) {
        let field = Side::new(ctx, &f.annotations, f.name_span);

        if field.transient && !field.others.is_empty() {
            let mut all = vec![JSONB_TRANSIENT];
            all.extend(field.others.iter().copied());
            out.push(
                Diagnostic::new(
                    JsonbCode::JSONBTransientWithOtherAnnotations,
                    f.name_span,
                    "When a class field has @JsonbTransient, this field must not be annotated with other JSON Binding annotations.",
                )
                .with_data_strings(all),
            );
        }

        let mut sides = vec![field];
        if let Some(m) = getter(t, &f.name) {
            sides.push(Side::new(ctx, &m.annotations, m.name_span));
        }
        if let Some(m) = setter(t, &f.name) {
            sides.push(Side::new(ctx, &m.annotations, m.name_span));
        }

        for (i, side) in sides.iter().enumerate() {
            let others = || sides.iter().enumerate().filter(move |(j, _)| *j != i).map(|(_, s)| s);
            let data: Vec<&str> = if side.transient && others().any(|s| !s.others.is_empty()) {
                vec![JSONB_TRANSIENT]
            } else if !side.others.is_empty() && others().any(|s| s.transient) {
                side.others.clone()
            } else {
                continue;
            };
            out.push(
                Diagnostic::new(
                    JsonbCode::JSONBAccessorConflict,
                    side.range,
                    format!(
                        "When an accessor or field of property '{}' is annotated with @JsonbTransient, its field and accessors must not be annotated with other JSON Binding annotations.",
                        f.name
                    ),
                )
                .with_data_strings(data),
            );
        }
    }

    fn check_property_names(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let mut by_name: BTreeMap<String, Vec<&FieldDecl>> = BTreeMap::new();
        for f in &t.fields {
            let Some(property) = ctx.find(&f.annotations, JSONB_PROPERTY) else {
                continue;
            };
            let name = property
                .member("value")
                .and_then(|m| m.value.as_str())
                .filter(|v| !v.is_empty())
                .unwrap_or(f.name.as_str());
            by_name.entry(name.to_string()).or_default().push(f);
        }

        let mut duplicated: Vec<(&FieldDecl, &str)> = by_name
            .iter()
            .filter(|(_, fields)| fields.len() > 1)
            .flat_map(|(name, fields)| fields.iter().map(move |f| (*f, name.as_str())))
            .collect();
        duplicated.sort_by_key(|(f, _)| f.name_span.start);

        for (f, name) in duplicated {
            out.push(Diagnostic::new(
                JsonbCode::InvalidPropertyNamesOnJsonbFields,
                f.name_span,
                format!(
                    "The property name '{}' of {} must be unique within a class.",
                    name,
                    at(JSONB_PROPERTY)
                ),
            ));
        }
    }
}

impl RuleParticipant for JsonbParticipant {
    fn domain(&self) -> Domain {
        Domain::Jsonb
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            self.check_creators(ctx, t, &mut out);
            for f in &t.fields {
                self.check_field(ctx, t, f, &mut out);
            }
            self.check_property_names(ctx, t, &mut out);
        }
        out.sort_by_key(|d| d.range.start);
        Ok(out)
    }
}
