//! RESTful web services (`jakarta.ws.rs`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{MethodDecl, TypeDecl};

use super::at;

pub const PATH: &str = "jakarta.ws.rs.Path";
pub const PROVIDER: &str = "jakarta.ws.rs.ext.Provider";

pub const HTTP_METHODS: &[&str] = &[
    "jakarta.ws.rs.GET",
    "jakarta.ws.rs.POST",
    "jakarta.ws.rs.PUT",
    "jakarta.ws.rs.DELETE",
    "jakarta.ws.rs.HEAD",
    "jakarta.ws.rs.OPTIONS",
    "jakarta.ws.rs.PATCH",
];

/// Parameter annotations that bind a request part; a parameter without any
/// of them is the entity parameter.
pub const PARAM_ANNOTATIONS: &[&str] = &[
    "jakarta.ws.rs.PathParam",
    "jakarta.ws.rs.QueryParam",
    "jakarta.ws.rs.FormParam",
    "jakarta.ws.rs.HeaderParam",
    "jakarta.ws.rs.CookieParam",
    "jakarta.ws.rs.MatrixParam",
    "jakarta.ws.rs.BeanParam",
    "jakarta.ws.rs.core.Context",
];

error_codes! {
    pub enum JaxRsCode for Domain::JaxRs {
        NonPublicResourceMethod,
        ResourceMethodMultipleEntityParams,
        NoPublicConstructors,
    }
}

pub struct JaxRsParticipant;

impl JaxRsParticipant {
    fn check_resource_method(&self, ctx: &DiagnosticsContext, m: &MethodDecl, out: &mut Vec<Diagnostic>) {
        let Some((_, http_method)) = ctx.matching(&m.annotations, HTTP_METHODS).into_iter().next()
        else {
            return;
        };

        if !m.modifiers.is_public() {
            out.push(Diagnostic::new(
                JaxRsCode::NonPublicResourceMethod,
                m.name_span,
                format!("Only public methods can be exposed as resource methods ({}).", at(http_method)),
            ));
        }

        let entities: Vec<&str> = m
            .parameters
            .iter()
            .filter(|p| ctx.matching(&p.annotations, PARAM_ANNOTATIONS).is_empty())
            .map(|p| p.name.as_str())
            .collect();
        if entities.len() > 1 {
            out.push(
                Diagnostic::new(
                    JaxRsCode::ResourceMethodMultipleEntityParams,
                    m.name_span,
                    "Resource methods cannot have more than one entity parameter.",
                )
                .with_data_strings(entities),
            );
        }
    }

    fn check_constructors(&self, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        if t.constructors().any(|c| c.modifiers.is_public()) {
            return;
        }
        for c in t.constructors() {
            out.push(Diagnostic::new(
                JaxRsCode::NoPublicConstructors,
                c.name_span,
                "Root resource and provider classes must have a public constructor.",
            ));
        }
    }
}

impl RuleParticipant for JaxRsParticipant {
    fn domain(&self) -> Domain {
        Domain::JaxRs
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            if !t.is_class() {
                continue;
            }
            let root_resource = ctx.has(&t.annotations, PATH);
            if root_resource || ctx.has(&t.annotations, PROVIDER) {
                self.check_constructors(t, &mut out);
            }
            if root_resource {
                for m in t.plain_methods() {
                    self.check_resource_method(ctx, m, &mut out);
                }
            }
        }
        Ok(out)
    }
}
